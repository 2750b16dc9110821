use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    base::{DocId, ImpactValue},
    error::HeapError,
    heap::{Candidate, HeapOrder, IndexedHeap, Overflow},
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ScoredDocument {
    pub docid: DocId,
    pub score: ImpactValue,
}

impl std::fmt::Display for ScoredDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.docid, self.score)
    }
}

impl Candidate for ScoredDocument {
    #[inline]
    fn docid(&self) -> DocId {
        self.docid
    }

    #[inline]
    fn relabel(&mut self, docid: DocId, score: ImpactValue) {
        self.docid = docid;
        self.score = score;
    }
}

/// Lower scores are evicted first; for equal scores, the lower document ID
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreOrder;

impl HeapOrder<ScoredDocument> for ScoreOrder {
    #[inline]
    fn worse(&self, a: &ScoredDocument, b: &ScoredDocument) -> bool {
        match a.score.total_cmp(&b.score) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => a.docid < b.docid,
        }
    }
}

/// Keeps the `top_k` best scored documents of a query
pub struct TopScoredDocuments {
    heap: IndexedHeap<ScoredDocument, ScoreOrder>,
}

impl TopScoredDocuments {
    pub fn new(top_k: usize) -> Result<Self, HeapError> {
        Ok(Self {
            heap: IndexedHeap::new(top_k, true, ScoreOrder)?,
        })
    }

    /// Add a new candidate, and returns the new lower bound on scores
    pub fn add(&mut self, candidate: DocId, score: ImpactValue) -> Result<ImpactValue, HeapError> {
        let outcome = self.heap.insert_with_overflow(ScoredDocument {
            docid: candidate,
            score,
        })?;
        if let Overflow::Evicted(evicted) = outcome {
            debug!("Document {} left the top-{}", evicted, self.heap.max_size());
        }
        Ok(self.threshold())
    }

    /// Returns the minimum score to enter the top-k: -infinity if the heap is
    /// not full
    pub fn threshold(&self) -> ImpactValue {
        match self.heap.top() {
            Some(top) if self.heap.len() >= self.heap.max_size() => top.score,
            _ => ImpactValue::NEG_INFINITY,
        }
    }

    pub fn get(&self, docid: DocId) -> Option<&ScoredDocument> {
        self.heap.get(docid)
    }

    /// Replaces a retained document by another one, and returns the new lower
    /// bound on scores
    pub fn rescore(
        &mut self,
        docid: DocId,
        new_docid: DocId,
        score: ImpactValue,
    ) -> Result<ImpactValue, HeapError> {
        self.heap.relabel(docid, new_docid, score)?;
        Ok(self.threshold())
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear()
    }

    pub fn into_sorted_vec(self) -> Vec<ScoredDocument> {
        self.heap.into_sorted_vec()
    }
}
