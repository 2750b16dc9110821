//! Bounded heap with a document ID index
//!
//! Keeps, for each retained candidate, the slot it occupies in the heap, so
//! that a candidate can be looked up by document ID and relabeled (new
//! document ID and score) without removing and reinserting it.

use std::collections::HashMap;

use log::debug;

use super::{BoundedHeap, Candidate, HeapOptions, HeapOrder, Overflow, SlotTracker};
use crate::{
    base::{DocId, ImpactValue},
    error::HeapError,
};

/// Maps document IDs to heap slots
struct PositionIndex(HashMap<DocId, usize>);

impl<T: Candidate> SlotTracker<T> for PositionIndex {
    #[inline]
    fn placed(&mut self, item: &T, slot: usize) {
        self.0.insert(item.docid(), slot);
    }
}

/// A bounded heap whose elements can be found by document ID
///
/// After each operation, the index holds exactly one entry for each element
/// of the heap, mapping its document ID to its slot.
pub struct IndexedHeap<T, O> {
    heap: BoundedHeap<T, O>,
    index: PositionIndex,
}

impl<T: Candidate, O: HeapOrder<T>> IndexedHeap<T, O> {
    pub fn new(max_size: usize, prepopulate: bool, order: O) -> Result<Self, HeapError> {
        let heap = BoundedHeap::new(max_size, prepopulate, order)?;
        Ok(Self {
            heap,
            index: PositionIndex(HashMap::with_capacity(max_size + 1)),
        })
    }

    pub fn with_options(options: &HeapOptions, order: O) -> Result<Self, HeapError> {
        Self::new(options.max_size, options.prepopulate, order)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.heap.max_size()
    }

    pub fn order(&self) -> &O {
        self.heap.order()
    }

    /// Returns the worst retained candidate
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.heap.top()
    }

    /// Iterates over the candidates in heap order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.heap.as_slice().iter()
    }

    /// Returns the candidate with the given document ID
    pub fn get(&self, docid: DocId) -> Option<&T> {
        let slot = *self.index.0.get(&docid)?;
        self.heap.as_slice().get(slot)
    }

    pub fn contains(&self, docid: DocId) -> bool {
        self.index.0.contains_key(&docid)
    }

    /// Returns the heap slot of a candidate (the root is slot 0)
    pub fn slot_of(&self, docid: DocId) -> Option<usize> {
        self.index.0.get(&docid).copied()
    }

    /// Adds a candidate when the caller knows there is room left
    ///
    /// Fails if the heap is full or if the document is already in the heap.
    pub fn add(&mut self, item: T) -> Result<&T, HeapError> {
        self.check_absent(item.docid())?;
        let slot = self.heap.push_tracked(item, &mut self.index)?;
        Ok(&self.heap.as_slice()[slot])
    }

    /// Adds a candidate; when the heap is full, the candidate replaces the
    /// root if it is not worse than it.
    pub fn insert_with_overflow(&mut self, item: T) -> Result<Overflow<T>, HeapError> {
        let docid = item.docid();
        self.check_absent(docid)?;

        if !self.heap.is_full() {
            self.heap.push_tracked(item, &mut self.index)?;
            return Ok(Overflow::Added);
        }

        if !self.heap.accepts(&item) {
            return Ok(Overflow::Rejected(item));
        }

        // The new candidate owns the root slot before the heap is repaired
        if let Some(top) = self.heap.top() {
            let evicted = top.docid();
            debug!("Evicting document {} for document {}", evicted, docid);
            self.index.0.remove(&evicted);
        }
        self.index.0.insert(docid, 0);

        let evicted = self.heap.replace_top_tracked(item, &mut self.index);
        Ok(Overflow::Evicted(evicted))
    }

    /// Removes and returns the worst candidate
    pub fn pop(&mut self) -> Option<T> {
        let docid = self.heap.top()?.docid();
        self.index.0.remove(&docid);
        self.heap.pop_tracked(&mut self.index)
    }

    /// Gives a new document ID and score to a retained candidate, and
    /// returns the (possibly new) worst candidate
    ///
    /// The candidate is modified in its slot and then moved up or down, which
    /// only touches the path between the old and the new slot.
    pub fn relabel(
        &mut self,
        docid: DocId,
        new_docid: DocId,
        new_score: ImpactValue,
    ) -> Result<&T, HeapError> {
        let slot = self
            .slot_of(docid)
            .ok_or(HeapError::UnknownDocument(docid))?;
        if new_docid != docid {
            self.check_absent(new_docid)?;
        }

        debug!(
            "Relabeling document {} as {} (score {})",
            docid, new_docid, new_score
        );
        let item = self
            .heap
            .get_mut(slot)
            .ok_or(HeapError::UnknownDocument(docid))?;
        item.relabel(new_docid, new_score);

        self.index.0.remove(&docid);
        self.index.0.insert(new_docid, slot);

        // At most one of the two moves the candidate
        if self.heap.down_heap(slot, &mut self.index) == slot {
            self.heap.up_heap(slot, &mut self.index);
        }

        Ok(&self.heap.as_slice()[0])
    }

    /// Removes all the candidates
    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.0.clear();
    }

    /// Consumes the heap and returns the candidates, best first
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap.into_sorted_vec()
    }

    /// Checks the heap order and that the index maps each retained document
    /// to its slot (and nothing else); linear in the heap size
    pub fn is_consistent(&self) -> bool {
        let items = self.heap.as_slice();
        let ordered = (1..items.len())
            .all(|i| !self.heap.order().worse(&items[i], &items[(i - 1) / 2]));
        let indexed = items
            .iter()
            .enumerate()
            .all(|(slot, item)| self.slot_of(item.docid()) == Some(slot));

        ordered && indexed && self.index.0.len() == items.len()
    }

    fn check_absent(&self, docid: DocId) -> Result<(), HeapError> {
        if self.contains(docid) {
            debug!("Document {} is already in the heap", docid);
            return Err(HeapError::DuplicateDocument(docid));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{ScoreOrder, ScoredDocument};

    fn doc(docid: DocId, score: f32) -> ScoredDocument {
        ScoredDocument { docid, score }
    }

    fn new_heap(max_size: usize) -> IndexedHeap<ScoredDocument, ScoreOrder> {
        IndexedHeap::new(max_size, true, ScoreOrder).unwrap()
    }

    #[test]
    fn test_add_indexes_final_slot() {
        let mut heap = new_heap(8);
        for (docid, score) in [(1, 5.), (2, 3.), (3, 7.), (4, 1.), (5, 4.)] {
            let added = *heap.add(doc(docid, score)).unwrap();
            assert_eq!(added, doc(docid, score));
            assert!(heap.is_consistent());
        }
        assert_eq!(heap.slot_of(4), Some(0));
        assert_eq!(heap.top().map(|d| d.docid), Some(4));
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let mut heap = new_heap(2);
        heap.add(doc(1, 1.)).unwrap();
        assert_eq!(
            heap.add(doc(1, 2.)).err(),
            Some(HeapError::DuplicateDocument(1))
        );
        assert_eq!(
            heap.insert_with_overflow(doc(1, 3.)).err(),
            Some(HeapError::DuplicateDocument(1))
        );
        heap.add(doc(2, 2.)).unwrap();
        assert_eq!(
            heap.relabel(1, 2, 0.5).err(),
            Some(HeapError::DuplicateDocument(2))
        );
        assert_eq!(heap.get(1), Some(&doc(1, 1.)));
        assert!(heap.is_consistent());
    }

    #[test]
    fn test_add_when_full() {
        let mut heap = new_heap(1);
        heap.add(doc(1, 1.)).unwrap();
        assert_eq!(heap.add(doc(2, 2.)).err(), Some(HeapError::Full(1)));
        assert!(!heap.contains(2));
        assert!(heap.is_consistent());
    }

    #[test]
    fn test_relabel_unknown_document() {
        let mut heap = new_heap(2);
        heap.add(doc(1, 1.)).unwrap();
        assert_eq!(
            heap.relabel(7, 8, 1.).err(),
            Some(HeapError::UnknownDocument(7))
        );
    }

    #[test]
    fn test_relabel_same_docid() {
        let mut heap = new_heap(4);
        for (docid, score) in [(1, 1.), (2, 2.), (3, 3.), (4, 4.)] {
            heap.add(doc(docid, score)).unwrap();
        }
        let top = *heap.relabel(1, 1, 10.).unwrap();
        assert_eq!(top, doc(2, 2.));
        assert_eq!(heap.get(1), Some(&doc(1, 10.)));
        assert!(heap.is_consistent());
    }

    #[test]
    fn test_pop_keeps_index() {
        let mut heap = new_heap(6);
        for (docid, score) in [(1, 6.), (2, 5.), (3, 4.), (4, 3.), (5, 2.), (6, 1.)] {
            heap.add(doc(docid, score)).unwrap();
        }
        let mut expected = 6;
        while let Some(d) = heap.pop() {
            assert_eq!(d.docid, expected);
            assert!(!heap.contains(d.docid));
            assert!(heap.is_consistent());
            expected -= 1;
        }
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_clear() {
        let mut heap = new_heap(3);
        heap.add(doc(1, 1.)).unwrap();
        heap.add(doc(2, 2.)).unwrap();
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.get(1), None);
        assert!(heap.is_consistent());
        heap.add(doc(1, 3.)).unwrap();
        assert_eq!(heap.get(1), Some(&doc(1, 3.)));
    }
}
