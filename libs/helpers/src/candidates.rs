use rand::{self, RngCore};
use rand_distr::{Distribution, LogNormal};

use impact_topk::{base::DocId, HeapOrder, ScoreOrder, ScoredDocument};

/// Creates `count` candidates with distinct document IDs (sampled among
/// `0..max_docid`) and log-normal scores
pub fn create_candidates(
    count: usize,
    max_docid: usize,
    rng: &mut dyn RngCore,
) -> Vec<ScoredDocument> {
    let docids = rand::seq::index::sample(rng, max_docid, count).into_vec();
    let log_normal = LogNormal::new(0., 1.).unwrap();

    docids
        .into_iter()
        .map(|docid| ScoredDocument {
            docid: docid as DocId,
            score: log_normal.sample(rng),
        })
        .collect()
}

/// Creates candidates whose scores take only a few distinct values
pub fn create_tied_candidates(count: usize, rng: &mut dyn RngCore) -> Vec<ScoredDocument> {
    let mut candidates = create_candidates(count, 4 * count, rng);
    for candidate in candidates.iter_mut() {
        candidate.score = candidate.score.round();
    }
    candidates
}

/// Sorts candidates best first
pub fn sort_best_first(candidates: &mut [ScoredDocument]) {
    candidates.sort_by(|a, b| {
        if ScoreOrder.worse(b, a) {
            std::cmp::Ordering::Less
        } else if ScoreOrder.worse(a, b) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
}

/// The `top_k` best candidates, best first
pub fn best_k(candidates: &[ScoredDocument], top_k: usize) -> Vec<ScoredDocument> {
    let mut sorted = candidates.to_vec();
    sort_best_first(&mut sorted);
    sorted.truncate(top_k);
    sorted
}
