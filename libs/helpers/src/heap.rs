use ntest::assert_about_eq;

use impact_topk::{HeapOrder, IndexedHeap, ScoredDocument};

/// Checks heap order and the document index of a heap
pub fn check_heap<O: HeapOrder<ScoredDocument>>(heap: &IndexedHeap<ScoredDocument, O>) {
    let items: Vec<&ScoredDocument> = heap.iter().collect();
    for (slot, item) in items.iter().enumerate() {
        if slot > 0 {
            let parent = items[(slot - 1) / 2];
            assert!(
                !heap.order().worse(item, parent),
                "Slot {} {} is worse than its parent {}",
                slot,
                item,
                parent
            );
        }
        assert_eq!(
            heap.slot_of(item.docid),
            Some(slot),
            "Document {} is not indexed at its slot",
            item.docid
        );
        let found = heap.get(item.docid).expect("Indexed document not found");
        assert_eq!(found.docid, item.docid);
        assert_about_eq!(found.score, item.score);
    }
    assert!(heap.len() <= heap.max_size());
    assert!(heap.is_consistent());
}

/// Checks that two lists of documents are the same (scores up to `eps`)
pub fn check_same_documents(expected: &[ScoredDocument], observed: &[ScoredDocument], eps: f64) {
    assert!(
        expected.len() == observed.len(),
        "Size differ {} vs {}",
        expected.len(),
        observed.len()
    );
    for (ix, (a, b)) in expected.iter().zip(observed.iter()).enumerate() {
        assert!(
            a.docid == b.docid,
            "{}th element differ: expected {}, got {}",
            ix,
            a,
            b
        );
        assert_about_eq!(a.score, b.score, eps);
    }
}
