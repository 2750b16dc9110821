//! Retention of the best scored candidates during query evaluation.
//!
//! The core structure is [`heap::IndexedHeap`], a bounded binary heap whose
//! elements can also be retrieved (and relabeled) by document ID.
//! [`search::TopScoredDocuments`] wraps it as a top-k collector.

pub mod base;
pub mod error;
pub mod heap;
pub mod search;

pub use error::HeapError;
pub use heap::{BoundedHeap, HeapOptions, HeapOrder, IndexedHeap, Overflow};
pub use search::{ScoreOrder, ScoredDocument, TopScoredDocuments};
