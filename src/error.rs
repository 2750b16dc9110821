use thiserror::Error;

use crate::base::DocId;

/// Caller contract violations detected by the heaps
///
/// A call that fails leaves the heap untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("Heap capacity must be positive (got {0})")]
    InvalidCapacity(usize),
    #[error("Heap is full ({0} elements)")]
    Full(usize),
    #[error("Document {0} is already in the heap")]
    DuplicateDocument(DocId),
    #[error("Document {0} is not in the heap")]
    UnknownDocument(DocId),
}
