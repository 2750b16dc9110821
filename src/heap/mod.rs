//! Bounded binary heaps retaining the best candidates of a scoring run.
//!
//! ## Architecture
//!
//! - [`bounded`]: fixed capacity binary heap ordered by an injected predicate
//! - [`indexed`]: the bounded heap plus a document ID to slot index, so that a
//!   retained candidate can be found and relabeled in O(1) / O(log n)
//!
//! The root of every heap is the *worst* retained element, i.e. the first one
//! to be evicted when a better candidate comes in.

pub mod bounded;
pub mod indexed;

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::base::{DocId, ImpactValue};

pub use bounded::BoundedHeap;
pub use indexed::IndexedHeap;

/// Ordering predicate of a heap
pub trait HeapOrder<T> {
    /// Returns true if `a` should be evicted before `b`
    fn worse(&self, a: &T, b: &T) -> bool;
}

impl<T, F> HeapOrder<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn worse(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// An element that can be stored in an [`IndexedHeap`]
pub trait Candidate {
    /// The document ID, unique among the elements of a heap
    fn docid(&self) -> DocId;

    /// Overwrites the document ID and the score
    fn relabel(&mut self, docid: DocId, score: ImpactValue);
}

/// Notified each time repairing the heap writes an element into a slot
pub trait SlotTracker<T> {
    fn placed(&mut self, item: &T, slot: usize);
}

/// Tracker used by the plain bounded heap
pub struct NoTracking;

impl<T> SlotTracker<T> for NoTracking {
    #[inline]
    fn placed(&mut self, _item: &T, _slot: usize) {}
}

/// Outcome of inserting into a heap that might be full
#[derive(Debug, PartialEq)]
pub enum Overflow<T> {
    /// There was room left, the element was added
    Added,
    /// The element took the place of the root, which is returned
    Evicted(T),
    /// The element is worse than the root and was not inserted
    Rejected(T),
}

impl<T> Overflow<T> {
    /// Returns true if the inserted element is now in the heap
    pub fn accepted(&self) -> bool {
        !matches!(self, Overflow::Rejected(_))
    }
}

#[derive(Derivative, Clone, Debug, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct HeapOptions {
    /// Maximum number of retained elements
    #[derivative(Default(value = "10"))]
    pub max_size: usize,

    /// Reserve the whole backing storage when the heap is created
    /// (instead of growing it as elements come in)
    #[derivative(Default(value = "true"))]
    pub prepopulate: bool,
}
