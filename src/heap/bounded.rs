//! Fixed capacity binary heap.
//!
//! Elements are stored in a vector in heap order (slot 0 is the root, the
//! children of slot `i` are `2i+1` and `2i+2`). The root is the worst element
//! according to the heap [`HeapOrder`].

use log::debug;

use super::{HeapOptions, HeapOrder, NoTracking, Overflow, SlotTracker};
use crate::error::HeapError;

#[inline]
fn parent(slot: usize) -> usize {
    (slot - 1) >> 1
}

#[inline]
fn left_child(slot: usize) -> usize {
    (slot << 1) + 1
}

/// A binary heap holding at most `max_size` elements
pub struct BoundedHeap<T, O> {
    heap: Vec<T>,
    max_size: usize,
    order: O,
}

impl<T, O: HeapOrder<T>> BoundedHeap<T, O> {
    /// Creates an empty heap
    ///
    /// If `prepopulate` is true, the storage for `max_size` elements is
    /// allocated right away.
    pub fn new(max_size: usize, prepopulate: bool, order: O) -> Result<Self, HeapError> {
        if max_size == 0 {
            return Err(HeapError::InvalidCapacity(max_size));
        }

        let heap = if prepopulate {
            Vec::with_capacity(max_size)
        } else {
            Vec::new()
        };

        Ok(Self {
            heap,
            max_size,
            order,
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

    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.max_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn order(&self) -> &O {
        &self.order
    }

    /// Returns the worst element
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.heap.first()
    }

    /// The elements, in heap order
    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }

    /// Adds an element, failing if the heap is full
    pub fn add(&mut self, item: T) -> Result<&T, HeapError> {
        let slot = self.push_tracked(item, &mut NoTracking)?;
        Ok(&self.heap[slot])
    }

    /// Adds an element, evicting the root if the heap is full and the element
    /// is not worse than it
    pub fn insert_with_overflow(&mut self, item: T) -> Overflow<T> {
        if !self.is_full() {
            // Cannot fail since there is room left
            let _ = self.push_tracked(item, &mut NoTracking);
            Overflow::Added
        } else if self.accepts(&item) {
            Overflow::Evicted(self.replace_top_tracked(item, &mut NoTracking))
        } else {
            Overflow::Rejected(item)
        }
    }

    /// Removes and returns the worst element
    pub fn pop(&mut self) -> Option<T> {
        self.pop_tracked(&mut NoTracking)
    }

    /// Modifies the root in place and moves it to its new position;
    /// returns the new root
    pub fn update_top<F>(&mut self, f: F) -> Option<&T>
    where
        F: FnOnce(&mut T),
    {
        let top = self.heap.first_mut()?;
        f(top);
        self.down_heap(0, &mut NoTracking);
        self.heap.first()
    }

    pub fn clear(&mut self) {
        debug!("Clearing heap ({} elements)", self.heap.len());
        self.heap.clear();
    }

    /// Consumes the heap and returns the elements, best first
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.pop() {
            sorted.push(item);
        }
        sorted.reverse();
        sorted
    }

    /// Returns true if `item` would take the place of the root of a full heap
    #[inline]
    pub(crate) fn accepts(&self, item: &T) -> bool {
        match self.heap.first() {
            Some(top) => !self.order.worse(item, top),
            None => true,
        }
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.heap.get_mut(slot)
    }

    /// Appends an element and moves it up; returns its final slot
    pub(crate) fn push_tracked<K: SlotTracker<T>>(
        &mut self,
        item: T,
        tracker: &mut K,
    ) -> Result<usize, HeapError> {
        if self.is_full() {
            debug!("Cannot add to a full heap ({} elements)", self.max_size);
            return Err(HeapError::Full(self.max_size));
        }
        let slot = self.heap.len();
        self.heap.push(item);
        Ok(self.up_heap(slot, tracker))
    }

    /// Replaces the root (the heap must not be empty) and returns the old one
    pub(crate) fn replace_top_tracked<K: SlotTracker<T>>(&mut self, item: T, tracker: &mut K) -> T {
        let old = std::mem::replace(&mut self.heap[0], item);
        self.down_heap(0, tracker);
        old
    }

    /// Removes the root; the last element takes its place and is moved down
    pub(crate) fn pop_tracked<K: SlotTracker<T>>(&mut self, tracker: &mut K) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        self.down_heap(0, tracker);
        Some(top)
    }

    /// Moves the element at `origin` towards the root while it is worse than
    /// its parent; returns its final slot
    pub(crate) fn up_heap<K: SlotTracker<T>>(&mut self, origin: usize, tracker: &mut K) -> usize {
        let mut i = origin;
        while i > 0 {
            let j = parent(i);
            if !self.order.worse(&self.heap[i], &self.heap[j]) {
                break;
            }
            // shift parent down
            self.heap.swap(i, j);
            tracker.placed(&self.heap[i], i);
            i = j;
        }
        tracker.placed(&self.heap[i], i);
        i
    }

    /// Moves the element at `origin` towards the leaves while one of its
    /// children is worse; returns its final slot
    pub(crate) fn down_heap<K: SlotTracker<T>>(&mut self, origin: usize, tracker: &mut K) -> usize {
        let size = self.heap.len();
        if origin >= size {
            return origin;
        }

        let mut i = origin;
        loop {
            // find the worst child, right one only if strictly worse
            let mut j = left_child(i);
            if j >= size {
                break;
            }
            let k = j + 1;
            if k < size && self.order.worse(&self.heap[k], &self.heap[j]) {
                j = k;
            }
            if !self.order.worse(&self.heap[j], &self.heap[i]) {
                break;
            }
            // shift child up
            self.heap.swap(i, j);
            tracker.placed(&self.heap[i], i);
            i = j;
        }
        tracker.placed(&self.heap[i], i);
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_heap(max_size: usize) -> BoundedHeap<u32, impl Fn(&u32, &u32) -> bool> {
        BoundedHeap::new(max_size, false, |a: &u32, b: &u32| a < b).unwrap()
    }

    fn is_heap<T, O: HeapOrder<T>>(heap: &BoundedHeap<T, O>) -> bool {
        let items = heap.as_slice();
        (1..items.len()).all(|i| !heap.order().worse(&items[i], &items[parent(i)]))
    }

    #[test]
    fn test_zero_capacity() {
        let heap = BoundedHeap::new(0, true, |a: &u32, b: &u32| a < b);
        assert_eq!(heap.err(), Some(HeapError::InvalidCapacity(0)));
    }

    #[test]
    fn test_add_and_pop() {
        let mut heap = min_heap(10);
        for i in [5, 2, 8, 1, 9, 3] {
            heap.add(i).unwrap();
            assert!(is_heap(&heap));
        }
        assert_eq!(heap.top(), Some(&1));

        let mut popped = Vec::new();
        while let Some(i) = heap.pop() {
            assert!(is_heap(&heap));
            popped.push(i);
        }
        assert_eq!(popped, vec![1, 2, 3, 5, 8, 9]);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_add_when_full() {
        let mut heap = min_heap(2);
        heap.add(1).unwrap();
        heap.add(2).unwrap();
        assert_eq!(heap.add(3).err(), Some(HeapError::Full(2)));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_insert_with_overflow() {
        let mut heap = min_heap(3);
        assert_eq!(heap.insert_with_overflow(5), Overflow::Added);
        assert_eq!(heap.insert_with_overflow(2), Overflow::Added);
        assert_eq!(heap.insert_with_overflow(8), Overflow::Added);

        assert_eq!(heap.insert_with_overflow(1), Overflow::Rejected(1));
        assert_eq!(heap.insert_with_overflow(6), Overflow::Evicted(2));
        // Ties displace the root
        assert_eq!(heap.insert_with_overflow(5), Overflow::Evicted(5));
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.into_sorted_vec(), vec![8, 6, 5]);
    }

    #[test]
    fn test_update_top() {
        let mut heap = min_heap(4);
        for i in [4, 7, 9, 5] {
            heap.add(i).unwrap();
        }
        assert_eq!(heap.update_top(|v| *v = 10), Some(&5));
        assert!(is_heap(&heap));
        assert_eq!(heap.into_sorted_vec(), vec![10, 9, 7, 5]);
    }

    #[test]
    fn test_prepopulate_and_clear() {
        let mut heap = BoundedHeap::new(16, true, |a: &u32, b: &u32| a < b).unwrap();
        assert!(heap.heap.capacity() >= 16);
        heap.add(3).unwrap();
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.top(), None);
    }
}
