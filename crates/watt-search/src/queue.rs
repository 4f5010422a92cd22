//! Indexed binary min-heap.
//!
//! The node queue of every search variant.  Keys are `Fixed`; ids live in
//! `[0, n)` fixed at construction, with an inverse index giving `O(1)`
//! `contains_id`/`get_key` and `O(log n)` `decrease_key`/`increase_key`.
//! Random-access `increase_key` is required: clipping a node's minimum label
//! against the settled set can *raise* its key, which a plain pairing heap
//! cannot express.

use watt_core::{stats, Fixed, StatsEvent};

/// A queue entry: node id plus its key.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct IdKeyPair {
    pub id: u32,
    pub key: Fixed,
}

const INVALID_POS: u32 = u32::MAX;

/// Indexed binary min-heap over ids `[0, n)`.
pub struct MinIdQueue {
    heap: Vec<IdKeyPair>,
    position: Vec<u32>,
}

impl MinIdQueue {
    pub fn new(id_count: usize) -> Self {
        Self {
            heap: Vec::new(),
            position: vec![INVALID_POS; id_count],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Remove all entries; `O(len)`.
    pub fn clear(&mut self) {
        for entry in &self.heap {
            self.position[entry.id as usize] = INVALID_POS;
        }
        self.heap.clear();
    }

    #[inline]
    pub fn contains_id(&self, id: u32) -> bool {
        self.position[id as usize] != INVALID_POS
    }

    /// Key of a contained id.
    #[inline]
    pub fn get_key(&self, id: u32) -> Fixed {
        debug_assert!(self.contains_id(id));
        self.heap[self.position[id as usize] as usize].key
    }

    #[inline]
    pub fn peek(&self) -> Option<IdKeyPair> {
        self.heap.first().copied()
    }

    /// Insert an id that is not currently in the queue.
    pub fn push(&mut self, entry: IdKeyPair) {
        debug_assert!(!self.contains_id(entry.id));
        stats::count(StatsEvent::QueuePush);

        let slot = self.heap.len();
        self.heap.push(entry);
        self.position[entry.id as usize] = slot as u32;
        self.sift_up(slot);
    }

    /// Remove and return the minimum entry.
    pub fn pop(&mut self) -> Option<IdKeyPair> {
        let top = self.peek()?;
        stats::count(StatsEvent::QueuePop);

        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        self.position[self.heap[0].id as usize] = 0;
        self.position[top.id as usize] = INVALID_POS;
        self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Lower the key of a contained id.
    pub fn decrease_key(&mut self, entry: IdKeyPair) {
        stats::count(StatsEvent::QueueDecreaseKey);
        let slot = self.position[entry.id as usize] as usize;
        debug_assert!(entry.key <= self.heap[slot].key);
        self.heap[slot].key = entry.key;
        self.sift_up(slot);
    }

    /// Raise the key of a contained id.
    pub fn increase_key(&mut self, entry: IdKeyPair) {
        stats::count(StatsEvent::QueueIncreaseKey);
        let slot = self.position[entry.id as usize] as usize;
        debug_assert!(entry.key >= self.heap[slot].key);
        self.heap[slot].key = entry.key;
        self.sift_down(slot);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[parent].key <= self.heap[slot].key {
                break;
            }
            self.swap_slots(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let smallest = if right < self.heap.len() && self.heap[right].key < self.heap[left].key
            {
                right
            } else {
                left
            };
            if self.heap[slot].key <= self.heap[smallest].key {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a].id as usize] = a as u32;
        self.position[self.heap[b].id as usize] = b as u32;
    }
}
