use std::cmp::Ordering;
use std::collections::BinaryHeap;

use volmesh_geom::Region;

/// A mesh chunk of one slot waiting for extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractRegion {
    pub region: Region,
    pub idx: usize,
    pub visible: bool,
}

impl Ord for ExtractRegion {
    // Max-heap: visible slots first, then lower slot index
    fn cmp(&self, other: &Self) -> Ordering {
        self.visible
            .cmp(&other.visible)
            .then_with(|| other.idx.cmp(&self.idx))
            .then_with(|| other.region.lower.cmp(&self.region.lower))
            .then_with(|| other.region.upper.cmp(&self.region.upper))
    }
}

impl PartialOrd for ExtractRegion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
pub(crate) struct ExtractQueue {
    heap: BinaryHeap<ExtractRegion>,
}

impl ExtractQueue {
    pub(crate) fn push(&mut self, job: ExtractRegion) {
        self.heap.push(job);
    }

    pub(crate) fn pop(&mut self) -> Option<ExtractRegion> {
        self.heap.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }

    /// Drops every job of slot `idx`; returns how many were dropped.
    pub(crate) fn remove_slot(&mut self, idx: usize) -> usize {
        let before = self.heap.len();
        self.heap.retain(|job| job.idx != idx);
        before - self.heap.len()
    }
}
