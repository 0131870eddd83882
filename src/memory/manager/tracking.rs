/*!
 * Allocation Tracking
 * Lifetime counters for a memory manager
 */

use crate::core::types::Size;
use serde::{Deserialize, Serialize};

/// Lifetime allocation counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationCounters {
    pub allocations: u64,
    pub frees: u64,
    pub failed_allocations: u64,
    pub defragmentations: u64,
    pub merged_blocks: u64,
    pub current_used: Size,
    pub peak_used: Size,
}

impl AllocationCounters {
    pub(super) fn add_allocation(&mut self, size: Size) {
        self.allocations += 1;
        self.current_used += size;
        if self.current_used > self.peak_used {
            self.peak_used = self.current_used;
        }
    }

    pub(super) fn remove_allocation(&mut self, size: Size) {
        self.frees += 1;
        self.current_used = self.current_used.saturating_sub(size);
    }

    pub(super) fn add_failure(&mut self) {
        self.failed_allocations += 1;
    }

    pub(super) fn add_defragmentation(&mut self, merged: usize) {
        self.defragmentations += 1;
        self.merged_blocks += merged as u64;
    }
}
