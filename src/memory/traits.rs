/*!
 * Memory Traits
 * Memory management abstractions
 */

use super::types::*;
use crate::core::types::Size;

/// Block allocator interface
pub trait Allocator {
    /// Allocate a block of `size` units
    fn allocate(&mut self, size: Size) -> MemoryResult<Handle>;

    /// Release the block held by `handle`
    fn free(&mut self, handle: Handle) -> MemoryResult<()>;

    /// Check if a handle refers to a live allocated block
    fn is_allocated(&self, handle: Handle) -> bool;

    /// Get the size of an allocated block
    fn block_size(&self, handle: Handle) -> Option<Size>;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, free)
    fn info(&self) -> (Size, Size, Size) {
        let stats = self.stats();
        (stats.capacity, stats.used_total, stats.free_total)
    }

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().pressure
    }
}

/// Coalescing of adjacent free blocks
pub trait Defragmenter {
    /// Run one left-to-right merge pass over the block table
    fn defragment(&mut self) -> DefragReport;
}
