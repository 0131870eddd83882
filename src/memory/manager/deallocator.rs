/*!
 * Memory Deallocator
 * Returns allocated blocks to the free state without merging
 */

use super::super::types::{Handle, MemoryError, MemoryResult};
use super::MemoryManager;
use tracing::{debug, warn};

impl MemoryManager {
    /// Release the block held by `handle`
    ///
    /// The block keeps its offset and size and becomes free in place;
    /// neighbouring free blocks are left alone until the next
    /// defragmentation pass.
    pub fn free(&mut self, handle: Handle) -> MemoryResult<()> {
        let Some(offset) = self.handles.get(&handle).copied() else {
            warn!(
                manager = self.id,
                %handle,
                "Attempted to free unknown or already freed handle"
            );
            return Err(MemoryError::InvalidHandle(handle));
        };

        let size = self
            .table
            .position_of(offset)
            .and_then(|index| self.table.release(index, handle))
            .ok_or(MemoryError::CorruptionDetected(offset))?;

        self.handles.remove(&handle);
        self.counters.remove_allocation(size);

        debug!(
            manager = self.id,
            %handle,
            offset,
            size,
            free_blocks = self.table.blocks().iter().filter(|b| b.is_free()).count(),
            "Freed block"
        );

        debug_assert!(self.validate().is_ok());
        Ok(())
    }
}
