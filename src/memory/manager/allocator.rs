/*!
 * Memory Allocator Implementation
 * First-fit allocation with a single defragment-and-retry fallback
 */

use super::super::types::{Handle, MemoryError, MemoryPressure, MemoryResult};
use super::MemoryManager;
use crate::core::types::Size;
use tracing::{debug, error, instrument, warn};

impl MemoryManager {
    /// Allocate a block of `size` units
    ///
    /// Runs a first-fit pass; if nothing fits, defragments once and retries
    /// once before failing with `OutOfMemory`. Never allocates partially.
    pub fn allocate(&mut self, size: Size) -> MemoryResult<Handle> {
        if size == 0 {
            warn!(manager = self.id, "Rejected allocation of size 0");
            return Err(MemoryError::InvalidSize { requested: 0 });
        }

        let index = match self.table.first_fit(size) {
            Some(index) => index,
            None => self.retry_after_defragment(size)?,
        };

        let handle = self.issue_handle();
        let offset = self.table.claim(index, size, handle).offset;
        self.handles.insert(handle, offset);
        self.counters.add_allocation(size);

        let used = self.counters.current_used;
        match self.check_memory_pressure(used) {
            Some(level) if level >= MemoryPressure::High => {
                warn!(
                    manager = self.id,
                    %handle,
                    offset,
                    size,
                    "Memory pressure {}: {:.1}% used ({} / {})",
                    level,
                    (used as f64 / self.capacity() as f64) * 100.0,
                    used,
                    self.capacity()
                );
            }
            _ => {
                debug!(manager = self.id, %handle, offset, size, "Allocated block");
            }
        }

        debug_assert!(self.validate().is_ok());
        Ok(handle)
    }

    /// Slow path: one coalescing pass, then one more first-fit pass
    #[instrument(level = "debug", skip(self), fields(manager = self.id))]
    fn retry_after_defragment(&mut self, size: Size) -> MemoryResult<usize> {
        debug!("First-fit pass failed, defragmenting before retry");
        self.defragment();

        if let Some(index) = self.table.first_fit(size) {
            return Ok(index);
        }

        self.counters.add_failure();
        let stats = self.stats();
        error!(
            requested = size,
            available = stats.free_total,
            largest_free = stats.largest_free_block,
            "OOM: no free block large enough after defragmentation"
        );

        Err(MemoryError::OutOfMemory {
            requested: size,
            available: stats.free_total,
            largest_free: stats.largest_free_block,
        })
    }

    /// Pressure level for `used`, if at least Medium
    fn check_memory_pressure(&self, used: Size) -> Option<MemoryPressure> {
        let level = MemoryPressure::classify(
            used as f64 / self.capacity() as f64,
            self.config.warning_threshold,
            self.config.critical_threshold,
        );
        (level > MemoryPressure::Low).then_some(level)
    }
}
