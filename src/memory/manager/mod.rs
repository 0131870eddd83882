/*!
 * Memory Management
 *
 * Simulated memory manager over a fixed-capacity linear address space.
 * Blocks are metadata only; no real memory is read or written.
 *
 * ## Allocation
 *
 * - **First-fit**: the table is scanned in ascending offset order and the
 *   first free block large enough wins
 * - **Block splitting**: a larger free block is split into an allocated
 *   prefix and a free remainder
 *
 * ## Reclamation
 *
 * - **Lazy coalescing**: `free` only flips a block's status. Adjacent free
 *   blocks are merged by a single defragmentation pass, run when a
 *   first-fit pass fails, followed by exactly one retry
 *
 * ## Concurrency
 *
 * Mutating operations take `&mut self`. Callers needing shared access wrap
 * the whole manager in [`SharedMemoryManager`](crate::memory::SharedMemoryManager).
 */

mod allocator;
mod builder;
mod deallocator;
mod defrag;
mod table;
mod tracking;

pub use builder::{ManagerConfig, MemoryManagerBuilder};
pub use tracking::AllocationCounters;

use super::traits::{Allocator, Defragmenter, MemoryInfo};
use super::types::{Block, DefragReport, Handle, MemoryError, MemoryPressure, MemoryResult, MemoryStats};
use crate::core::types::{ManagerId, Offset, Size};
use ahash::RandomState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use table::BlockTable;
use tracing::info;

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// Memory manager
///
/// Owns the block table, the handle index, and the handle counter.
/// Independent managers share no state.
#[derive(Debug)]
pub struct MemoryManager {
    id: ManagerId,
    config: ManagerConfig,
    table: BlockTable,
    // Live handle -> offset of the allocated block holding it
    handles: HashMap<Handle, Offset, RandomState>,
    next_sequence: u64,
    counters: AllocationCounters,
}

impl MemoryManager {
    /// Create a memory manager with one free block spanning `[0, capacity)`
    pub fn new(capacity: Size) -> MemoryResult<Self> {
        Self::with_config(ManagerConfig::with_capacity(capacity))
    }

    pub fn builder() -> MemoryManagerBuilder {
        MemoryManagerBuilder::new()
    }

    pub fn with_config(config: ManagerConfig) -> MemoryResult<Self> {
        if config.capacity == 0 {
            return Err(MemoryError::InvalidCapacity { requested: 0 });
        }

        let config = config.normalized();
        let id = NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed);

        info!(
            manager = id,
            capacity = config.capacity,
            "Memory manager initialized with first-fit block table"
        );

        Ok(Self {
            id,
            table: BlockTable::new(config.capacity),
            config,
            handles: HashMap::with_hasher(RandomState::new()),
            next_sequence: 1,
            counters: AllocationCounters::default(),
        })
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn capacity(&self) -> Size {
        self.config.capacity
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Read-only view of the block table in offset order
    pub fn blocks(&self) -> &[Block] {
        self.table.blocks()
    }

    /// Block currently held by `handle`
    pub fn block(&self, handle: Handle) -> Option<&Block> {
        let offset = self.handles.get(&handle)?;
        self.table.position_of(*offset).and_then(|index| self.table.get(index))
    }

    pub fn is_allocated(&self, handle: Handle) -> bool {
        self.handles.contains_key(&handle)
    }

    pub fn block_size(&self, handle: Handle) -> Option<Size> {
        self.block(handle).map(|block| block.size)
    }

    pub fn counters(&self) -> &AllocationCounters {
        &self.counters
    }

    /// Statistics computed by scanning the table
    pub fn stats(&self) -> MemoryStats {
        self.table
            .summary(self.config.warning_threshold, self.config.critical_threshold)
    }

    /// Memory info as (total, used, free)
    pub fn info(&self) -> (Size, Size, Size) {
        let stats = self.stats();
        (stats.capacity, stats.used_total, stats.free_total)
    }

    /// Pressure level under this manager's configured thresholds
    pub fn pressure(&self) -> MemoryPressure {
        self.stats().pressure
    }

    /// Re-check every table invariant and the handle index
    pub fn validate(&self) -> MemoryResult<()> {
        self.table.validate()?;

        let mut live = 0;
        for block in self.table.blocks().iter().filter(|b| b.is_allocated()) {
            live += 1;
            let indexed = block
                .handle
                .and_then(|handle| self.handles.get(&handle))
                .copied();
            if indexed != Some(block.offset) {
                return Err(MemoryError::CorruptionDetected(block.offset));
            }
        }

        if live != self.handles.len() {
            return Err(MemoryError::CorruptionDetected(0));
        }

        Ok(())
    }

    fn issue_handle(&mut self) -> Handle {
        let handle = Handle::new(self.id, self.next_sequence);
        self.next_sequence += 1;
        handle
    }
}

// Implement trait interfaces
impl Allocator for MemoryManager {
    fn allocate(&mut self, size: Size) -> MemoryResult<Handle> {
        MemoryManager::allocate(self, size)
    }

    fn free(&mut self, handle: Handle) -> MemoryResult<()> {
        MemoryManager::free(self, handle)
    }

    fn is_allocated(&self, handle: Handle) -> bool {
        MemoryManager::is_allocated(self, handle)
    }

    fn block_size(&self, handle: Handle) -> Option<Size> {
        MemoryManager::block_size(self, handle)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn pressure(&self) -> MemoryPressure {
        MemoryManager::pressure(self)
    }
}

impl Defragmenter for MemoryManager {
    fn defragment(&mut self) -> DefragReport {
        MemoryManager::defragment(self)
    }
}
