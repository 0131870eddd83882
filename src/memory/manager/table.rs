/*!
 * Block Table
 * Offset-ordered collection of blocks covering the whole address space
 */

use super::super::types::{Block, Handle, MemoryError, MemoryPressure, MemoryResult, MemoryStats};
use crate::core::types::{Offset, Size};

/// Ordered block table
///
/// Order is maintained incrementally: splits insert the remainder directly
/// after the split block and merges rewrite the vector in place, so the
/// table is never re-sorted.
#[derive(Debug, Clone)]
pub(super) struct BlockTable {
    blocks: Vec<Block>,
    capacity: Size,
}

impl BlockTable {
    /// One free block spanning `[0, capacity)`
    pub fn new(capacity: Size) -> Self {
        Self {
            blocks: vec![Block::free(0, capacity)],
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Index of the lowest-offset free block that can hold `size`
    pub fn first_fit(&self, size: Size) -> Option<usize> {
        self.blocks
            .iter()
            .position(|block| block.is_free() && block.size >= size)
    }

    /// Allocate `size` units from the free block at `index`
    ///
    /// An exact fit flips the block in place; a larger block is split into an
    /// allocated prefix and a free remainder at `offset + size`.
    pub fn claim(&mut self, index: usize, size: Size, handle: Handle) -> &Block {
        let block = &mut self.blocks[index];
        debug_assert!(block.is_free() && block.size >= size);

        let remainder = (block.size > size).then(|| Block::free(block.offset + size, block.size - size));
        block.size = size;
        block.assign(handle);

        if let Some(remainder) = remainder {
            self.blocks.insert(index + 1, remainder);
        }

        &self.blocks[index]
    }

    /// Index of the block starting exactly at `offset`
    pub fn position_of(&self, offset: Offset) -> Option<usize> {
        self.blocks
            .binary_search_by_key(&offset, |block| block.offset)
            .ok()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Flip the block at `index` back to free if it holds `handle`
    ///
    /// Neighbours are never inspected. Returns the released size.
    pub fn release(&mut self, index: usize, handle: Handle) -> Option<Size> {
        let block = self.blocks.get_mut(index)?;
        if block.handle != Some(handle) {
            return None;
        }
        block.release();
        Some(block.size)
    }

    /// Single left-to-right pass collapsing each run of consecutive free
    /// blocks into one. Returns the number of entries removed.
    pub fn coalesce(&mut self) -> usize {
        let before = self.blocks.len();

        // dedup_by hands us (current, previous retained)
        self.blocks.dedup_by(|next, prev| {
            if prev.is_free() && next.is_free() {
                prev.size += next.size;
                true
            } else {
                false
            }
        });

        before - self.blocks.len()
    }

    pub fn largest_free(&self) -> Size {
        self.blocks
            .iter()
            .filter(|block| block.is_free())
            .map(|block| block.size)
            .max()
            .unwrap_or(0)
    }

    /// Scan the table into a statistics snapshot, classifying pressure
    /// under the given warning and critical ratios
    pub fn summary(&self, warning: f64, critical: f64) -> MemoryStats {
        let mut stats = MemoryStats {
            capacity: self.capacity,
            used_total: 0,
            free_total: 0,
            free_block_count: 0,
            largest_free_block: 0,
            allocated_block_count: 0,
            pressure: MemoryPressure::Low,
        };

        for block in &self.blocks {
            if block.is_free() {
                stats.free_total += block.size;
                stats.free_block_count += 1;
                stats.largest_free_block = stats.largest_free_block.max(block.size);
            } else {
                stats.used_total += block.size;
                stats.allocated_block_count += 1;
            }
        }

        stats.pressure = MemoryPressure::classify(
            stats.used_total as f64 / self.capacity as f64,
            warning,
            critical,
        );
        stats
    }

    /// Check ordering, coverage, and status/handle consistency
    pub fn validate(&self) -> MemoryResult<()> {
        let mut expected = 0;

        for block in &self.blocks {
            if block.offset != expected || block.size == 0 {
                return Err(MemoryError::CorruptionDetected(block.offset));
            }
            if block.is_allocated() != block.handle.is_some() {
                return Err(MemoryError::CorruptionDetected(block.offset));
            }
            expected = block.end();
        }

        if expected != self.capacity {
            return Err(MemoryError::CorruptionDetected(expected));
        }

        Ok(())
    }
}
