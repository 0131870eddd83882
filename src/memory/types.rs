/*!
 * Memory Types
 * Common types for the block-table allocator
 */

use crate::core::limits::PRESSURE_MEDIUM_THRESHOLD;
use crate::core::types::{ManagerId, Offset, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Invalid capacity: {requested} (capacity must be positive)")]
    #[diagnostic(
        code(memory::invalid_capacity),
        help("Create the manager with a capacity of at least 1.")
    )]
    InvalidCapacity { requested: i64 },

    #[error("Invalid size: {requested} (allocation size must be positive)")]
    #[diagnostic(
        code(memory::invalid_size),
        help("Request at least 1 unit of memory.")
    )]
    InvalidSize { requested: i64 },

    #[error("Out of memory: requested {requested}, available {available} (largest free block {largest_free})")]
    #[diagnostic(
        code(memory::out_of_memory),
        help("No free block is large enough even after defragmentation. Free some blocks first.")
    )]
    OutOfMemory {
        requested: Size,
        available: Size,
        largest_free: Size,
    },

    #[error("Invalid handle: {0}")]
    #[diagnostic(
        code(memory::invalid_handle),
        help("The handle was already freed or was issued by a different memory manager.")
    )]
    InvalidHandle(Handle),

    #[error("Block table corruption detected at offset {0}")]
    #[diagnostic(code(memory::corruption_detected))]
    CorruptionDetected(Offset),
}

/// Opaque identifier for an allocated block
///
/// Carries the identity of the issuing manager, so a handle is never
/// accepted by a manager that did not issue it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle {
    manager: ManagerId,
    sequence: u64,
}

impl Handle {
    pub(crate) fn new(manager: ManagerId, sequence: u64) -> Self {
        Self { manager, sequence }
    }

    /// Identity of the manager that issued this handle
    pub fn manager(&self) -> ManagerId {
        self.manager
    }

    /// Per-manager issue order, starting at 1
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}#{}", self.manager, self.sequence)
    }
}

/// Block status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    Free,
    Allocated,
}

/// Memory block metadata
///
/// `handle` is `Some` exactly when the block is allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub offset: Offset,
    pub size: Size,
    pub status: BlockStatus,
    pub handle: Option<Handle>,
}

impl Block {
    pub(crate) fn free(offset: Offset, size: Size) -> Self {
        Self {
            offset,
            size,
            status: BlockStatus::Free,
            handle: None,
        }
    }

    pub(crate) fn allocated(offset: Offset, size: Size, handle: Handle) -> Self {
        Self {
            offset,
            size,
            status: BlockStatus::Allocated,
            handle: Some(handle),
        }
    }

    /// One past the last offset covered by this block
    pub fn end(&self) -> Offset {
        self.offset + self.size
    }

    pub fn is_free(&self) -> bool {
        self.status == BlockStatus::Free
    }

    pub fn is_allocated(&self) -> bool {
        self.status == BlockStatus::Allocated
    }

    pub(crate) fn assign(&mut self, handle: Handle) {
        self.status = BlockStatus::Allocated;
        self.handle = Some(handle);
    }

    /// Flip back to Free in place, returning the handle it held
    pub(crate) fn release(&mut self) -> Option<Handle> {
        self.status = BlockStatus::Free;
        self.handle.take()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.status {
            BlockStatus::Free => "Free",
            BlockStatus::Allocated => "Allocated",
        };
        write!(f, "[{} {}-{}]", label, self.offset, self.end())
    }
}

/// Memory statistics
///
/// `pressure` is classified under the thresholds of the manager that
/// produced the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub capacity: Size,
    pub used_total: Size,
    pub free_total: Size,
    pub free_block_count: usize,
    pub largest_free_block: Size,
    pub allocated_block_count: usize,
    pub pressure: MemoryPressure,
}

impl MemoryStats {
    pub fn usage_percentage(&self) -> f64 {
        (self.used_total as f64 / self.capacity as f64) * 100.0
    }

    /// Enough free space in total, but no single free block can hold `size`
    pub fn is_fragmented_for(&self, size: Size) -> bool {
        self.free_total >= size && self.largest_free_block < size
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub(crate) fn classify(usage_ratio: f64, warning: f64, critical: f64) -> Self {
        if usage_ratio >= critical {
            MemoryPressure::Critical
        } else if usage_ratio >= warning {
            MemoryPressure::High
        } else if usage_ratio >= PRESSURE_MEDIUM_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Outcome of one defragmentation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefragReport {
    pub blocks_before: usize,
    pub blocks_after: usize,
    pub largest_free_block: Size,
}

impl DefragReport {
    /// Number of table entries removed by merging
    pub fn merged(&self) -> usize {
        self.blocks_before - self.blocks_after
    }
}
