/*!
 * memsim
 * Simulated block-table memory manager exposed as a library
 */

pub mod core;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use memory::{
    Block, BlockStatus, DefragReport, Handle, MemoryError, MemoryManager, MemoryResult,
    MemoryStats, SharedMemoryManager,
};
pub use monitoring::init_tracing;
