/*!
 * Memory Module
 * Block-table allocation and reclamation
 */

pub mod manager;
pub mod shared;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export for convenience
pub use manager::{AllocationCounters, ManagerConfig, MemoryManager, MemoryManagerBuilder};
pub use shared::SharedMemoryManager;
pub use traits::*;
pub use types::*;
