/*!
 * Core Types
 * Common types used across the simulator
 */

/// Offset into the simulated address space
pub type Offset = usize;

/// Size type for memory operations
pub type Size = usize;

/// Identity of a memory manager instance, embedded in every handle it issues
pub type ManagerId = u64;
