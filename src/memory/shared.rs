/*!
 * Shared Memory Manager
 * Single locking boundary around a whole memory manager
 */

use super::manager::MemoryManager;
use super::traits::{Allocator, Defragmenter, MemoryInfo};
use super::types::{DefragReport, Handle, MemoryPressure, MemoryResult, MemoryStats};
use crate::core::types::Size;
use parking_lot::Mutex;
use std::sync::Arc;

/// Memory manager shared across threads
///
/// Every operation holds one exclusive lock for its whole duration, so
/// operations are serialized exactly as if a single owner issued them.
/// Clones share the same manager.
#[derive(Debug, Clone)]
pub struct SharedMemoryManager {
    inner: Arc<Mutex<MemoryManager>>,
}

impl SharedMemoryManager {
    pub fn new(manager: MemoryManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn allocate(&self, size: Size) -> MemoryResult<Handle> {
        self.inner.lock().allocate(size)
    }

    pub fn free(&self, handle: Handle) -> MemoryResult<()> {
        self.inner.lock().free(handle)
    }

    pub fn stats(&self) -> MemoryStats {
        self.inner.lock().stats()
    }

    pub fn info(&self) -> (Size, Size, Size) {
        self.inner.lock().info()
    }

    pub fn defragment(&self) -> DefragReport {
        self.inner.lock().defragment()
    }

    /// Run several operations under one lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut MemoryManager) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<MemoryManager> for SharedMemoryManager {
    fn from(manager: MemoryManager) -> Self {
        Self::new(manager)
    }
}

impl Allocator for SharedMemoryManager {
    fn allocate(&mut self, size: Size) -> MemoryResult<Handle> {
        SharedMemoryManager::allocate(self, size)
    }

    fn free(&mut self, handle: Handle) -> MemoryResult<()> {
        SharedMemoryManager::free(self, handle)
    }

    fn is_allocated(&self, handle: Handle) -> bool {
        self.inner.lock().is_allocated(handle)
    }

    fn block_size(&self, handle: Handle) -> Option<Size> {
        self.inner.lock().block_size(handle)
    }
}

impl MemoryInfo for SharedMemoryManager {
    fn stats(&self) -> MemoryStats {
        SharedMemoryManager::stats(self)
    }

    fn pressure(&self) -> MemoryPressure {
        self.inner.lock().pressure()
    }
}

impl Defragmenter for SharedMemoryManager {
    fn defragment(&mut self) -> DefragReport {
        SharedMemoryManager::defragment(self)
    }
}
