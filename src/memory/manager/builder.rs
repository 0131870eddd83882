/*!
 * Memory Manager Builder
 * Builder pattern for MemoryManager construction
 */

use super::super::types::MemoryResult;
use super::MemoryManager;
use crate::core::limits::{
    DEFAULT_CAPACITY, PRESSURE_CRITICAL_THRESHOLD, PRESSURE_WARNING_THRESHOLD,
};
use crate::core::types::Size;
use serde::{Deserialize, Serialize};

/// Memory manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    pub capacity: Size,
    /// Usage ratio at which allocations are logged as warnings
    pub warning_threshold: f64,
    /// Usage ratio reported as critical pressure
    pub critical_threshold: f64,
}

impl ManagerConfig {
    pub fn with_capacity(capacity: Size) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Clamp thresholds into `[0, 1]` and keep critical at or above warning
    pub(super) fn normalized(mut self) -> Self {
        self.warning_threshold = self.warning_threshold.clamp(0.0, 1.0);
        self.critical_threshold = self
            .critical_threshold
            .clamp(0.0, 1.0)
            .max(self.warning_threshold);
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            warning_threshold: PRESSURE_WARNING_THRESHOLD,
            critical_threshold: PRESSURE_CRITICAL_THRESHOLD,
        }
    }
}

/// Builder for MemoryManager
#[derive(Debug, Clone, Default)]
pub struct MemoryManagerBuilder {
    config: ManagerConfig,
}

impl MemoryManagerBuilder {
    /// Create a new MemoryManager builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed capacity of the address space
    pub fn with_capacity(mut self, capacity: Size) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn with_warning_threshold(mut self, ratio: f64) -> Self {
        self.config.warning_threshold = ratio;
        self
    }

    pub fn with_critical_threshold(mut self, ratio: f64) -> Self {
        self.config.critical_threshold = ratio;
        self
    }

    /// Build the MemoryManager
    pub fn build(self) -> MemoryResult<MemoryManager> {
        MemoryManager::with_config(self.config)
    }
}
