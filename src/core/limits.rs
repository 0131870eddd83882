/*!
 * System Limits and Constants
 *
 * Centralized location for simulator-wide defaults and thresholds.
 */

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Default simulated address space (1MB)
/// Used by the binary when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 1024 * 1024;

// =============================================================================
// MEMORY PRESSURE THRESHOLDS
// =============================================================================

/// Usage ratio at which pressure is reported as Medium
pub const PRESSURE_MEDIUM_THRESHOLD: f64 = 0.60;

/// Usage ratio at which allocations are logged as warnings (High pressure)
pub const PRESSURE_WARNING_THRESHOLD: f64 = 0.80;

/// Usage ratio at which pressure is reported as Critical
pub const PRESSURE_CRITICAL_THRESHOLD: f64 = 0.95;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable overriding the binary's capacity
pub const CAPACITY_ENV: &str = "MEMSIM_CAPACITY";

/// Environment variable enabling JSON trace output
pub const TRACE_JSON_ENV: &str = "MEMSIM_TRACE_JSON";
