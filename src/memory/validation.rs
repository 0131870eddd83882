/*!
 * Request Validation
 * Conversion of raw signed input into checked capacities and sizes
 */

use super::types::{MemoryError, MemoryResult};
use crate::core::types::Size;

/// Validate a raw capacity
pub fn capacity(raw: i64) -> MemoryResult<Size> {
    positive(raw).ok_or(MemoryError::InvalidCapacity { requested: raw })
}

/// Validate a raw allocation size
pub fn size(raw: i64) -> MemoryResult<Size> {
    positive(raw).ok_or(MemoryError::InvalidSize { requested: raw })
}

fn positive(raw: i64) -> Option<Size> {
    if raw <= 0 {
        return None;
    }
    Size::try_from(raw).ok()
}
