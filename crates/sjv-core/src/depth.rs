//! # Depth Guard
//!
//! Every recursive walk in the workspace (type-info extraction, schema
//! compilation, validation, canonicalization) enters one level of the guard
//! per recursive call. Exceeding the limit is reported as an error instead of
//! letting native recursion run off the end of the thread stack.

use serde::{Deserialize, Serialize};

use crate::error::DepthLimitExceeded;

/// Default nesting budget.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest budget a guard will honour. The recursive walks spend a few
/// frames per level; this keeps the deepest walk well inside a 2 MiB
/// thread stack.
pub const MAX_DEPTH_CEILING: usize = 256;

/// Recursion budget shared by one compile or validate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct DepthGuard {
    limit: usize,
}

impl DepthGuard {
    /// Create a guard that allows `limit` nested recursive entries,
    /// clamped to [`MAX_DEPTH_CEILING`].
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.min(MAX_DEPTH_CEILING),
        }
    }

    /// The configured limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Enter one recursion level below `level` and return the new level.
    ///
    /// # Errors
    ///
    /// Returns [`DepthLimitExceeded`] when the new level would exceed the limit.
    pub fn enter(&self, level: usize) -> Result<usize, DepthLimitExceeded> {
        let next = level + 1;
        if next > self.limit {
            return Err(DepthLimitExceeded { limit: self.limit });
        }
        Ok(next)
    }
}

impl Default for DepthGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl From<usize> for DepthGuard {
    fn from(limit: usize) -> Self {
        Self::new(limit)
    }
}

impl From<DepthGuard> for usize {
    fn from(guard: DepthGuard) -> Self {
        guard.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_within_limit() {
        let guard = DepthGuard::new(2);
        let one = guard.enter(0).unwrap();
        let two = guard.enter(one).unwrap();
        assert_eq!(two, 2);
    }

    #[test]
    fn test_enter_past_limit() {
        let guard = DepthGuard::new(2);
        let err = guard.enter(2).unwrap_err();
        assert_eq!(err.limit, 2);
    }

    #[test]
    fn test_limit_clamped_to_ceiling() {
        let guard = DepthGuard::new(10_000_000);
        assert_eq!(guard.limit(), MAX_DEPTH_CEILING);
        assert!(guard.enter(MAX_DEPTH_CEILING - 1).is_ok());
        assert!(guard.enter(MAX_DEPTH_CEILING).is_err());
    }

    #[test]
    fn test_deserialized_limit_clamped() {
        let guard: DepthGuard = serde_json::from_str("100000").unwrap();
        assert_eq!(guard.limit(), MAX_DEPTH_CEILING);
        assert_eq!(serde_json::to_string(&DepthGuard::new(8)).unwrap(), "8");
    }

    #[test]
    fn test_zero_limit_rejects_root() {
        assert!(DepthGuard::new(0).enter(0).is_err());
    }
}
