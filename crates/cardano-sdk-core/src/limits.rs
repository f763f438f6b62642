//! Decoder hardening limits.

use serde::{Deserialize, Serialize};

/// Default maximum nesting of structured values.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Maximum number of nested structured values (maps, lists,
    /// constructors and their elements) before decoding fails.
    pub max_depth: usize,
}

impl DecodeLimits {
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        assert_eq!(DecodeLimits::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_limits_from_partial_json() {
        let limits: DecodeLimits = serde_json::from_str("{}").unwrap();
        assert_eq!(limits, DecodeLimits::default());

        let limits: DecodeLimits = serde_json::from_str(r#"{"max_depth":8}"#).unwrap();
        assert_eq!(limits.max_depth, 8);
    }
}
