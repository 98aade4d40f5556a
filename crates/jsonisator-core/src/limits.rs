//! Resource limits for parsing untrusted text.
//!
//! The parser recurses once per nested object or array, so nesting depth is
//! bounded explicitly rather than left to the call stack.

/// Default maximum nesting depth for arrays and objects.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Default maximum input size in bytes (16 MiB).
pub const DEFAULT_MAX_INPUT_SIZE: usize = 16 * 1024 * 1024;

/// Limits applied by [`crate::parse_value_with_limits`] and the typed parse
/// entry points built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth for arrays and objects.
    pub max_nesting_depth: usize,
    /// Maximum total input size in bytes.
    pub max_input_size: usize,
}

impl Limits {
    pub const fn new(max_nesting_depth: usize, max_input_size: usize) -> Self {
        Self {
            max_nesting_depth,
            max_input_size,
        }
    }

    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub const fn with_max_input_size(mut self, bytes: usize) -> Self {
        self.max_input_size = bytes;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_INPUT_SIZE)
    }
}
