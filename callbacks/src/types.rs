//! Core types for the callback registry
//!
//! This module defines the identifiers and errors shared by the registry,
//! its configuration and the C ABI.

use std::fmt;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, CallbackError>;

/// Identifier assigned to a handler when it is registered
///
/// IDs start at 1 and increase monotonically within one registry.
/// They are never reused, not even after `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(u64);

impl HandlerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value of this ID
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors that can occur while managing callbacks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Registry is full: limit of {limit} handlers reached")]
    CapacityExceeded { limit: usize },

    #[error("Handler not found: {0}")]
    HandlerNotFound(HandlerId),

    #[error("Null pointer passed for {0}")]
    NullPointer(&'static str),
}
