//! Registry configuration types
//!
//! The registry needs almost no configuration: how much room to reserve up
//! front and, optionally, a hard limit on the number of handlers.

use serde::{Deserialize, Serialize};

/// Configuration for a callback registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Number of entries to reserve when the registry is created
    #[serde(default)]
    pub initial_capacity: usize,

    /// Optional: maximum number of handlers (None = unlimited)
    #[serde(default)]
    pub max_handlers: Option<usize>,
}

impl RegistryConfig {
    /// Create a new registry configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: reserve room for `capacity` handlers
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder method: cap the number of handlers
    pub fn with_max_handlers(mut self, limit: usize) -> Self {
        self.max_handlers = Some(limit);
        self
    }

    /// Check if a registry currently holding `len` handlers may accept another
    pub fn allows(&self, len: usize) -> bool {
        match self.max_handlers {
            Some(limit) => len < limit,
            None => true,
        }
    }
}
