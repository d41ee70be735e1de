//! Callback Registry Library
//!
//! A small, single-threaded registry that stores handlers together with a
//! caller-supplied context and invokes all of them, in registration order,
//! whenever it is dispatched with a payload.
//!
//! # Architecture
//!
//! - [`CallbackRegistry`] owns an ordered list of entries
//! - [`Handler`] is the single-method interface every entry implements;
//!   closures and [`ContextHandler`] (function + context) both qualify
//! - [`ffi`] exposes the registry to C through `create_callbacks`,
//!   `register_callback_handler`, `dispatch_callbacks` and
//!   `destroy_callbacks`
//!
//! The library does NOT:
//! - Synchronise access from several threads
//! - Catch panics raised by handlers
//! - Deduplicate handlers
//!
//! # Example Usage
//!
//! ```
//! use callbacks::CallbackRegistry;
//!
//! fn handler_1(_context: &(), _payload: &()) {
//!     println!("Hello from handler 1");
//! }
//! fn handler_2(_context: &(), _payload: &()) {
//!     println!("Hello from handler 2");
//! }
//!
//! let mut registry = CallbackRegistry::new();
//! registry.register(handler_1, ()).unwrap();
//! registry.register(handler_2, ()).unwrap();
//!
//! assert_eq!(registry.dispatch(&()), 2);
//! ```

// Public modules
pub mod config;
pub mod ffi;
pub mod handler;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use config::RegistryConfig;
pub use handler::{ContextHandler, Handler};
pub use registry::CallbackRegistry;
pub use types::{CallbackError, HandlerId, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
