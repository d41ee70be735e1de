//! Dynamic library handlers
//!
//! Loads `extern "C" fn(void* context, void* payload)` symbols from shared
//! libraries so they can be registered like any other handler.

use anyhow::{Context, Result};
use callbacks::ffi::CallbackFn;
use libloading::Library;
use std::os::raw::c_void;
use std::path::{Path, PathBuf};

/// A C handler together with the library that provides it
///
/// The library stays loaded for as long as this value is alive.
pub struct PluginHandler {
    func: CallbackFn,
    symbol: String,
    path: PathBuf,
    _library: Library,
}

impl PluginHandler {
    /// Load `symbol` from the shared library at `path`
    pub fn load(path: &Path, symbol: &str) -> Result<Self> {
        log::info!("Loading handler '{}' from {:?}", symbol, path);

        // Running library constructors is inherent to loading a plugin
        let library = unsafe { Library::new(path) }
            .with_context(|| format!("Failed to load library: {:?}", path))?;

        let func: CallbackFn = unsafe {
            *library
                .get::<CallbackFn>(symbol.as_bytes())
                .with_context(|| format!("Symbol '{}' not found in {:?}", symbol, path))?
        };

        Ok(Self {
            func,
            symbol: symbol.to_string(),
            path: path.to_path_buf(),
            _library: library,
        })
    }

    /// The loaded C function pointer
    pub fn func(&self) -> CallbackFn {
        self.func
    }

    /// Call the handler with the given context and payload pointers
    pub fn call(&self, context: *mut c_void, payload: *mut c_void) {
        log::trace!("Calling plugin handler '{}' from {:?}", self.symbol, self.path);
        (self.func)(context, payload)
    }
}
