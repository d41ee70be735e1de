//! Demo run: print a greeting, register the configured handlers and
//! dispatch them.
//!
//! The same run can be driven through the Rust API or through the C ABI;
//! both produce identical output.

use crate::config::{AppConfig, HandlerSpec};
use crate::plugin::PluginHandler;
use anyhow::{bail, Result};
use callbacks::ffi;
use callbacks::{CallbackRegistry, RegistryConfig};
use std::cell::RefCell;
use std::io::Write;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

/// Shared output stream the handlers write to
pub type Sink = Rc<RefCell<dyn Write>>;

/// Which registry interface the demo goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Native,
    Ffi,
}

/// Context of a message handler
struct Announcement {
    message: String,
    out: Sink,
}

impl Announcement {
    fn emit(&self) {
        if let Err(e) = writeln!(self.out.borrow_mut(), "{}", self.message) {
            log::warn!("Failed to write handler output: {}", e);
        }
    }
}

fn announce(context: &Announcement, _payload: &()) {
    context.emit();
}

extern "C" fn announce_raw(context: *mut c_void, _payload: *mut c_void) {
    // Context is an `Announcement` owned by `run_ffi`
    if let Some(announcement) = unsafe { (context as *const Announcement).as_ref() } {
        announcement.emit();
    }
}

enum LoadedHandler {
    Message(String),
    Plugin(Rc<PluginHandler>),
}

fn load_handlers(specs: Vec<HandlerSpec>) -> Result<Vec<LoadedHandler>> {
    specs
        .into_iter()
        .map(|spec| match spec {
            HandlerSpec::Message(message) => Ok(LoadedHandler::Message(message)),
            HandlerSpec::Library { path, symbol } => {
                Ok(LoadedHandler::Plugin(Rc::new(PluginHandler::load(&path, &symbol)?)))
            }
        })
        .collect()
}

/// Run the demo and return the total number of handler invocations
pub fn run(config: &AppConfig, mode: Mode, out: Sink) -> Result<usize> {
    let handlers = load_handlers(config.handler_specs()?)?;

    writeln!(out.borrow_mut(), "{}", config.greeting)?;

    let invoked = match mode {
        Mode::Native => run_native(config, &handlers, out.clone())?,
        Mode::Ffi => run_ffi(config, &handlers, out.clone())?,
    };

    out.borrow_mut().flush()?;
    log::info!(
        "Dispatched {} round(s), {} handler invocation(s)",
        config.rounds,
        invoked
    );
    Ok(invoked)
}

fn run_native(config: &AppConfig, handlers: &[LoadedHandler], out: Sink) -> Result<usize> {
    let mut registry: CallbackRegistry<()> = CallbackRegistry::with_config(config.registry.clone());

    for handler in handlers {
        match handler {
            LoadedHandler::Message(message) => {
                let context = Announcement {
                    message: message.clone(),
                    out: Rc::clone(&out),
                };
                registry.register(announce, context)?;
            }
            LoadedHandler::Plugin(plugin) => {
                let plugin = Rc::clone(plugin);
                registry.register_handler(move |_: &()| {
                    plugin.call(ptr::null_mut(), ptr::null_mut())
                })?;
            }
        }
    }

    let mut invoked = 0;
    for round in 1..=config.rounds {
        log::debug!("Dispatch round {}/{}", round, config.rounds);
        invoked += registry.dispatch(&());
    }
    Ok(invoked)
}

fn run_ffi(config: &AppConfig, handlers: &[LoadedHandler], out: Sink) -> Result<usize> {
    if config.registry != RegistryConfig::default() {
        log::warn!("Registry settings are not available through the C interface; ignoring them");
    }

    // Contexts must not move while the registry holds pointers to them
    let announcements: Vec<Option<Announcement>> = handlers
        .iter()
        .map(|handler| match handler {
            LoadedHandler::Message(message) => Some(Announcement {
                message: message.clone(),
                out: Rc::clone(&out),
            }),
            LoadedHandler::Plugin(_) => None,
        })
        .collect();

    let callbacks = ffi::create_callbacks();
    let mut registered = 0;

    for (handler, announcement) in handlers.iter().zip(&announcements) {
        let (func, context) = match (handler, announcement) {
            (LoadedHandler::Plugin(plugin), _) => (plugin.func(), ptr::null_mut()),
            (_, Some(announcement)) => (
                announce_raw as ffi::CallbackFn,
                announcement as *const Announcement as *mut c_void,
            ),
            (LoadedHandler::Message(_), None) => continue,
        };

        let status = unsafe { ffi::register_callback_handler(callbacks, Some(func), context) };
        if status != 0 {
            unsafe { ffi::destroy_callbacks(callbacks) };
            bail!("register_callback_handler returned {}", status);
        }
        registered += 1;
    }

    for round in 1..=config.rounds {
        log::debug!("Dispatch round {}/{} (C interface)", round, config.rounds);
        unsafe { ffi::dispatch_callbacks(callbacks, ptr::null_mut()) };
    }

    unsafe { ffi::destroy_callbacks(callbacks) };
    Ok(registered * config.rounds as usize)
}
