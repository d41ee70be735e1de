//! C ABI for the callback registry
//!
//! Exposes the registry to C callers through an opaque `callbacks_t` handle
//! and four functions. The declarations live in `include/callbacks.h`.
//!
//! The registry is not thread-safe on this side of the boundary either:
//! callers must not register or dispatch concurrently on the same handle.

use crate::handler::Handler;
use crate::registry::CallbackRegistry;
use crate::types::{CallbackError, HandlerId, Result};
use std::os::raw::{c_int, c_void};

/// C callback signature: `void handler(void* context, void* payload)`
pub type CallbackFn = extern "C" fn(context: *mut c_void, payload: *mut c_void);

/// Payload pointer handed to every handler during a C-side dispatch
#[derive(Debug, Clone, Copy)]
pub struct RawPayload(pub *mut c_void);

/// Opaque registry handle for C callers
#[allow(non_camel_case_types)]
pub struct callbacks_t {
    registry: CallbackRegistry<RawPayload>,
}

impl callbacks_t {
    /// Access the underlying registry
    pub fn registry(&self) -> &CallbackRegistry<RawPayload> {
        &self.registry
    }
}

/// A C function pointer plus the context pointer it was registered with
struct ForeignHandler {
    func: CallbackFn,
    context: *mut c_void,
}

impl Handler<RawPayload> for ForeignHandler {
    fn invoke(&self, payload: &RawPayload) {
        (self.func)(self.context, payload.0)
    }
}

/// Allocate an empty registry
///
/// Never returns null. Release the handle with [`destroy_callbacks`].
#[no_mangle]
pub extern "C" fn create_callbacks() -> *mut callbacks_t {
    let handle = Box::new(callbacks_t {
        registry: CallbackRegistry::new(),
    });
    log::debug!("Created callback registry");
    Box::into_raw(handle)
}

/// Append `(handler, context)` to the registry
///
/// Returns 0 on success and -1 if `callbacks` or `handler` is null.
///
/// # Safety
/// `callbacks` must be null or a live handle returned by [`create_callbacks`].
/// `context` must stay valid for as long as the handler is registered.
/// Must not be called on a handle from inside one of its own handlers while
/// [`dispatch_callbacks`] is running on it.
#[no_mangle]
pub unsafe extern "C" fn register_callback_handler(
    callbacks: *mut callbacks_t,
    handler: Option<CallbackFn>,
    context: *mut c_void,
) -> c_int {
    match try_register(callbacks, handler, context) {
        Ok(_) => 0,
        Err(e) => {
            log::error!("register_callback_handler failed: {}", e);
            -1
        }
    }
}

unsafe fn try_register(
    callbacks: *mut callbacks_t,
    handler: Option<CallbackFn>,
    context: *mut c_void,
) -> Result<HandlerId> {
    let handle = callbacks
        .as_mut()
        .ok_or(CallbackError::NullPointer("callbacks"))?;
    let func = handler.ok_or(CallbackError::NullPointer("handler"))?;

    handle.registry.register_handler(ForeignHandler { func, context })
}

/// Invoke every registered handler with `(context, payload)`, in order
///
/// A null `callbacks` handle is ignored.
///
/// # Safety
/// `callbacks` must be null or a live handle returned by [`create_callbacks`].
#[no_mangle]
pub unsafe extern "C" fn dispatch_callbacks(callbacks: *mut callbacks_t, payload: *mut c_void) {
    match callbacks.as_ref() {
        Some(handle) => {
            handle.registry.dispatch(&RawPayload(payload));
        }
        None => log::warn!("dispatch_callbacks called with a null registry"),
    }
}

/// Free a registry and every entry it holds
///
/// Context pointers are not freed; they belong to the caller.
///
/// # Safety
/// `callbacks` must be null or a handle returned by [`create_callbacks`]
/// that has not been destroyed yet. Must not be called on a handle from
/// inside one of its own handlers while [`dispatch_callbacks`] is running on it.
#[no_mangle]
pub unsafe extern "C" fn destroy_callbacks(callbacks: *mut callbacks_t) {
    if callbacks.is_null() {
        return;
    }
    drop(Box::from_raw(callbacks));
    log::debug!("Destroyed callback registry");
}
