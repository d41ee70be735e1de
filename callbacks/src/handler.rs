//! Handler abstraction
//!
//! A handler is anything that can be invoked with a shared payload. Plain
//! closures are handlers; [`ContextHandler`] pairs a function pointer with
//! an owned context value, the typed form of "function + opaque context".

use std::fmt;
use std::marker::PhantomData;

/// Trait for callback handlers.
pub trait Handler<P> {
    /// Invoke the handler with the payload being dispatched.
    fn invoke(&self, payload: &P);
}

impl<P, F> Handler<P> for F
where
    F: Fn(&P),
{
    fn invoke(&self, payload: &P) {
        self(payload)
    }
}

/// A function pointer bound to its own context value
pub struct ContextHandler<C, P> {
    func: fn(&C, &P),
    context: C,
    _payload: PhantomData<fn(&P)>,
}

impl<C, P> ContextHandler<C, P> {
    /// Create a new context handler.
    pub fn new(func: fn(&C, &P), context: C) -> Self {
        Self {
            func,
            context,
            _payload: PhantomData,
        }
    }

    /// Access the stored context
    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<C, P> Handler<P> for ContextHandler<C, P> {
    fn invoke(&self, payload: &P) {
        (self.func)(&self.context, payload)
    }
}

impl<C: fmt::Debug, P> fmt::Debug for ContextHandler<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandler")
            .field("func", &(self.func as *const ()))
            .field("context", &self.context)
            .finish()
    }
}
