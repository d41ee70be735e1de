//! Callback registry
//!
//! This module provides the registry itself: an ordered list of callback
//! entries and the dispatch loop that walks it. Entries are invoked in the
//! order they were registered, every time the registry is dispatched.

use crate::config::RegistryConfig;
use crate::handler::{ContextHandler, Handler};
use crate::types::{CallbackError, HandlerId, Result};
use std::fmt;

/// A registered handler together with its assigned ID
struct CallbackEntry<P> {
    id: HandlerId,
    handler: Box<dyn Handler<P>>,
}

/// Ordered container of callback entries, dispatched with a payload of type `P`
///
/// The registry is single-threaded: handlers are not required to be `Send`,
/// so a registry holding them cannot cross threads.
pub struct CallbackRegistry<P> {
    entries: Vec<CallbackEntry<P>>,
    config: RegistryConfig,
    next_id: u64,
}

impl<P: 'static> CallbackRegistry<P> {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new, empty registry with the given configuration
    ///
    /// # Example
    /// ```
    /// use callbacks::{CallbackRegistry, RegistryConfig};
    ///
    /// let config = RegistryConfig::new().with_max_handlers(1);
    /// let mut registry: CallbackRegistry<()> = CallbackRegistry::with_config(config);
    ///
    /// assert!(registry.register_handler(|_: &()| {}).is_ok());
    /// assert!(registry.register_handler(|_: &()| {}).is_err());
    /// ```
    pub fn with_config(config: RegistryConfig) -> Self {
        // Never reserve past the handler limit
        let reserve = config
            .max_handlers
            .map_or(config.initial_capacity, |limit| limit.min(config.initial_capacity));

        let mut entries = Vec::new();
        if let Err(e) = entries.try_reserve(reserve) {
            log::warn!("Could not reserve room for {} handlers, starting empty: {}", reserve, e);
        }

        Self {
            entries,
            config,
            next_id: 1,
        }
    }

    /// Register a function together with the context it will be called with
    ///
    /// The entry is appended after every existing entry. The same function
    /// may be registered any number of times.
    ///
    /// # Arguments
    /// * `func` - Function receiving (context, payload) on every dispatch
    /// * `context` - Value owned by the registry and handed to `func`
    ///
    /// # Returns
    /// * `Result<HandlerId>` - ID of the new entry, or `CapacityExceeded`
    ///   when the configured limit has been reached
    ///
    /// # Example
    /// ```
    /// use callbacks::CallbackRegistry;
    ///
    /// fn greet(name: &String, _payload: &()) {
    ///     println!("Hello from {}", name);
    /// }
    ///
    /// let mut registry = CallbackRegistry::new();
    /// registry.register(greet, "handler 1".to_string()).unwrap();
    /// registry.dispatch(&());
    /// ```
    pub fn register<C: 'static>(&mut self, func: fn(&C, &P), context: C) -> Result<HandlerId> {
        self.register_handler(ContextHandler::new(func, context))
    }

    /// Register any handler value, closures included
    pub fn register_handler<H>(&mut self, handler: H) -> Result<HandlerId>
    where
        H: Handler<P> + 'static,
    {
        if !self.config.allows(self.entries.len()) {
            let limit = self.config.max_handlers.unwrap_or(self.entries.len());
            log::warn!("Rejecting handler: registry limit of {} reached", limit);
            return Err(CallbackError::CapacityExceeded { limit });
        }

        let id = HandlerId::new(self.next_id);
        self.next_id += 1;

        self.entries.push(CallbackEntry {
            id,
            handler: Box::new(handler),
        });

        log::debug!("Registered handler {} ({} total)", id, self.entries.len());
        Ok(id)
    }

    /// Remove a handler, keeping the remaining entries in their order
    pub fn unregister(&mut self, id: HandlerId) -> Result<()> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(CallbackError::HandlerNotFound(id))?;

        self.entries.remove(position);
        log::debug!("Unregistered handler {} ({} remaining)", id, self.entries.len());
        Ok(())
    }

    /// Invoke every handler with the payload, in registration order
    ///
    /// Handlers are not isolated from each other: a handler that panics
    /// unwinds through `dispatch` and the remaining handlers are skipped.
    /// The registry can be dispatched any number of times.
    ///
    /// # Returns
    /// * `usize` - Number of handlers invoked
    pub fn dispatch(&self, payload: &P) -> usize {
        log::debug!("Dispatching to {} handler(s)", self.entries.len());

        for entry in &self.entries {
            log::trace!("Invoking handler {}", entry.id);
            entry.handler.invoke(payload);
        }

        self.entries.len()
    }

    /// Remove all handlers
    ///
    /// IDs handed out before the call are not reused afterwards.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} handler(s)", self.entries.len());
        self.entries.clear();
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a handler with this ID is still registered
    pub fn contains(&self, id: HandlerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// IDs of the registered handlers, in dispatch order
    pub fn handler_ids(&self) -> impl Iterator<Item = HandlerId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Configuration this registry was created with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl<P: 'static> Default for CallbackRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for CallbackRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("handlers", &self.entries.iter().map(|e| e.id).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn record(log: &Log, payload: &&'static str) {
        log.borrow_mut().push(payload.to_string());
    }

    fn recorder(log: &Log, label: &'static str) -> impl Fn(&()) + 'static {
        let log = Rc::clone(log);
        move |_: &()| log.borrow_mut().push(label.to_string())
    }

    #[test]
    fn test_registry_creation() {
        let registry: CallbackRegistry<()> = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.dispatch(&()), 0);
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Log::default();
        let mut registry: CallbackRegistry<()> = CallbackRegistry::new();
        registry.register_handler(recorder(&log, "first")).unwrap();
        registry.register_handler(recorder(&log, "second")).unwrap();
        registry.register_handler(recorder(&log, "third")).unwrap();

        assert_eq!(registry.dispatch(&()), 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_context_and_payload_reach_handler() {
        let log = Log::default();
        let mut registry: CallbackRegistry<&'static str> = CallbackRegistry::new();
        registry.register(record, Rc::clone(&log)).unwrap();

        registry.dispatch(&"payload");
        assert_eq!(*log.borrow(), vec!["payload"]);
    }

    #[test]
    fn test_redispatch_invokes_again() {
        let log = Log::default();
        let mut registry: CallbackRegistry<()> = CallbackRegistry::new();
        registry.register_handler(recorder(&log, "a")).unwrap();

        registry.dispatch(&());
        registry.dispatch(&());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_duplicate_registration_allowed() {
        let log = Log::default();
        let mut registry: CallbackRegistry<&'static str> = CallbackRegistry::new();
        let first = registry.register(record, Rc::clone(&log)).unwrap();
        let second = registry.register(record, Rc::clone(&log)).unwrap();

        assert_ne!(first, second);
        registry.dispatch(&"x");
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_capacity_limit() {
        let config = RegistryConfig::new().with_max_handlers(2);
        let mut registry: CallbackRegistry<()> = CallbackRegistry::with_config(config);

        registry.register_handler(|_: &()| {}).unwrap();
        registry.register_handler(|_: &()| {}).unwrap();
        let err = registry.register_handler(|_: &()| {}).unwrap_err();

        assert_eq!(err, CallbackError::CapacityExceeded { limit: 2 });
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_preserves_order() {
        let log = Log::default();
        let mut registry: CallbackRegistry<()> = CallbackRegistry::new();
        registry.register_handler(recorder(&log, "a")).unwrap();
        let b = registry.register_handler(recorder(&log, "b")).unwrap();
        registry.register_handler(recorder(&log, "c")).unwrap();

        registry.unregister(b).unwrap();
        assert!(!registry.contains(b));

        registry.dispatch(&());
        assert_eq!(*log.borrow(), vec!["a", "c"]);

        assert_eq!(registry.unregister(b), Err(CallbackError::HandlerNotFound(b)));
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut registry: CallbackRegistry<()> = CallbackRegistry::new();
        let first = registry.register_handler(|_: &()| {}).unwrap();
        registry.clear();
        assert!(registry.is_empty());

        let second = registry.register_handler(|_: &()| {}).unwrap();
        assert!(second > first);
        assert_eq!(registry.handler_ids().collect::<Vec<_>>(), vec![second]);
    }

    #[test]
    fn test_oversized_initial_capacity_is_ignored() {
        let config = RegistryConfig::new().with_initial_capacity(1 << 62);
        let mut registry: CallbackRegistry<()> = CallbackRegistry::with_config(config);

        assert!(registry.is_empty());
        assert_eq!(registry.config().initial_capacity, 1 << 62);
        registry.register_handler(|_: &()| {}).unwrap();
        assert_eq!(registry.dispatch(&()), 1);
    }

    #[test]
    fn test_initial_capacity_capped_by_limit() {
        let config = RegistryConfig::new()
            .with_initial_capacity(usize::MAX)
            .with_max_handlers(4);
        let registry: CallbackRegistry<()> = CallbackRegistry::with_config(config);

        assert!(registry.entries.capacity() >= 4);
        assert!(registry.entries.capacity() < 1024);
    }

    #[test]
    fn test_debug_lists_ids() {
        let mut registry: CallbackRegistry<()> = CallbackRegistry::new();
        registry.register_handler(|_: &()| {}).unwrap();
        let output = format!("{:?}", registry);
        assert!(output.contains("HandlerId(1)"));
    }
}
