// ============================================================================
// Hook Dispatch - Priority-Ordered Handler Chains
// ============================================================================
//
// Lifecycle events (record create, serve) are dispatched through an explicit
// ordered list of handlers. Each handler must call the event's continuation
// to let the rest of the chain, and the framework default action, proceed.
// Ordering and idempotence are therefore visible state, not a side effect of
// registration order.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("hook handler failed: {0}")]
    Handler(String),

    #[error("event propagation stopped before the default action")]
    Stopped,
}

/// Continuation state carried by every hook event.
///
/// A handler signals that the chain may proceed by calling the event's
/// `next()`. Returning without it stops propagation and suppresses the
/// default action for the event.
#[derive(Debug, Default, Clone)]
pub struct Continuation {
    called: bool,
}

impl Continuation {
    pub fn call(&mut self) {
        self.called = true;
    }

    pub fn called(&self) -> bool {
        self.called
    }

    pub fn reset(&mut self) {
        self.called = false;
    }
}

/// Implemented by every event type that flows through a [`Hook`].
pub trait HookEvent {
    fn continuation(&self) -> &Continuation;
    fn continuation_mut(&mut self) -> &mut Continuation;
}

pub type HookFunc<E> = Box<dyn Fn(&mut E) -> Result<(), HookError> + Send + Sync>;

/// A single bound callback with its dispatch priority.
///
/// Lower priorities run first; handlers bound with equal priority keep their
/// binding order.
pub struct HookHandler<E> {
    pub id: &'static str,
    pub priority: i32,
    pub func: HookFunc<E>,
}

/// Ordered list of handlers for one lifecycle event.
pub struct Hook<E: HookEvent> {
    handlers: Vec<HookHandler<E>>,
}

impl<E: HookEvent> Default for Hook<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: HookEvent> Hook<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Insert a handler keeping ascending priority order. Equal priorities
    /// preserve binding order.
    pub fn bind(&mut self, handler: HookHandler<E>) {
        let pos = self
            .handlers
            .partition_point(|h| h.priority <= handler.priority);
        self.handlers.insert(pos, handler);
    }

    pub fn has_handler(&self, id: &str) -> bool {
        self.handlers.iter().any(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the chain in priority order.
    ///
    /// Returns `Ok(true)` when every handler called the continuation (so the
    /// default action is allowed), `Ok(false)` when a handler stopped
    /// propagation. With no handlers bound the default action is vacuously
    /// allowed. A handler error aborts the chain immediately.
    pub fn trigger(&self, event: &mut E) -> Result<bool, HookError> {
        for handler in &self.handlers {
            event.continuation_mut().reset();
            (handler.func)(event)?;
            if !event.continuation().called() {
                tracing::debug!(handler = handler.id, "handler stopped event propagation");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEvent {
        cont: Continuation,
        seen: Vec<&'static str>,
    }

    impl TestEvent {
        fn new() -> Self {
            Self {
                cont: Continuation::default(),
                seen: Vec::new(),
            }
        }
    }

    impl HookEvent for TestEvent {
        fn continuation(&self) -> &Continuation {
            &self.cont
        }

        fn continuation_mut(&mut self) -> &mut Continuation {
            &mut self.cont
        }
    }

    fn recording(id: &'static str, priority: i32) -> HookHandler<TestEvent> {
        HookHandler {
            id,
            priority,
            func: Box::new(move |e| {
                e.seen.push(id);
                e.cont.call();
                Ok(())
            }),
        }
    }

    #[test]
    fn test_empty_hook_allows_default_action() {
        let hook: Hook<TestEvent> = Hook::new();
        let mut event = TestEvent::new();
        assert!(hook.trigger(&mut event).unwrap());
    }

    #[test]
    fn test_handlers_run_in_priority_order() {
        let mut hook = Hook::new();
        hook.bind(recording("last", 999));
        hook.bind(recording("first", -10));
        hook.bind(recording("middle", 0));

        let mut event = TestEvent::new();
        assert!(hook.trigger(&mut event).unwrap());
        assert_eq!(event.seen, vec!["first", "middle", "last"]);
    }

    #[test]
    fn test_equal_priorities_keep_binding_order() {
        let mut hook = Hook::new();
        hook.bind(recording("a", 0));
        hook.bind(recording("b", 0));
        hook.bind(recording("c", 0));

        let mut event = TestEvent::new();
        hook.trigger(&mut event).unwrap();
        assert_eq!(event.seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_continuation_stops_chain() {
        let mut hook = Hook::new();
        hook.bind(HookHandler {
            id: "blocker",
            priority: 0,
            func: Box::new(|e: &mut TestEvent| {
                e.seen.push("blocker");
                // continuation deliberately not called
                Ok(())
            }),
        });
        hook.bind(recording("after", 1));

        let mut event = TestEvent::new();
        assert!(!hook.trigger(&mut event).unwrap());
        assert_eq!(event.seen, vec!["blocker"]);
    }

    #[test]
    fn test_handler_error_aborts_chain() {
        let mut hook = Hook::new();
        hook.bind(HookHandler {
            id: "failing",
            priority: 0,
            func: Box::new(|_: &mut TestEvent| Err(HookError::Handler("boom".into()))),
        });
        hook.bind(recording("after", 1));

        let mut event = TestEvent::new();
        assert!(hook.trigger(&mut event).is_err());
        assert!(event.seen.is_empty());
    }

    #[test]
    fn test_has_handler() {
        let mut hook = Hook::new();
        assert!(!hook.has_handler("a"));
        hook.bind(recording("a", 0));
        assert!(hook.has_handler("a"));
        assert_eq!(hook.len(), 1);
    }
}
