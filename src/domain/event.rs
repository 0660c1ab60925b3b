//! Event listeners and the bubbling protocol.
//!
//! An event emitted at a node is delivered to that node's listeners first,
//! then to each ancestor's listeners in turn, up to the root. Delivery is
//! synchronous and cannot be cancelled by a listener. A listener returning
//! an error aborts the rest of the walk; the error reaches the emitter.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, instrument, trace};

use crate::domain::arena::NodeArena;
use crate::domain::error::{ListenerError, TreeError, TreeResult};
use crate::domain::node::NodeId;

/// Outcome of one listener invocation.
pub type ListenerResult = Result<(), ListenerError>;

/// Callback registered for an event name.
///
/// Listeners get a shared view of the arena so they can inspect the nodes
/// named in the envelope.
pub type Listener<K, T, P> = Box<dyn Fn(&NodeArena<K, T, P>, &Event<'_, P>) -> ListenerResult>;

/// Envelope passed to every listener during one emission.
#[derive(Debug, PartialEq)]
pub struct Event<'a, P> {
    /// Data supplied to `emit_event`, unchanged at every hop
    pub payload: Option<&'a P>,
    /// Node the event was emitted on
    pub target: NodeId,
    /// Node whose listeners are running
    pub current: NodeId,
    /// False only while the target's own listeners run
    pub is_child: bool,
}

impl<P> Clone for Event<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Event<'_, P> {}

/// Per-node listener registry: event name to listeners in registration order.
pub struct EventListeners<K, T, P> {
    by_event: HashMap<String, Vec<Listener<K, T, P>>>,
}

impl<K, T, P> Default for EventListeners<K, T, P> {
    fn default() -> Self {
        Self {
            by_event: HashMap::new(),
        }
    }
}

impl<K, T, P> EventListeners<K, T, P> {
    fn push(&mut self, event: String, listener: Listener<K, T, P>) {
        self.by_event.entry(event).or_default().push(listener);
    }

    fn for_event(&self, event: &str) -> &[Listener<K, T, P>] {
        self.by_event.get(event).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn count(&self, event: &str) -> usize {
        self.for_event(event).len()
    }
}

impl<K, T, P> fmt::Debug for EventListeners<K, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_event.iter().map(|(event, l)| (event, l.len())))
            .finish()
    }
}

impl<K, T, P> NodeArena<K, T, P>
where
    K: Eq + Hash + Clone,
{
    /// Appends `listener` to the listeners of `event` on node `id`.
    ///
    /// Registration never replaces: registering the same closure logic twice
    /// makes it fire twice.
    #[instrument(level = "trace", skip(self, event, listener))]
    pub fn add_event_listener<F>(&mut self, id: NodeId, event: impl Into<String>, listener: F) -> TreeResult<()>
    where
        F: Fn(&NodeArena<K, T, P>, &Event<'_, P>) -> ListenerResult + 'static,
    {
        let node = self.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        let event = event.into();
        trace!(%id, %event, "listener registered");
        node.listeners.push(event, Box::new(listener));
        Ok(())
    }

    /// Number of listeners registered for `event` directly on `id`.
    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.get(id).map_or(0, |node| node.listeners.count(event))
    }

    /// Emits `event` at `target` and bubbles it up to the root.
    ///
    /// Returns how many listeners ran. The first failing listener stops the
    /// walk and is reported as [`TreeError::Listener`].
    #[instrument(level = "debug", skip(self, payload))]
    pub fn emit_event(&self, target: NodeId, event: &str, payload: Option<&P>) -> TreeResult<usize> {
        if !self.contains(target) {
            return Err(TreeError::UnknownNode(target));
        }

        let mut invoked = 0;
        let mut is_child = false;
        for current in self.ancestors(target) {
            let Some(node) = self.get(current) else {
                break;
            };
            let envelope = Event {
                payload,
                target,
                current,
                is_child,
            };
            for listener in node.listeners.for_event(event) {
                listener(self, &envelope).map_err(|source| TreeError::Listener {
                    event: event.to_string(),
                    node: current,
                    source,
                })?;
                invoked += 1;
            }
            is_child = true;
        }

        debug!(%target, invoked, "event delivered");
        Ok(invoked)
    }
}
