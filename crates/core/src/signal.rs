// Signal hub - token to subscriber registry with a pending queue
use crate::engine::BindingId;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Explicit registry of signal subscriptions.
///
/// Tokens are plain strings and carry no payload; raising one only marks the
/// subscribed bindings pending. Recomputation happens on the engine's next
/// evaluation pass, never synchronously inside `raise`, so a converter that
/// triggers further signals cannot start a re-entrant recomputation storm.
#[derive(Debug, Default)]
pub struct SignalHub {
    subscribers: IndexMap<String, IndexSet<BindingId>>,
    pending: IndexSet<BindingId>,
}

impl SignalHub {
    /// Create a new empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a binding to a signal token
    pub fn subscribe(&mut self, token: impl Into<String>, id: BindingId) {
        self.subscribers.entry(token.into()).or_default().insert(id);
    }

    /// Remove a binding from every token's subscriber set
    pub fn unsubscribe(&mut self, id: BindingId) {
        for subscribers in self.subscribers.values_mut() {
            subscribers.shift_remove(&id);
        }
        self.pending.shift_remove(&id);
    }

    /// Mark every subscriber of `token` pending. Fire-and-forget.
    ///
    /// Returns the number of bindings affected.
    pub fn raise(&mut self, token: &str) -> usize {
        let Some(subscribers) = self.subscribers.get(token) else {
            debug!("Signal '{}' has no subscribers", token);
            return 0;
        };

        let mut affected = 0;
        for id in subscribers {
            if self.pending.insert(*id) {
                affected += 1;
            }
        }
        debug!("Signal '{}' marked {} bindings pending", token, affected);
        affected
    }

    /// Take the pending set, leaving the hub's queue empty
    pub fn take_pending(&mut self) -> IndexSet<BindingId> {
        std::mem::take(&mut self.pending)
    }

    /// Whether any binding is pending recomputation
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop all subscriptions and pending state
    pub fn clear(&mut self) {
        self.subscribers.clear();
        self.pending.clear();
    }
}
