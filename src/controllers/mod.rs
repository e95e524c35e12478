//! State machines backing the client list and creation views.
//!
//! Controllers never perform I/O on their own: each operation mutates local
//! state and hands back a request to run against a [`crate::api::ClientApi`].
//! Completion is reported back explicitly so that every transition is
//! observable and testable without a runtime.

pub mod creation;
pub mod list;

/// Identifies a subscription returned by [`Observers::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(&S) + Send>;

/// Callbacks notified on every state transition.
pub struct Observers<S> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
}

impl<S> Default for Observers<S> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<S> Observers<S> {
    pub fn subscribe(&mut self, listener: impl FnMut(&S) + Send + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, state: &S) {
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
    }

}

impl<S> std::fmt::Debug for Observers<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Generation token of a list request; only the latest one is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub const fn generation(self) -> u64 {
        self.0
    }
}
