//! Bookkeeping for listeners registered on a document host

use std::collections::BTreeSet;

use super::traits::{Document, Listener};

/// The set of listeners currently registered by one monitor
///
/// Registration is idempotent, and [`ListenerSet::release_all`] removes
/// everything so the owner can guarantee teardown from `Drop`.
#[derive(Debug, Default)]
pub struct ListenerSet {
    active: BTreeSet<Listener>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener unless it is already registered
    pub fn register<D: Document + ?Sized>(&mut self, document: &mut D, listener: Listener) {
        if self.active.insert(listener) {
            document.add_listener(listener);
            tracing::trace!(listener = %listener, "Listener registered");
        }
    }

    /// Remove a listener if it is registered
    pub fn release<D: Document + ?Sized>(&mut self, document: &mut D, listener: Listener) {
        if self.active.remove(&listener) {
            document.remove_listener(listener);
            tracing::trace!(listener = %listener, "Listener removed");
        }
    }

    /// Remove every registered listener
    pub fn release_all<D: Document + ?Sized>(&mut self, document: &mut D) {
        for listener in std::mem::take(&mut self.active) {
            document.remove_listener(listener);
        }
    }

    pub fn contains(&self, listener: Listener) -> bool {
        self.active.contains(&listener)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Listener> + '_ {
        self.active.iter().copied()
    }
}
