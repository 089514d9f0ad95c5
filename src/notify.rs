//! Page-changed notifications.
//!
//! A [`PageNotifier`] fans a [`PageChanged`] event out to two kinds of
//! subscriber: callbacks registered with [`PageNotifier::subscribe`] and
//! channel receivers handed out by [`PageNotifier::watch`]. Receivers that
//! have been dropped are pruned on the next delivery.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

/// Process-unique identifier of a document, used as the notification sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        DocumentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Emitted after the current page of a document has changed.
///
/// Carries only the sender; observers query the document for the new page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageChanged {
    pub sender: DocumentId,
}

/// Handle returned by [`PageNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&PageChanged)>;

/// Subscriber registry for [`PageChanged`] events.
#[derive(Default)]
pub struct PageNotifier {
    callbacks: Vec<(SubscriptionId, Callback)>,
    channels: Vec<Sender<PageChanged>>,
    next_id: u64,
}

impl PageNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked on every page change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&PageChanged) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    /// Open an unbounded channel that receives every page change.
    pub fn watch(&mut self) -> Receiver<PageChanged> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.channels.push(tx);
        rx
    }

    /// Number of live subscribers (callbacks plus channels not yet pruned).
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len() + self.channels.len()
    }

    /// Deliver `event` once to every subscriber.
    pub fn notify(&mut self, event: PageChanged) {
        for (_, callback) in &mut self.callbacks {
            callback(&event);
        }
        self.channels.retain(|tx| tx.send(event).is_ok());
    }
}

impl std::fmt::Debug for PageNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageNotifier")
            .field("callbacks", &self.callbacks.len())
            .field("channels", &self.channels.len())
            .finish()
    }
}
