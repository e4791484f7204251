//! Derived incomplete-task counter.
//!
//! The counter is an observable value owned by the task store, not an
//! ambient global: after every mutation the store recomputes the count
//! from the post-mutation task list and publishes it through a
//! [`tokio::sync::watch`] channel. Readers either sample the latest value
//! or subscribe for change notifications.

use tokio::sync::watch;

use taskpad_model::Task;

/// Counts the incomplete tasks in a list. Pure.
#[must_use]
pub fn recompute(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.completed).count()
}

/// Formats a count the way the badge renders it: values above 99 collapse
/// to `"99+"`.
#[must_use]
pub fn format_badge(count: usize) -> String {
    if count > 99 {
        "99+".to_string()
    } else {
        count.to_string()
    }
}

/// Observable publisher for the incomplete-task count.
///
/// Holds the sending half of a watch channel; the latest published value
/// is always readable and every publish notifies subscribers.
pub struct IncompleteCounter {
    tx: watch::Sender<usize>,
}

impl IncompleteCounter {
    /// Creates a counter initialized to zero.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Publishes a new value, notifying all subscribers.
    pub fn publish(&self, value: usize) {
        // send_replace never fails: the sender keeps the channel alive even
        // with zero receivers.
        self.tx.send_replace(value);
    }

    /// Returns the most recently published value.
    #[must_use]
    pub fn current(&self) -> usize {
        *self.tx.borrow()
    }

    /// Returns a receiver that observes every subsequent publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }
}

impl Default for IncompleteCounter {
    fn default() -> Self {
        Self::new()
    }
}
