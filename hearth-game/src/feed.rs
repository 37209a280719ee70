//! Bounded on-screen notification feed.

use std::collections::VecDeque;
use std::sync::Arc;

use hearth_core::events::Notifier;
use parking_lot::Mutex;
use tracing::info;

/// Default number of lines kept on screen.
pub const DEFAULT_FEED_CAPACITY: usize = 8;

/// Most recent notifications, oldest first. Clones share the same feed.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl NotificationFeed {
    /// A feed keeping at most `capacity` lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append a line, dropping the oldest past capacity.
    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lines.lock();
        lines.push_back(line.into());
        while lines.len() > self.capacity {
            lines.pop_front();
        }
    }

    /// Copy of the current lines.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }

    /// Number of lines held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether the feed is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Drop every line.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Notifier for NotificationFeed {
    fn notify(&mut self, message: &str) {
        info!(message, "notification");
        self.push(message);
    }
}
