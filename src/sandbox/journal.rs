use std::collections::{BTreeSet, VecDeque};
use tracing::info;

use crate::world::{LoreKeeper, Notifier};

/// Discovered lore entries
#[derive(Debug, Clone, Default)]
pub struct LoreBook {
    discovered: BTreeSet<String>,
}

impl LoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.discovered.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty()
    }
}

impl LoreKeeper for LoreBook {
    fn discover_lore(&mut self, lore_id: &str) {
        if self.discovered.insert(lore_id.to_string()) {
            info!("Lore discovered: {}", lore_id);
        }
    }

    fn is_lore_discovered(&self, lore_id: &str) -> bool {
        self.discovered.contains(lore_id)
    }
}

const NOTIFICATION_LIMIT: usize = 32;

/// Most recent player-facing messages, oldest dropped first
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    messages: VecDeque<String>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Vec<String> {
        self.messages.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, message: &str) {
        if self.messages.len() >= NOTIFICATION_LIMIT {
            self.messages.pop_front();
        }
        self.messages.push_back(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lore_is_idempotent() {
        let mut lore = LoreBook::new();
        lore.discover_lore("hymn_of_dawn");
        lore.discover_lore("hymn_of_dawn");
        assert_eq!(lore.len(), 1);
        assert!(lore.is_lore_discovered("hymn_of_dawn"));
    }

    #[test]
    fn test_notifications_bounded() {
        let mut log = NotificationLog::new();
        for i in 0..40 {
            log.notify(&format!("message {}", i));
        }
        assert_eq!(log.len(), NOTIFICATION_LIMIT);
        assert_eq!(log.latest(), Some("message 39"));
        assert_eq!(log.drain().len(), NOTIFICATION_LIMIT);
        assert!(log.is_empty());
    }
}
