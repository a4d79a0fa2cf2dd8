//! # Session Events
//!
//! Everything a screen needs to know about the wallet: who is connected,
//! on which chain, and when the whole view must be rebuilt.

use serde::{Deserialize, Serialize};
use shared_types::Address;

/// Events published by the wallet store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    // =========================================================================
    // SESSION LIFECYCLE
    // =========================================================================
    /// A wallet session was established.
    Connected {
        /// The active account.
        address: Address,
        /// The chain the wallet reported at connect time.
        chain_id: u64,
    },

    /// The wallet switched to another account; the session was replaced.
    AccountChanged {
        /// The new active account.
        address: Address,
    },

    /// The session ended (user action, wallet disconnect, or empty account list).
    Disconnected,

    // =========================================================================
    // NETWORK
    // =========================================================================
    /// The wallet moved to another chain. The session has already been cleared.
    ChainChanged {
        /// The new chain id.
        chain_id: u64,
    },

    /// Every screen must drop its state and start over.
    /// Always follows [`SessionEvent::ChainChanged`].
    ReloadRequested {
        /// The chain the reload targets.
        chain_id: u64,
    },
}

impl SessionEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Connected { .. } | Self::AccountChanged { .. } | Self::Disconnected => {
                EventTopic::Session
            }
            Self::ChainChanged { .. } | Self::ReloadRequested { .. } => EventTopic::Network,
        }
    }

    /// Whether receiving this event invalidates any state derived from the
    /// previous session.
    #[must_use]
    pub fn invalidates_session(&self) -> bool {
        !matches!(self, Self::Connected { .. })
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Account connect/disconnect/change.
    Session,
    /// Chain changes and reloads.
    Network,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &SessionEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_topic_mapping() {
        assert_eq!(SessionEvent::Disconnected.topic(), EventTopic::Session);
        assert_eq!(
            SessionEvent::ChainChanged { chain_id: 137 }.topic(),
            EventTopic::Network
        );
        assert_eq!(
            SessionEvent::ReloadRequested { chain_id: 137 }.topic(),
            EventTopic::Network
        );
    }

    #[test]
    fn test_filter_all() {
        let filter = EventFilter::all();
        assert!(filter.matches(&SessionEvent::Disconnected));
        assert!(filter.matches(&SessionEvent::ReloadRequested { chain_id: 1 }));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Network]);
        assert!(filter.matches(&SessionEvent::ChainChanged { chain_id: 80001 }));
        assert!(!filter.matches(&SessionEvent::AccountChanged {
            address: Address::ZERO
        }));
    }

    #[test]
    fn test_only_connect_keeps_session() {
        let connected = SessionEvent::Connected {
            address: Address::ZERO,
            chain_id: 80001,
        };
        assert!(!connected.invalidates_session());
        assert!(SessionEvent::Disconnected.invalidates_session());
        assert!(SessionEvent::ChainChanged { chain_id: 1 }.invalidates_session());
    }

    #[test]
    fn test_event_serializes() {
        let json = serde_json::to_string(&SessionEvent::ChainChanged { chain_id: 137 }).unwrap();
        assert!(json.contains("ChainChanged"));
    }
}
