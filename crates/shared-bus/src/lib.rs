//! # Shared Bus - Session Change Notifications
//!
//! The wallet store publishes; screens subscribe. No screen reads a global:
//! each one is handed a subscription and tears it down when it goes away.
//!
//! ```text
//! ┌──────────────┐   publish()   ┌──────────────┐  subscribe()  ┌──────────┐
//! │ Wallet store │ ────────────► │  Event Bus   │ ────────────► │  Screen  │
//! └──────────────┘               └──────────────┘               └──────────┘
//! ```
//!
//! A chain change is always followed by a reload request; screens treat the
//! reload as "drop everything and reconnect".

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, SessionEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before older ones are skipped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
