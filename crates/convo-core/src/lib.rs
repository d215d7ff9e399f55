//! Convo Core Domain Types
//!
//! This crate contains the conversation model and the analytics transform,
//! with no dependencies on:
//! - Network/HTTP
//! - Database
//! - Runtime specifics
//!
//! Persistence is reached only through the [`KeyValueStore`] and
//! [`MessageSource`] traits; the analytics themselves are pure functions.
//! [`ConversationRegistry`] ties conversation records to both.

pub mod analytics;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod ids;
pub mod live;
pub mod registry;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use analytics::{analyze, Analyzer, ConversationAnalytics, MoodLabel};
pub use chat::{Message, Role, Timestamp};
pub use config::AnalyzerConfig;
pub use conversation::Conversation;
pub use error::{CoreError, Result};
pub use ids::ConversationId;
pub use live::LiveAnalytics;
pub use registry::ConversationRegistry;
pub use source::{InMemorySource, MessageCallback, MessageSource, Subscription};
pub use store::{KeyValueStore, MemoryStore, Preferences, Theme};
