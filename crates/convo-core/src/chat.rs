//! Chat message types for conversation history.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Author of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message (input/prompt).
    User,
    /// Bot message (response).
    Bot,
}

impl Role {
    /// Lowercase name as stored and rendered.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Creation instant of a message, as Unix milliseconds.
///
/// Deserialization is lenient: it accepts Firestore `{seconds, nanoseconds}`
/// maps (the `seconds` part only), plain millisecond numbers, numeric or
/// RFC 3339 strings, and maps any other shape to `0` instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from Unix milliseconds.
    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// The current instant.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Unix milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(ms) = raw.parse::<i64>() {
            return Self(ms);
        }
        if let Ok(ms) = raw.parse::<f64>() {
            return Self::from_float_millis(ms);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Self(dt.timestamp_millis()))
            .unwrap_or_default()
    }

    fn from_float_millis(ms: f64) -> Self {
        if ms.is_finite() {
            Self(ms.round() as i64)
        } else {
            Self::default()
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            // Sub-second nanoseconds are accepted but not part of the value.
            Firestore {
                #[serde(alias = "_seconds")]
                seconds: f64,
            },
            Millis(f64),
            Text(String),
            Malformed(IgnoredAny),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Firestore { seconds } => Self::from_float_millis(seconds * 1000.0),
            Raw::Millis(ms) => Self::from_float_millis(ms),
            Raw::Text(raw) => Self::parse(&raw),
            Raw::Malformed(_) => Self::default(),
        })
    }
}

/// A message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Author of this message.
    pub role: Role,
    /// Message content.
    #[serde(default)]
    pub text: String,
    /// When the message was created, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Message {
    /// Create a message without a timestamp.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: None,
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }

    /// Builder method to set the creation time in milliseconds.
    pub fn at(mut self, ms: i64) -> Self {
        self.created_at = Some(Timestamp::from_millis(ms));
        self
    }

    /// Builder method to stamp the message with the current time.
    pub fn stamped(mut self) -> Self {
        self.created_at = Some(Timestamp::now());
        self
    }

    /// Creation time in milliseconds; a missing timestamp sorts as `0`.
    pub fn timestamp_ms(&self) -> i64 {
        self.created_at.map_or(0, |ts| ts.as_millis())
    }

    /// Whether the user authored this message.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Whether the bot authored this message.
    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }
}

/// Stable sort by creation time, oldest first.
pub fn sort_by_timestamp(messages: &mut [Message]) {
    messages.sort_by_key(Message::timestamp_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created_at(json: &str) -> Option<Timestamp> {
        let raw = format!(r#"{{"role":"user","text":"hi","createdAt":{}}}"#, json);
        serde_json::from_str::<Message>(&raw).unwrap().created_at
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Bot).unwrap(), "\"bot\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_firestore_timestamp() {
        let ts = created_at(r#"{"seconds": 12, "nanoseconds": 500000000}"#);
        assert_eq!(ts, Some(Timestamp::from_millis(12_000)));

        let ts = created_at(r#"{"_seconds": 3, "_nanoseconds": 0}"#);
        assert_eq!(ts, Some(Timestamp::from_millis(3000)));
    }

    #[test]
    fn test_nanoseconds_do_not_shift_latency() {
        let raw = r#"[
            {"role": "user", "text": "hi", "createdAt": {"seconds": 1, "nanoseconds": 900000000}},
            {"role": "bot", "text": "hello", "createdAt": {"seconds": 2, "nanoseconds": 100000000}}
        ]"#;
        let messages: Vec<Message> = serde_json::from_str(raw).unwrap();
        assert_eq!(messages[0].timestamp_ms(), 1000);
        assert_eq!(crate::analytics::latency::average_response_ms(&messages), Some(1000));
    }

    #[test]
    fn test_same_second_keeps_arrival_order() {
        let raw = r#"[
            {"role": "bot", "text": "later", "createdAt": {"seconds": 5, "nanoseconds": 800000000}},
            {"role": "user", "text": "earlier", "createdAt": {"seconds": 5, "nanoseconds": 100000000}}
        ]"#;
        let mut messages: Vec<Message> = serde_json::from_str(raw).unwrap();
        sort_by_timestamp(&mut messages);
        assert_eq!(messages[0].text, "later");
    }

    #[test]
    fn test_numeric_and_string_timestamps() {
        assert_eq!(created_at("1500"), Some(Timestamp::from_millis(1500)));
        assert_eq!(created_at(r#""2500""#), Some(Timestamp::from_millis(2500)));
        assert_eq!(
            created_at(r#""1970-01-01T00:00:01Z""#),
            Some(Timestamp::from_millis(1000))
        );
    }

    #[test]
    fn test_malformed_timestamp_is_zero() {
        assert_eq!(created_at(r#""yesterday""#), Some(Timestamp::default()));
        assert_eq!(created_at(r#"["x"]"#), Some(Timestamp::default()));
        assert_eq!(created_at(r#"{"when": 5}"#), Some(Timestamp::default()));
        assert_eq!(created_at("true"), Some(Timestamp::default()));
    }

    #[test]
    fn test_missing_timestamp() {
        assert_eq!(created_at("null"), None);
        let msg: Message = serde_json::from_str(r#"{"role":"bot","text":"ok"}"#).unwrap();
        assert_eq!(msg.created_at, None);
        assert_eq!(msg.timestamp_ms(), 0);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut messages = vec![
            Message::bot("b").at(20),
            Message::user("first"),
            Message::user("a").at(10),
            Message::bot("second"),
        ];
        sort_by_timestamp(&mut messages);
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "a", "b"]);
    }

    #[test]
    fn test_message_round_trips_camel_case() {
        let msg = Message::user("hello").at(42);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["role"], "user");
    }
}
