//! Conversation analytics.
//!
//! A single pass over a message list producing role counts, sentiment,
//! keywords, response latency, a token estimate and the user's mood. The
//! transform is total: any message list, including an empty one, yields a
//! summary.

pub mod keywords;
pub mod latency;
pub mod mood;
pub mod sentiment;
pub mod text;
pub mod tokens;

pub use mood::MoodLabel;

use crate::chat::Message;
use crate::config::AnalyzerConfig;
use serde::Serialize;

/// Summary of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAnalytics {
    /// Number of user messages.
    pub user_count: usize,

    /// Number of bot messages.
    pub bot_count: usize,

    /// Polarity of all text, in `[-1, 1]`.
    pub sentiment_score: f64,

    /// Highest-ranked terms, best first.
    pub top_keywords: Vec<String>,

    /// Mean user-to-bot reply time, if any reply exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_response_ms: Option<i64>,

    /// Estimated model tokens; absent for an empty conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,

    /// Polarity of user text only, in `[-1, 1]`.
    pub user_mood_score: f64,

    pub user_mood_label: MoodLabel,

    pub user_mood_emoji: &'static str,
}

impl Default for ConversationAnalytics {
    fn default() -> Self {
        Self {
            user_count: 0,
            bot_count: 0,
            sentiment_score: 0.0,
            top_keywords: Vec::new(),
            average_response_ms: None,
            tokens_used: None,
            user_mood_score: 0.0,
            user_mood_label: MoodLabel::Neutral,
            user_mood_emoji: MoodLabel::Neutral.emoji(),
        }
    }
}

/// Computes [`ConversationAnalytics`] with a given configuration.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create an analyzer.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Summarize `messages`.
    pub fn analyze(&self, messages: &[Message]) -> ConversationAnalytics {
        if messages.is_empty() {
            return ConversationAnalytics::default();
        }

        let user_count = messages.iter().filter(|m| m.is_user()).count();
        let bot_count = messages.iter().filter(|m| m.is_bot()).count();

        let all_text = join_text(messages.iter());
        let user_text = join_text(messages.iter().filter(|m| m.is_user()));

        let user_mood_score = if user_text.is_empty() {
            0.0
        } else {
            sentiment::score(&user_text)
        };
        let user_mood_label = MoodLabel::from_score(user_mood_score);

        ConversationAnalytics {
            user_count,
            bot_count,
            sentiment_score: sentiment::score(&all_text),
            top_keywords: keywords::extract(&all_text, self.config.keyword_limit),
            average_response_ms: latency::average_response_ms(messages),
            tokens_used: Some(tokens::estimate(&all_text, self.config.tokens_per_word)),
            user_mood_score,
            user_mood_label,
            user_mood_emoji: user_mood_label.emoji(),
        }
    }
}

/// Summarize `messages` with the default configuration.
pub fn analyze(messages: &[Message]) -> ConversationAnalytics {
    Analyzer::default().analyze(messages)
}

fn join_text<'a>(messages: impl Iterator<Item = &'a Message>) -> String {
    messages
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
