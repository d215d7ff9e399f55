//! Text rendering of analytics summaries and reports.

use std::fmt::Write;

use convo_core::{Conversation, ConversationAnalytics, ConversationId, Message};

const RULE_WIDTH: usize = 80;

/// Multi-line summary for `convo analyze`.
pub fn summary(s: &ConversationAnalytics) -> String {
    let mut out = String::new();
    writeln!(out, "Messages:     {} user / {} bot", s.user_count, s.bot_count).ok();
    writeln!(out, "Sentiment:    {:.2}", s.sentiment_score).ok();
    writeln!(out, "User mood:    {}", mood(s)).ok();
    writeln!(
        out,
        "Avg response: {}",
        s.average_response_ms
            .map_or_else(|| "-".to_string(), |ms| format!("{ms} ms"))
    ).ok();
    writeln!(
        out,
        "Tokens:       {}",
        s.tokens_used
            .map_or_else(|| "-".to_string(), |t| t.to_string())
    ).ok();
    writeln!(out, "Keywords:     {}", keywords(s)).ok();
    out
}

/// Full report: headline figures followed by the transcript.
pub fn report(s: &ConversationAnalytics, messages: &[Message]) -> String {
    let mut out = String::new();
    writeln!(out, "Conversation Analytics Report").ok();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH)).ok();
    writeln!(out, "User messages: {}", s.user_count).ok();
    writeln!(out, "Bot messages: {}", s.bot_count).ok();
    writeln!(out, "Sentiment: {:.2}", s.sentiment_score).ok();
    writeln!(out, "User mood: {}", mood(s)).ok();
    // A zero average reads as "no data" in the report.
    if let Some(ms) = s.average_response_ms.filter(|ms| *ms != 0) {
        writeln!(out, "Avg response: {ms} ms").ok();
    }
    if let Some(tokens) = s.tokens_used {
        writeln!(out, "Estimated tokens: {tokens}").ok();
    }
    if !s.top_keywords.is_empty() {
        writeln!(out, "Top keywords: {}", keywords(s)).ok();
    }

    writeln!(out).ok();
    writeln!(out, "{:<6}  {}", "ROLE", "MESSAGE").ok();
    writeln!(out, "{}", "-".repeat(RULE_WIDTH)).ok();
    for message in messages {
        let text = message.text.split_whitespace().collect::<Vec<_>>().join(" ");
        writeln!(out, "{:<6}  {}", message.role, text).ok();
    }
    out
}

/// One line per update for `convo follow`.
pub fn follow_line(conversation: &Conversation, s: &ConversationAnalytics) -> String {
    format!(
        "[{}] user {} | bot {} | sentiment {:.2} | mood {} | keywords: {}",
        conversation.title,
        s.user_count,
        s.bot_count,
        s.sentiment_score,
        mood(s),
        keywords(s)
    )
}

/// Conversations as listed by `convo select`, with the selection marked.
pub fn conversation_list(records: &[Conversation], selected: Option<&ConversationId>) -> String {
    if records.is_empty() {
        return "No conversations\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        let marker = if Some(&record.id) == selected { "*" } else { " " };
        writeln!(
            out,
            "{} {:<36}  {}  {}",
            marker,
            record.id,
            record.updated_at.format("%Y-%m-%d %H:%M"),
            record.title
        )
        .ok();
    }
    out
}

fn mood(s: &ConversationAnalytics) -> String {
    format!(
        "{} {} ({:.2})",
        s.user_mood_emoji, s.user_mood_label, s.user_mood_score
    )
}

fn keywords(s: &ConversationAnalytics) -> String {
    if s.top_keywords.is_empty() {
        "-".to_string()
    } else {
        s.top_keywords.join(", ")
    }
}
