//! Response latency between user prompts and bot replies.

use crate::chat::{Message, Role};

/// Mean milliseconds from each user message to the next bot message.
///
/// Messages are stable-sorted by timestamp first (missing timestamps count as
/// `0`). Returns `None` when no user message is followed by a bot reply.
pub fn average_response_ms(messages: &[Message]) -> Option<i64> {
    let mut sorted: Vec<&Message> = messages.iter().collect();
    sorted.sort_by_key(|m| m.timestamp_ms());

    let mut total: i64 = 0;
    let mut pairs: i64 = 0;

    for (i, message) in sorted.iter().enumerate() {
        if message.role != Role::User {
            continue;
        }
        let Some(reply) = sorted[i + 1..].iter().find(|m| m.role == Role::Bot) else {
            continue;
        };
        total = total.saturating_add(reply.timestamp_ms().saturating_sub(message.timestamp_ms()));
        pairs += 1;
    }

    if pairs == 0 {
        return None;
    }

    Some((total as f64 / pairs as f64).round() as i64)
}
