//! Analytics that follow a conversation as it changes.

use crate::analytics::{Analyzer, ConversationAnalytics};
use crate::chat::Message;
use crate::error::Result;
use crate::ids::ConversationId;
use crate::source::{MessageSource, Subscription};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Keeps a [`ConversationAnalytics`] current for one conversation.
///
/// Recomputed synchronously inside the source's callback; reading the summary
/// never blocks on analysis.
#[derive(Debug)]
pub struct LiveAnalytics {
    conversation: ConversationId,
    summary: Arc<RwLock<ConversationAnalytics>>,
    _subscription: Subscription,
}

impl LiveAnalytics {
    /// Subscribe to `conversation` on `source`.
    pub fn attach<S>(source: &S, conversation: ConversationId, analyzer: Analyzer) -> Result<Self>
    where
        S: MessageSource + ?Sized,
    {
        let summary = Arc::new(RwLock::new(ConversationAnalytics::default()));
        let sink = Arc::clone(&summary);
        let label = conversation.clone();

        let subscription = source.subscribe(
            &conversation,
            Box::new(move |messages: &[Message]| {
                let next = analyzer.analyze(messages);
                debug!(
                    conversation = %label,
                    user_count = next.user_count,
                    bot_count = next.bot_count,
                    sentiment = next.sentiment_score,
                    mood = %next.user_mood_label,
                    "Analytics recomputed"
                );
                let mut current = sink.write().unwrap_or_else(|e| e.into_inner());
                *current = next;
            }),
        )?;

        Ok(Self {
            conversation,
            summary,
            _subscription: subscription,
        })
    }

    /// The conversation being followed.
    pub fn conversation(&self) -> &ConversationId {
        &self.conversation
    }

    /// Latest summary.
    pub fn summary(&self) -> ConversationAnalytics {
        self.summary
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MoodLabel;
    use crate::source::{InMemorySource, MessageCallback};
    use std::sync::{mpsc, Mutex};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_tracks_updates() {
        let source = InMemorySource::new();
        let conv = ConversationId::new("live");
        let live = LiveAnalytics::attach(&source, conv.clone(), Analyzer::default()).unwrap();

        assert_eq!(live.summary(), ConversationAnalytics::default());

        source.append(&conv, Message::user("the app is broken").at(0)).unwrap();
        let summary = live.summary();
        assert_eq!(summary.user_count, 1);
        assert_eq!(summary.user_mood_label, MoodLabel::VeryNegative);

        source.append(&conv, Message::bot("fixed it, thanks").at(800)).unwrap();
        let summary = live.summary();
        assert_eq!(summary.bot_count, 1);
        assert_eq!(summary.average_response_ms, Some(800));
    }

    #[test]
    fn test_starts_from_existing_messages() {
        let source = InMemorySource::new();
        let conv = ConversationId::new("live");
        source.append(&conv, Message::user("great")).unwrap();

        let live = LiveAnalytics::attach(&source, conv, Analyzer::default()).unwrap();
        assert_eq!(live.summary().sentiment_score, 1.0);
    }

    #[test]
    fn test_removed_conversation_resets() {
        let source = InMemorySource::new();
        let conv = ConversationId::new("live");
        source.append(&conv, Message::user("great")).unwrap();
        let live = LiveAnalytics::attach(&source, conv.clone(), Analyzer::default()).unwrap();

        source.remove_conversation(&conv).unwrap();
        assert_eq!(live.summary(), ConversationAnalytics::default());
    }

    #[test]
    fn test_concurrent_appends_leave_latest_summary() {
        let source = InMemorySource::new();
        let conv = ConversationId::new("live");

        // Registered first, so it holds up the first delivery before the
        // analytics callback sees it.
        let (entered_tx, entered_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let entered_tx = Mutex::new(entered_tx);
        let release_rx = Mutex::new(release_rx);
        let gate: MessageCallback = Box::new(move |messages: &[Message]| {
            if messages.len() == 1 {
                entered_tx.lock().unwrap().send(()).unwrap();
                release_rx.lock().unwrap().recv().unwrap();
            }
        });
        let _gate = source.subscribe(&conv, gate).unwrap();
        let live = LiveAnalytics::attach(&source, conv.clone(), Analyzer::default()).unwrap();

        thread::scope(|scope| {
            let first = scope.spawn(|| source.append(&conv, Message::user("one").at(1)).unwrap());
            entered_rx.recv().unwrap();

            let second = scope.spawn(|| source.append(&conv, Message::user("two").at(2)).unwrap());
            thread::sleep(Duration::from_millis(50));
            release_tx.send(()).unwrap();

            first.join().unwrap();
            second.join().unwrap();
        });

        assert_eq!(source.messages(&conv).unwrap().len(), 2);
        assert_eq!(live.summary().user_count, 2);
        assert_eq!(live.conversation(), &conv);
    }
}
