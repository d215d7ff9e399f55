//! Message sources: push the ordered message list of a conversation to
//! subscribers whenever it changes.

use crate::chat::{sort_by_timestamp, Message};
use crate::error::{CoreError, Result};
use crate::ids::ConversationId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, warn};

/// Receives the full, timestamp-ordered message list on every change.
pub type MessageCallback = Box<dyn Fn(&[Message]) + Send + Sync>;

/// Anything that can stream a conversation's messages.
pub trait MessageSource {
    /// Subscribe to `conversation`.
    ///
    /// The callback runs once with the current messages before this returns,
    /// then after every change. Dropping the [`Subscription`] stops delivery.
    fn subscribe(&self, conversation: &ConversationId, callback: MessageCallback)
        -> Result<Subscription>;
}

/// Handle for an active subscription; unsubscribes on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` when dropped.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop delivery now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

type SharedCallback = Arc<dyn Fn(&[Message]) + Send + Sync>;

struct Subscriber {
    id: u64,
    conversation: ConversationId,
    callback: SharedCallback,
}

#[derive(Default)]
struct Inner {
    conversations: HashMap<ConversationId, Vec<Message>>,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

impl Inner {
    fn listeners(&self, conversation: &ConversationId) -> Vec<SharedCallback> {
        self.subscribers
            .iter()
            .filter(|s| &s.conversation == conversation)
            .map(|s| Arc::clone(&s.callback))
            .collect()
    }
}

/// Process-local [`MessageSource`] that also accepts writes.
///
/// Deliveries are serialized: a subscriber sees snapshots in the order the
/// changes were made, even when clones write from several threads. Callbacks
/// must not write to the source they are subscribed to.
#[derive(Clone, Default)]
pub struct InMemorySource {
    inner: Arc<Mutex<Inner>>,
    delivery: Arc<Mutex<()>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        lock_inner(&self.inner)
    }

    /// Held from taking a snapshot until every listener has seen it.
    fn deliver(&self) -> MutexGuard<'_, ()> {
        // Guards no data, so a panicking callback leaves nothing to recover.
        self.delivery.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a message and notify the conversation's subscribers.
    ///
    /// Messages are kept stable-sorted by timestamp, so equal (or missing)
    /// timestamps keep arrival order.
    pub fn append(&self, conversation: &ConversationId, message: Message) -> Result<()> {
        let _delivery = self.deliver();
        let (snapshot, listeners) = {
            let mut inner = self.lock()?;
            let messages = inner.conversations.entry(conversation.clone()).or_default();
            messages.push(message);
            sort_by_timestamp(messages);
            let snapshot = messages.clone();
            (snapshot, inner.listeners(conversation))
        };

        debug!(
            conversation = %conversation,
            messages = snapshot.len(),
            subscribers = listeners.len(),
            "Message appended"
        );
        notify(&listeners, &snapshot);
        Ok(())
    }

    /// Current messages of `conversation`, oldest first.
    pub fn messages(&self, conversation: &ConversationId) -> Result<Vec<Message>> {
        let inner = self.lock()?;
        Ok(inner
            .conversations
            .get(conversation)
            .cloned()
            .unwrap_or_default())
    }

    /// Delete a conversation with all its messages.
    ///
    /// Subscribers stay registered and receive an empty list.
    pub fn remove_conversation(&self, conversation: &ConversationId) -> Result<()> {
        let _delivery = self.deliver();
        let listeners = {
            let mut inner = self.lock()?;
            if inner.conversations.remove(conversation).is_none() {
                return Err(CoreError::ConversationNotFound(conversation.to_string()));
            }
            inner.listeners(conversation)
        };

        debug!(conversation = %conversation, "Conversation removed");
        notify(&listeners, &[]);
        Ok(())
    }
}

impl MessageSource for InMemorySource {
    fn subscribe(
        &self,
        conversation: &ConversationId,
        callback: MessageCallback,
    ) -> Result<Subscription> {
        let callback: SharedCallback = Arc::from(callback);

        let delivery = self.deliver();
        let (id, snapshot) = {
            let mut inner = self.lock()?;
            let id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;
            inner.subscribers.push(Subscriber {
                id,
                conversation: conversation.clone(),
                callback: Arc::clone(&callback),
            });
            let snapshot = inner
                .conversations
                .get(conversation)
                .cloned()
                .unwrap_or_default();
            (id, snapshot)
        };

        debug!(conversation = %conversation, subscriber = id, "Subscribed");
        callback(&snapshot);
        drop(delivery);

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match lock_inner(&inner) {
                Ok(mut guard) => guard.subscribers.retain(|s| s.id != id),
                Err(e) => warn!(subscriber = id, error = %e, "Failed to unsubscribe"),
            };
        }))
    }
}

fn lock_inner(inner: &Mutex<Inner>) -> Result<MutexGuard<'_, Inner>> {
    inner
        .lock()
        .map_err(|_| CoreError::Storage("message source lock poisoned".to_string()))
}

fn notify(listeners: &[SharedCallback], messages: &[Message]) {
    for listener in listeners {
        listener(messages);
    }
}
