//! Conversation records alongside their messages.

use crate::chat::{Message, Role};
use crate::conversation::Conversation;
use crate::error::{CoreError, Result};
use crate::ids::ConversationId;
use crate::source::InMemorySource;
use crate::store::{KeyValueStore, Preferences};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Keeps [`Conversation`] records in step with the messages of an
/// [`InMemorySource`] and the selection kept in [`Preferences`].
pub struct ConversationRegistry<S> {
    source: InMemorySource,
    prefs: Preferences<S>,
    records: RwLock<Vec<Conversation>>,
}

impl<S: KeyValueStore> ConversationRegistry<S> {
    pub fn new(source: InMemorySource, prefs: Preferences<S>) -> Self {
        Self {
            source,
            prefs,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Builder method to start from previously saved records.
    pub fn with_records(self, records: impl IntoIterator<Item = Conversation>) -> Self {
        let mut loaded: Vec<Conversation> = Vec::new();
        for record in records {
            match loaded.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => loaded.push(record),
            }
        }
        Self {
            records: RwLock::new(loaded),
            ..self
        }
    }

    /// Message storage shared with subscribers.
    pub fn source(&self) -> &InMemorySource {
        &self.source
    }

    pub fn preferences(&self) -> &Preferences<S> {
        &self.prefs
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Conversation>>> {
        self.records.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Conversation>>> {
        self.records.write().map_err(poisoned)
    }

    /// All conversations, most recently updated first.
    pub fn list(&self) -> Result<Vec<Conversation>> {
        let mut records = self.read()?.clone();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    pub fn get(&self, id: &ConversationId) -> Result<Option<Conversation>> {
        Ok(self.read()?.iter().find(|r| &r.id == id).cloned())
    }

    /// Start a new conversation and select it.
    pub fn create(&self) -> Result<Conversation> {
        let record = Conversation::new();
        self.write()?.push(record.clone());
        info!(conversation = %record.id, "Conversation created");
        self.remember(&record.id);
        Ok(record)
    }

    /// Select `id`, creating an empty record for it when none exists.
    pub fn open(&self, id: &ConversationId) -> Result<Conversation> {
        let record = {
            let mut records = self.write()?;
            match records.iter().find(|r| &r.id == id) {
                Some(record) => record.clone(),
                None => {
                    let record = Conversation::new().with_id(id.clone());
                    records.push(record.clone());
                    debug!(conversation = %id, "Conversation record added");
                    record
                }
            }
        };
        self.remember(id);
        Ok(record)
    }

    /// Store `message` in `id` and update the record's title and recency.
    ///
    /// A conversation without a record gets one, as a merge write would.
    pub fn record_message(&self, id: &ConversationId, message: Message) -> Result<Conversation> {
        let record = {
            let mut records = self.write()?;
            let index = match records.iter().position(|r| &r.id == id) {
                Some(index) => index,
                None => {
                    records.push(Conversation::new().with_id(id.clone()));
                    records.len() - 1
                }
            };
            let record = &mut records[index];
            match message.role {
                Role::User => record.record_user_message(&message.text),
                Role::Bot => record.record_bot_message(&message.text),
            }
            record.clone()
        };
        self.source.append(id, message)?;
        Ok(record)
    }

    /// Delete a conversation record together with its messages.
    ///
    /// Clears the selection when it pointed at the deleted conversation.
    pub fn delete(&self, id: &ConversationId) -> Result<()> {
        {
            let mut records = self.write()?;
            let before = records.len();
            records.retain(|r| &r.id != id);
            if records.len() == before {
                return Err(CoreError::ConversationNotFound(id.to_string()));
            }
        }

        match self.source.remove_conversation(id) {
            Ok(()) | Err(CoreError::ConversationNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        if self.prefs.last_conversation()?.as_ref() == Some(id) {
            self.prefs.set_last_conversation(None)?;
        }
        info!(conversation = %id, "Conversation deleted");
        Ok(())
    }

    fn remember(&self, id: &ConversationId) {
        if let Err(e) = self.prefs.set_last_conversation(Some(id)) {
            warn!(conversation = %id, error = %e, "Could not remember conversation");
        }
    }
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Storage("conversation records lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};

    fn registry(store: &MemoryStore) -> ConversationRegistry<&MemoryStore> {
        ConversationRegistry::new(InMemorySource::new(), Preferences::new(store))
    }

    fn record(id: &str, minutes_ago: i64) -> Conversation {
        let mut record = Conversation::new().with_id(ConversationId::new(id));
        record.updated_at = Utc::now() - Duration::minutes(minutes_ago);
        record
    }

    #[test]
    fn test_list_most_recent_first() {
        let store = MemoryStore::new();
        let registry = registry(&store).with_records([
            record("old", 30),
            record("newest", 1),
            record("middle", 10),
        ]);

        let ids: Vec<String> = registry
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["newest", "middle", "old"]);
    }

    #[test]
    fn test_message_moves_conversation_to_top() {
        let store = MemoryStore::new();
        let registry = registry(&store).with_records([record("a", 10), record("b", 5)]);

        let updated = registry
            .record_message(&ConversationId::new("a"), Message::user("where is my parcel").at(1))
            .unwrap();
        assert_eq!(updated.title, "where is my parcel");
        assert_eq!(registry.list().unwrap()[0].id.as_str(), "a");
    }

    #[test]
    fn test_create_selects_conversation() {
        let store = MemoryStore::new();
        let registry = registry(&store);

        let created = registry.create().unwrap();
        assert_eq!(created.title, "New Chat");
        assert_eq!(
            registry.preferences().last_conversation().unwrap(),
            Some(created.id.clone())
        );
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn test_open_adds_missing_record_once() {
        let store = MemoryStore::new();
        let registry = registry(&store);
        let id = ConversationId::new("restored");

        registry.open(&id).unwrap();
        registry.open(&id).unwrap();

        assert_eq!(registry.list().unwrap().len(), 1);
        assert_eq!(store.get("lastConversationId").unwrap(), Some("restored".to_string()));
    }

    #[test]
    fn test_record_bot_message_keeps_title() {
        let store = MemoryStore::new();
        let registry = registry(&store);
        let id = ConversationId::new("c1");

        registry.record_message(&id, Message::user("printer jam").at(1)).unwrap();
        let record = registry.record_message(&id, Message::bot("Try this").at(2)).unwrap();

        assert_eq!(record.title, "printer jam");
        assert_eq!(record.last_message.as_deref(), Some("Try this"));
        assert_eq!(registry.source().messages(&id).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_cascades() {
        let store = MemoryStore::new();
        let registry = registry(&store);
        let keep = registry.create().unwrap();
        let gone = registry.create().unwrap();
        registry.record_message(&keep.id, Message::user("stay")).unwrap();
        registry.record_message(&gone.id, Message::user("leave")).unwrap();

        registry.delete(&gone.id).unwrap();

        assert_eq!(registry.get(&gone.id).unwrap(), None);
        assert!(registry.source().messages(&gone.id).unwrap().is_empty());
        assert_eq!(registry.source().messages(&keep.id).unwrap().len(), 1);
        assert_eq!(registry.preferences().last_conversation().unwrap(), None);
    }

    #[test]
    fn test_delete_without_messages() {
        let store = MemoryStore::new();
        let registry = registry(&store);
        let keep = registry.create().unwrap();
        let empty = ConversationId::new("empty");
        registry.open(&empty).unwrap();
        registry.open(&keep.id).unwrap();

        registry.delete(&empty).unwrap();
        assert_eq!(registry.list().unwrap().len(), 1);
        assert_eq!(registry.preferences().last_conversation().unwrap(), Some(keep.id));
    }

    #[test]
    fn test_delete_unknown() {
        let store = MemoryStore::new();
        let err = registry(&store)
            .delete(&ConversationId::new("missing"))
            .unwrap_err();
        assert!(matches!(err, CoreError::ConversationNotFound(id) if id == "missing"));
    }
}
