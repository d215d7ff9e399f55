//! Key-value persistence for small client-side preferences.

use crate::error::{CoreError, Result};
use crate::ids::ConversationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// String key-value storage, shared by reference.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Storage("store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a stored value; anything but `dark`/`light` is unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Typed access to the preferences kept in a [`KeyValueStore`].
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub const THEME_KEY: &'static str = "theme";
    pub const LAST_CONVERSATION_KEY: &'static str = "lastConversationId";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored theme. With nothing usable stored, dark is written back and returned.
    pub fn theme(&self) -> Result<Theme> {
        if let Some(theme) = self.store.get(Self::THEME_KEY)?.as_deref().and_then(Theme::parse) {
            return Ok(theme);
        }
        debug!("No theme preference stored, defaulting to dark");
        self.set_theme(Theme::Dark)?;
        Ok(Theme::Dark)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(Self::THEME_KEY, theme.as_str())
    }

    /// Flip the theme and persist it.
    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.theme()?.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Most recently selected conversation, if any.
    pub fn last_conversation(&self) -> Result<Option<ConversationId>> {
        Ok(self
            .store
            .get(Self::LAST_CONVERSATION_KEY)?
            .filter(|id| !id.is_empty())
            .map(ConversationId::from))
    }

    /// Remember `id`, or forget the selection when `None`.
    pub fn set_last_conversation(&self, id: Option<&ConversationId>) -> Result<()> {
        match id {
            Some(id) => self.store.set(Self::LAST_CONVERSATION_KEY, id.as_str()),
            None => self.store.remove(Self::LAST_CONVERSATION_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_theme_defaults_to_dark_and_persists() {
        let store = MemoryStore::new();
        let prefs = Preferences::new(&store);

        assert_eq!(prefs.theme().unwrap(), Theme::Dark);
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_unrecognised_theme_resets() {
        let store = MemoryStore::new();
        store.set("theme", "sepia").unwrap();
        let prefs = Preferences::new(&store);

        assert_eq!(prefs.theme().unwrap(), Theme::Dark);
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_toggle_theme() {
        let prefs = Preferences::new(MemoryStore::new());
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(prefs.theme().unwrap(), Theme::Light);
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_last_conversation() {
        let prefs = Preferences::new(MemoryStore::new());
        assert_eq!(prefs.last_conversation().unwrap(), None);

        let id = ConversationId::new("conv-1");
        prefs.set_last_conversation(Some(&id)).unwrap();
        assert_eq!(prefs.last_conversation().unwrap(), Some(id));
        assert_eq!(
            prefs.store().get("lastConversationId").unwrap(),
            Some("conv-1".to_string())
        );

        prefs.set_last_conversation(None).unwrap();
        assert_eq!(prefs.last_conversation().unwrap(), None);
    }
}
