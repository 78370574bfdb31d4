//! Preference persistence
//!
//! `SettingsRepository` is the only way components touch stored
//! preferences. It is created once at start-up and shared through `Rc`.

use std::cell::RefCell;
use std::collections::HashMap;

use studydesk_protocol::{Channel, PreferenceKey, Settings, Theme, Volume};
use web_sys::{Storage, Window};

use crate::error::{describe_js, Result, UiError};

/// String key/value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Browser `localStorage`
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// `None` when storage is disabled (private mode, sandboxed iframe)
    pub fn open(win: &Window) -> Option<Self> {
        win.local_storage()
            .ok()
            .flatten()
            .map(|storage| Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| UiError::Storage(describe_js(&e)))
    }
}

/// In-memory store; used when `localStorage` is unavailable, and in tests
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the persisted preferences
pub struct SettingsRepository {
    store: Box<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Use `localStorage`, or memory if the browser refuses it
    pub fn from_window(win: &Window) -> Self {
        match LocalStore::open(win) {
            Some(store) => Self::new(Box::new(store)),
            None => {
                tracing::warn!("localStorage unavailable, preferences will not persist");
                Self::new(Box::new(MemoryStore::new()))
            }
        }
    }

    fn raw(&self, key: &PreferenceKey) -> Option<String> {
        self.store.get(key.as_str())
    }

    pub fn load(&self) -> Settings {
        Settings::from_lookup(|key| self.raw(key))
    }

    pub fn theme(&self) -> Theme {
        Theme::parse(self.raw(&PreferenceKey::Theme).as_deref())
    }

    pub fn volume(&self, channel: Channel) -> Volume {
        Volume::parse(self.raw(&channel.key()).as_deref())
    }

    pub fn set_volume(&self, channel: Channel, volume: Volume) -> Result<()> {
        self.store.set(channel.key().as_str(), &volume.to_string())
    }

    /// Write every key; keeps going past a failed write
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let mut first_err = None;
        for (key, value) in settings.to_pairs() {
            if let Err(e) = self.store.set(key.as_str(), &value) {
                tracing::warn!(key = %key, error = %e, "failed to persist preference");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
