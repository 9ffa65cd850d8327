//! User preference storage.

use alert_core::Preferences;
use alert_store::{settings, Store};
use tokio::sync::RwLock;
use tracing::warn;

/// Preference storage for the engine and its consumers.
///
/// Thread-safe in-memory copy of the current preferences, optionally backed
/// by the durable store. A store failure never takes preferences down: the
/// in-memory copy keeps working for the session and the failure is logged.
pub struct PreferenceStore {
    current: RwLock<Preferences>,
    store: Option<Store>,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore {
    /// Create a store holding the default preferences, with no durable
    /// backing.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Preferences::default()),
            store: None,
        }
    }

    /// Create a preference store backed by the durable store.
    pub fn with_store(store: Store) -> Self {
        Self {
            current: RwLock::new(Preferences::default()),
            store: Some(store),
        }
    }

    /// Load persisted preferences over the defaults.
    ///
    /// Called once before the first fetch. Missing or unreadable documents
    /// leave the defaults in place.
    pub async fn load(&self) {
        let Some(store) = &self.store else {
            return;
        };

        match settings::load_preferences(store.pool()).await {
            Ok(Some(prefs)) => {
                *self.current.write().await = prefs;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to load preferences, keeping defaults: {}", e);
            }
        }
    }

    /// Get a copy of the current preferences.
    pub async fn get(&self) -> Preferences {
        self.current.read().await.clone()
    }

    /// Replace the current preferences, persisting when backed by a store.
    pub async fn set(&self, preferences: Preferences) {
        *self.current.write().await = preferences.clone();

        if let Some(store) = &self.store {
            if let Err(e) = settings::save_preferences(store.pool(), &preferences).await {
                warn!("Failed to persist preferences: {}", e);
            }
        }
    }

    /// Apply an in-place change to the current preferences and persist the
    /// result.
    pub async fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut Preferences),
    {
        let mut updated = self.current.read().await.clone();
        apply(&mut updated);
        self.set(updated).await;
    }
}
