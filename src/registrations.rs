use crate::kv::KeyValueStore;
use crate::models::EventId;

pub const STORAGE_KEY: &str = "myEvents";

/// The set of event ids the local user registered for, stored as one JSON
/// array under [`STORAGE_KEY`]. Every query reads the backing store and
/// every mutation rewrites the whole array.
pub struct RegistrationStore<K> {
    kv: K,
}

impl<K: KeyValueStore> RegistrationStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn backing(&self) -> &K {
        &self.kv
    }

    pub fn is_registered(&self, id: &EventId) -> bool {
        self.load().contains(id)
    }

    pub fn register(&self, id: &EventId) -> bool {
        let mut ids = self.load();
        if ids.contains(id) {
            return false;
        }
        ids.push(id.clone());
        self.save(&ids)
    }

    pub fn cancel(&self, id: &EventId) -> bool {
        let mut ids = self.load();
        let Some(index) = ids.iter().position(|existing| existing == id) else {
            return false;
        };
        ids.remove(index);
        self.save(&ids)
    }

    /// Registered ids in registration order, without duplicates.
    pub fn list_registered_ids(&self) -> Vec<EventId> {
        self.load()
    }

    pub fn clear_all(&self) {
        if let Err(err) = self.kv.remove(STORAGE_KEY) {
            tracing::error!("failed to clear registrations: {err}");
        }
    }

    fn load(&self) -> Vec<EventId> {
        let raw = match self.kv.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::error!("failed to read registrations: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<EventId>>(&raw) {
            Ok(mut ids) => {
                let mut seen = Vec::with_capacity(ids.len());
                ids.retain(|id| {
                    if seen.contains(id) {
                        false
                    } else {
                        seen.push(id.clone());
                        true
                    }
                });
                ids
            }
            Err(err) => {
                tracing::warn!("stored registrations are corrupt, treating as empty: {err}");
                Vec::new()
            }
        }
    }

    fn save(&self, ids: &[EventId]) -> bool {
        let payload = match serde_json::to_string(ids) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("failed to encode registrations: {err}");
                return false;
            }
        };
        match self.kv.set(STORAGE_KEY, &payload) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("failed to persist registrations: {err}");
                false
            }
        }
    }
}
