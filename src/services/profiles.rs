use dashmap::DashMap;

use crate::models::{Profile, UserId};

/// In-memory profile store
///
/// Keyed by user id. Writes always succeed and overwrite wholesale
/// (re-registration replaces the record); profiles are never deleted.
/// Backed by a concurrent map so lookups on the matching path never
/// contend with registrations.
#[derive(Debug, Default)]
pub struct ProfileStore {
    inner: DashMap<UserId, Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the profile for a user
    pub fn set(&self, id: &str, profile: Profile) {
        self.inner.insert(id.to_string(), profile);
    }

    /// Look up a profile. `None` means the user never registered.
    pub fn get(&self, id: &str) -> Option<Profile> {
        self.inner.get(id).map(|entry| *entry.value())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
