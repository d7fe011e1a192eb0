use std::collections::HashMap;
use thiserror::Error;

use crate::models::UserId;

/// Errors raised by the session registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("user {0} already has an active partner")]
    AlreadyPaired(UserId),
}

/// Bidirectional mapping of currently paired users
///
/// The source of truth for "who is this user talking to". Each session is
/// stored as two entries (a -> b and b -> a) which are always created and
/// destroyed together, so the mapping stays symmetric.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    partners: HashMap<UserId, UserId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish a session between two users
    ///
    /// Fails if either user already has a partner. The engine's lock
    /// discipline should make that unreachable; this is the final
    /// consistency check.
    pub fn pair(&mut self, a: &str, b: &str) -> Result<(), RegistryError> {
        if self.partners.contains_key(a) {
            return Err(RegistryError::AlreadyPaired(a.to_string()));
        }
        if self.partners.contains_key(b) {
            return Err(RegistryError::AlreadyPaired(b.to_string()));
        }
        self.partners.insert(a.to_string(), b.to_string());
        self.partners.insert(b.to_string(), a.to_string());
        Ok(())
    }

    /// Tear down the session the user is in, if any
    ///
    /// Removes both directions of the mapping and returns the partner.
    pub fn unpair(&mut self, id: &str) -> Option<UserId> {
        let partner = self.partners.remove(id)?;
        self.partners.remove(&partner);
        Some(partner)
    }

    /// Current partner of the user, if any
    pub fn partner_of(&self, id: &str) -> Option<&UserId> {
        self.partners.get(id)
    }

    /// Number of active sessions (pairs, not entries)
    pub fn session_count(&self) -> usize {
        self.partners.len() / 2
    }
}
