use crate::core::compat::mutually_compatible;
use crate::models::{Profile, UserId};

/// First-fit matcher over a waiting-pool snapshot
///
/// # Policy
/// Scans candidates in insertion order and returns the **first** one that is
/// compatible both ways (see [`mutually_compatible`]). First-fit, not
/// best-fit: the earliest-enqueued compatible user wins, with no scoring or
/// ranking stage.
///
/// This is a pure query. It never mutates the pool; the engine applies the
/// dequeue-and-pair transition atomically after a hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Find a partner for the requester among the candidate snapshot
    ///
    /// `candidates` is the waiting pool snapshot resolved to profiles, in
    /// insertion order. The requester itself is skipped if present.
    pub fn find_match(
        &self,
        requester_id: &str,
        requester: &Profile,
        candidates: &[(UserId, Profile)],
    ) -> Option<UserId> {
        candidates
            .iter()
            .filter(|(id, _)| id != requester_id)
            .find(|(_, profile)| mutually_compatible(requester, profile))
            .map(|(id, _)| id.clone())
    }
}
