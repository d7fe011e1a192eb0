use crate::models::UserId;

/// Ordered collection of users currently seeking a match
///
/// Insertion order is significant: the matcher scans candidates
/// first-in-first-matched. A user appears at most once, and callers
/// (the engine) guarantee a user is never simultaneously waiting and
/// in an active session.
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: Vec<UserId>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user to the back of the pool. No-op if already present.
    pub fn enqueue(&mut self, id: &str) {
        if !self.contains(id) {
            self.entries.push(id.to_string());
        }
    }

    /// Remove a user from the pool. Returns whether the user was present.
    pub fn dequeue(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e == id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the currently waiting users, in insertion order
    ///
    /// This is a point-in-time copy, not a live cursor: the matcher can
    /// iterate it repeatedly without observing concurrent mutation.
    pub fn candidates(&self) -> Vec<UserId> {
        self.entries.clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
