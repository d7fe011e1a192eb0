use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::matcher::Matcher;
use crate::core::pool::WaitingPool;
use crate::core::registry::{RegistryError, SessionRegistry};
use crate::models::{ChatEvent, Profile, UserId};
use crate::services::delivery::{self, DeliverySender};
use crate::services::profiles::ProfileStore;

/// Errors reported to the originating user
///
/// All recoverable: a rejected request never affects other users' sessions
/// or the waiting pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("user {0} is not registered")]
    NotRegistered(UserId),

    #[error("user {0} is already in a chat")]
    AlreadyInSession(UserId),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result of a match request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Paired with a partner; both sides were notified
    Matched { partner: UserId },
    /// No compatible candidate; the user entered the waiting pool
    Waiting,
}

/// Result of a stop request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// A session was torn down; the partner was notified
    LeftSession { partner: UserId },
    /// A pending wait was cancelled
    CancelledWait,
    /// The user was neither paired nor waiting (stop is idempotent)
    Idle,
}

/// Pool and registry guarded together
///
/// One lock over both structures is what guarantees a waiting user is
/// matched at most once: the scan, the dequeue of the chosen candidate, and
/// the pair installation happen under a single write guard.
#[derive(Debug, Default)]
struct PairingState {
    pool: WaitingPool,
    registry: SessionRegistry,
}

/// The pairing and relay engine
///
/// Owns all mutable state (profiles, waiting pool, active sessions) and
/// funnels every mutation through its synchronized operations. Pairing
/// transitions (`request_match`, `stop`, `next`) take the write lock;
/// message relay only takes a read lock, so relays for unrelated sessions
/// proceed concurrently.
///
/// Outbound notifications go through the delivery channel *after* the state
/// transition commits; a failed send is logged and never rolls state back.
#[derive(Debug)]
pub struct Engine {
    profiles: ProfileStore,
    pairing: RwLock<PairingState>,
    matcher: Matcher,
    delivery: DeliverySender,
}

impl Engine {
    pub fn new(delivery: DeliverySender) -> Self {
        Self {
            profiles: ProfileStore::new(),
            pairing: RwLock::new(PairingState::default()),
            matcher: Matcher::new(),
            delivery,
        }
    }

    /// Store or overwrite a user's profile
    pub fn register(&self, id: &str, profile: Profile) {
        tracing::info!("Registering profile for {}", id);
        self.profiles.set(id, profile);
    }

    /// Look up a user's profile
    pub fn get_profile(&self, id: &str) -> Option<Profile> {
        self.profiles.get(id)
    }

    /// Current partner of the user, if any
    pub async fn partner_of(&self, id: &str) -> Option<UserId> {
        self.pairing.read().await.registry.partner_of(id).cloned()
    }

    /// Whether the user is in the waiting pool
    pub async fn is_waiting(&self, id: &str) -> bool {
        self.pairing.read().await.pool.contains(id)
    }

    pub async fn waiting_count(&self) -> usize {
        self.pairing.read().await.pool.len()
    }

    pub async fn session_count(&self) -> usize {
        self.pairing.read().await.registry.session_count()
    }

    /// Find a partner for the user, or enqueue them to wait
    ///
    /// Preconditions: the user must be registered and not already paired.
    /// On a hit the chosen candidate leaves the pool and the session is
    /// installed atomically; on a miss the user joins the pool. Both sides
    /// of a new session receive a `Matched` notification.
    pub async fn request_match(&self, id: &str) -> Result<MatchOutcome, EngineError> {
        let profile = self
            .profiles
            .get(id)
            .ok_or_else(|| EngineError::NotRegistered(id.to_string()))?;

        let (outcome, events) = {
            let mut state = self.pairing.write().await;
            if state.registry.partner_of(id).is_some() {
                return Err(EngineError::AlreadyInSession(id.to_string()));
            }
            self.match_locked(&mut state, id, &profile)?
        };

        self.notify_all(events);
        Ok(outcome)
    }

    /// Leave the current chat, or cancel a pending wait
    ///
    /// Idempotent: never an error, and a second call notifies no partner.
    /// The user gets a `LeftChat` acknowledgment regardless. A user
    /// disconnecting from the transport is modeled as this same operation.
    pub async fn stop(&self, id: &str) -> StopOutcome {
        let (outcome, events) = {
            let mut state = self.pairing.write().await;
            Self::stop_locked(&mut state, id)
        };

        if let StopOutcome::LeftSession { ref partner } = outcome {
            tracing::info!("{} left chat with {}", id, partner);
        }
        self.notify_all(events);
        outcome
    }

    /// Leave the current chat and immediately look for a new partner
    ///
    /// Both steps run under one write guard, so no concurrent matcher can
    /// observe the user half-torn-down. With no compatible candidate the
    /// user ends up waiting, exactly as a plain match request would.
    ///
    /// The teardown half runs even for an unregistered user: the `LeftChat`
    /// ack is emitted before `NotRegistered` comes back, unlike
    /// [`request_match`](Self::request_match) which emits nothing on that
    /// error.
    pub async fn next(&self, id: &str) -> Result<MatchOutcome, EngineError> {
        let profile = self.profiles.get(id);

        let mut events = Vec::new();
        let result = {
            let mut state = self.pairing.write().await;
            let (_, stop_events) = Self::stop_locked(&mut state, id);
            events.extend(stop_events);
            match profile {
                None => Err(EngineError::NotRegistered(id.to_string())),
                Some(profile) => match self.match_locked(&mut state, id, &profile) {
                    Ok((outcome, match_events)) => {
                        events.extend(match_events);
                        Ok(outcome)
                    }
                    Err(e) => Err(e),
                },
            }
        };

        self.notify_all(events);
        result
    }

    /// Relay a text message to the sender's current partner
    ///
    /// Returns whether the message was handed to delivery. A sender with no
    /// active partner gets `false` and the message is dropped silently (no
    /// notification is emitted to the sender); no state changes either way.
    pub async fn message(&self, id: &str, text: &str) -> bool {
        let partner = self.pairing.read().await.registry.partner_of(id).cloned();
        match partner {
            Some(partner) => {
                self.notify(&partner, ChatEvent::Text { body: text.to_string() });
                true
            }
            None => {
                tracing::debug!("Dropping message from {}: no active partner", id);
                false
            }
        }
    }

    /// The scan / dequeue / pair transition, under the caller's write guard
    fn match_locked(
        &self,
        state: &mut PairingState,
        id: &str,
        profile: &Profile,
    ) -> Result<(MatchOutcome, Vec<(UserId, ChatEvent)>), EngineError> {
        let candidates: Vec<(UserId, Profile)> = state
            .pool
            .candidates()
            .into_iter()
            .filter_map(|cid| self.profiles.get(&cid).map(|p| (cid, p)))
            .collect();

        match self.matcher.find_match(id, profile, &candidates) {
            Some(partner) => {
                state.pool.dequeue(&partner);
                // The requester may still be queued from an earlier request
                state.pool.dequeue(id);
                state.registry.pair(id, &partner)?;
                tracing::info!("Matched {} with {}", id, partner);
                let events = vec![
                    (partner.clone(), ChatEvent::Matched),
                    (id.to_string(), ChatEvent::Matched),
                ];
                Ok((MatchOutcome::Matched { partner }, events))
            }
            None => {
                state.pool.enqueue(id);
                tracing::debug!("No candidate for {}, queued to wait", id);
                Ok((MatchOutcome::Waiting, vec![(id.to_string(), ChatEvent::Waiting)]))
            }
        }
    }

    /// Session/pool teardown, under the caller's write guard
    fn stop_locked(state: &mut PairingState, id: &str) -> (StopOutcome, Vec<(UserId, ChatEvent)>) {
        if let Some(partner) = state.registry.unpair(id) {
            let events = vec![
                (partner.clone(), ChatEvent::PartnerLeft),
                (id.to_string(), ChatEvent::LeftChat),
            ];
            (StopOutcome::LeftSession { partner }, events)
        } else if state.pool.dequeue(id) {
            (StopOutcome::CancelledWait, vec![(id.to_string(), ChatEvent::LeftChat)])
        } else {
            (StopOutcome::Idle, vec![(id.to_string(), ChatEvent::LeftChat)])
        }
    }

    fn notify_all(&self, events: Vec<(UserId, ChatEvent)>) {
        for (to, event) in events {
            self.notify(&to, event);
        }
    }

    fn notify(&self, to: &str, event: ChatEvent) {
        let outbound = crate::models::OutboundEvent::new(to.to_string(), event);
        if let Err(e) = delivery::send(&self.delivery, outbound) {
            // State already committed; delivery is best-effort
            tracing::warn!("Dropping notification for {}: {}", to, e);
        }
    }
}
