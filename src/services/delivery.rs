use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::models::{OutboundEvent, UserId};

/// Errors that can occur delivering outbound events
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery channel closed")]
    ChannelClosed,
}

/// Sending half of the outbound delivery channel
///
/// This is the capability the engine consumes to reach users: a fire-and-
/// forget, at-least-once-attempted send. A failed send is reported to the
/// caller but never rolls back engine state.
pub type DeliverySender = UnboundedSender<OutboundEvent>;

/// Create the outbound delivery channel
///
/// The engine holds the sender; the transport layer (or a test) drains the
/// receiver and routes each event to its addressee.
pub fn channel() -> (DeliverySender, UnboundedReceiver<OutboundEvent>) {
    mpsc::unbounded_channel()
}

/// Hand an event to the delivery channel
///
/// Fails only when the receiving side is gone; callers log and move on,
/// since the state transition that produced the event has already committed.
pub fn send(sender: &DeliverySender, event: OutboundEvent) -> Result<(), DeliveryError> {
    sender.send(event).map_err(|_| DeliveryError::ChannelClosed)
}

/// Per-user mailboxes for transports that poll instead of push
///
/// Plain HTTP cannot push, so the gateway parks events here and clients
/// drain their own mailbox via `GET /events/{id}`. A mailbox that exceeds
/// its capacity drops new events (best-effort delivery; the engine state
/// transition has already committed).
#[derive(Debug)]
pub struct Mailboxes {
    inner: DashMap<UserId, Vec<OutboundEvent>>,
    capacity: usize,
}

impl Mailboxes {
    pub fn new(capacity: usize) -> Self {
        Self { inner: DashMap::new(), capacity }
    }

    /// Park an event in its addressee's mailbox
    pub fn push(&self, event: OutboundEvent) {
        let mut mailbox = self.inner.entry(event.to.clone()).or_default();
        if mailbox.len() >= self.capacity {
            tracing::warn!(
                "Mailbox for {} is full ({} events), dropping {:?}",
                event.to,
                mailbox.len(),
                event.event
            );
            return;
        }
        mailbox.push(event);
    }

    /// Take all pending events for a user, oldest first
    pub fn drain(&self, id: &str) -> Vec<OutboundEvent> {
        match self.inner.get_mut(id) {
            Some(mut mailbox) => std::mem::take(mailbox.value_mut()),
            None => Vec::new(),
        }
    }

    /// Drop a user's mailbox entirely (disconnect path)
    pub fn remove(&self, id: &str) {
        self.inner.remove(id);
    }

    pub fn pending(&self, id: &str) -> usize {
        self.inner.get(id).map(|m| m.len()).unwrap_or(0)
    }
}

/// Forward engine events from the delivery channel into the mailboxes
///
/// Runs until the engine side drops its sender.
pub fn spawn_dispatcher(
    mailboxes: std::sync::Arc<Mailboxes>,
    mut rx: UnboundedReceiver<OutboundEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            tracing::debug!("Dispatching {:?} to {}", event.event, event.to);
            mailboxes.push(event);
        }
        tracing::info!("Delivery channel closed, dispatcher exiting");
    })
}
