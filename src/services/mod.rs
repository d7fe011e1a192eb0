// Service exports
pub mod delivery;
pub mod profiles;

pub use delivery::{channel, send, spawn_dispatcher, DeliveryError, DeliverySender, Mailboxes};
pub use profiles::ProfileStore;
