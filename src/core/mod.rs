// Core engine exports
pub mod compat;
pub mod engine;
pub mod matcher;
pub mod pool;
pub mod registry;

pub use compat::mutually_compatible;
pub use engine::{Engine, EngineError, MatchOutcome, StopOutcome};
pub use matcher::Matcher;
pub use pool::WaitingPool;
pub use registry::{RegistryError, SessionRegistry};
