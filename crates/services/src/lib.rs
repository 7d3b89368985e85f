#![forbid(unsafe_code)]

pub mod error;
pub mod insights;
pub mod sessions;

pub use placement_core::Clock;
pub use sessions as session;

pub use error::SessionError;
pub use insights::{BehaviourProfile, BehaviourSignals, Insight, Suggestion};

pub use sessions::{
    PlacementSession, SessionController, SessionOutcome, SessionPhase, SessionProgress,
    SessionResult, SessionSnapshot,
};
