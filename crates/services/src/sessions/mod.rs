mod controller;
mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{SessionController, SessionOutcome, SessionPhase};
pub use progress::{SessionProgress, SessionSnapshot};
pub use workflow::{PlacementSession, SessionResult, analyze_outcome};
