//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the session
//! - No rendering or platform dependencies

pub mod actor;
pub mod field;
pub mod state;
pub mod tick;

pub use actor::{Bird, BirdVariant};
pub use field::{PipeField, PipePair};
pub use state::{Background, GameEvent, GameSession, PipeSkin, RoundPhase};
pub use tick::{TickInput, tick};
