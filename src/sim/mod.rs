//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep with sub-stepping only
//! - Seeded RNG only
//! - Stable iteration order (actor list order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod level;
pub mod plan;
pub mod state;

pub use level::Level;
pub use plan::{PlanError, decode_packed};
pub use state::{Actor, ActorKind, Input, Obstacle, Status, Tile, TouchKind};
