//! Lava Run - a grid-based browser platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid collision, actors, level state)
//! - `game`: Run driver (lives, level progression, pause)
//! - `levels`: Built-in level set
//! - `render`: DOM renderer (wasm only)

pub mod game;
pub mod levels;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod sim;

pub use game::{FrameEvent, Game, RunPhase};
pub use sim::{Input, Level, Status};

/// Game tuning constants
pub mod consts {
    /// Largest physics sub-step; larger slices would tunnel through
    /// one-cell-wide obstacles
    pub const MAX_STEP: f32 = 0.05;
    /// Frame delta clamp, so tab-switch stalls don't produce huge jumps
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Time budget per level attempt
    pub const TIME_PER_ROUND: f32 = 400.0;
    /// Grace period after the level is won or lost
    pub const FINISH_DELAY: f32 = 1.0;
    /// Lives at the start of a run
    pub const STARTING_LIVES: u32 = 3;

    /// Player horizontal speed (grid units/s)
    pub const PLAYER_X_SPEED: f32 = 7.0;
    /// Downward acceleration (grid units/s²)
    pub const GRAVITY: f32 = 30.0;
    /// Upward impulse applied when jumping off a surface
    pub const JUMP_SPEED: f32 = 17.0;

    /// Coin wobble frequency (radians/s)
    pub const WOBBLE_SPEED: f32 = 8.0;
    /// Coin wobble amplitude (grid units)
    pub const WOBBLE_DIST: f32 = 0.07;

    /// Display scale (pixels per grid unit)
    pub const SCALE: f64 = 64.0;
}
