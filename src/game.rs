//! Run driver: lives, level progression, pause
//!
//! Owns the plan list and the current level attempt, and turns raw frame
//! deltas into clamped simulation time. The renderer and HUD observe the
//! level through [`Game::level`] after each frame.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::{Input, Level, PlanError, Status};

/// Where the run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Playing,
    Paused,
    /// Out of lives
    GameOver,
    /// All levels cleared
    Complete,
}

/// Noteworthy transition produced by a frame, for HUD text and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// A life was lost; the same level restarts
    LifeLost,
    /// Level cleared; the next one starts
    LevelWon,
    GameOver,
    GameComplete,
}

/// A full run across the level set
#[derive(Debug, Clone)]
pub struct Game {
    plans: Vec<Vec<String>>,
    level_index: usize,
    lives: u32,
    level: Level,
    phase: RunPhase,
    /// Per-attempt seeds (coin wobble phases) are drawn from here
    rng: Pcg32,
}

impl Game {
    /// Start a run over `plans`, validating every plan up front
    pub fn new(plans: Vec<Vec<String>>, seed: u64) -> Result<Self, PlanError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        if plans.is_empty() {
            return Err(PlanError::Empty);
        }
        // Fail fast: a malformed plan should never surface mid-run
        for plan in &plans[1..] {
            Level::from_plan(plan, &mut rng.clone())?;
        }
        let level = Level::from_plan(&plans[0], &mut rng)?;

        Ok(Self {
            plans,
            level_index: 0,
            lives: STARTING_LIVES,
            level,
            phase: RunPhase::Playing,
            rng,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Edge-triggered pause: freezes frames without touching level state
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            RunPhase::Playing => RunPhase::Paused,
            RunPhase::Paused => RunPhase::Playing,
            terminal => terminal,
        };
    }

    /// Advance the run by one frame
    ///
    /// `dt` is clamped to [`MAX_FRAME_DT`] so tab-switch stalls don't
    /// produce pathological jumps. Returns the transition this frame
    /// caused, if any.
    pub fn frame(&mut self, dt: f32, input: Input) -> Option<FrameEvent> {
        if self.phase != RunPhase::Playing {
            return None;
        }

        self.level.animate(dt.min(MAX_FRAME_DT), input);
        if !self.level.is_finished() {
            return None;
        }

        match self.level.status() {
            Status::Lost => {
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 {
                    self.phase = RunPhase::GameOver;
                    log::info!("game over on level {}", self.level_index + 1);
                    Some(FrameEvent::GameOver)
                } else {
                    log::info!(
                        "life lost on level {}, {} remaining",
                        self.level_index + 1,
                        self.lives
                    );
                    self.restart_level();
                    Some(FrameEvent::LifeLost)
                }
            }
            Status::Won => {
                if self.level_index + 1 < self.plans.len() {
                    self.level_index += 1;
                    log::info!("level {} cleared", self.level_index);
                    self.restart_level();
                    Some(FrameEvent::LevelWon)
                } else {
                    self.phase = RunPhase::Complete;
                    log::info!("run complete, all {} levels cleared", self.plans.len());
                    Some(FrameEvent::GameComplete)
                }
            }
            // is_finished implies a terminal status
            Status::Playing => None,
        }
    }

    /// Rebuild the current level for a fresh attempt
    ///
    /// Reseeded from the run RNG so retries don't replay identical coin
    /// wobble. Plans were validated in `new`, so failure here is
    /// impossible; the old level is kept if it somehow happens.
    fn restart_level(&mut self) {
        let seed = self.rng.random::<u64>();
        let mut rng = Pcg32::seed_from_u64(seed);
        match Level::from_plan(&self.plans[self.level_index], &mut rng) {
            Ok(level) => self.level = level,
            Err(err) => log::warn!("level {} rebuild failed: {err}", self.level_index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plans(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|plan| plan.iter().map(|row| row.to_string()).collect())
            .collect()
    }

    /// Player drops straight into lava
    const LOSE: &[&str] = &[
        "   ", //
        "@  ", //
        "!!!", //
    ];

    /// Coin one step to the right
    const WIN: &[&str] = &[
        "    ", //
        "@ o ", //
        "xxxx", //
    ];

    const RIGHT: Input = Input {
        left: false,
        right: true,
        up: false,
    };

    fn run_until_event(game: &mut Game, input: Input) -> Option<FrameEvent> {
        for _ in 0..10_000 {
            if let Some(event) = game.frame(1.0 / 60.0, input) {
                return Some(event);
            }
        }
        None
    }

    #[test]
    fn test_new_rejects_any_bad_plan() {
        let bad = plans(&[WIN, &["xx", "xx"]]);
        assert_eq!(Game::new(bad, 1).map(|_| ()), Err(PlanError::MissingPlayer));
    }

    #[test]
    fn test_losing_all_lives_ends_the_run() {
        let mut game = Game::new(plans(&[LOSE]), 1).unwrap();
        assert_eq!(game.lives(), STARTING_LIVES);

        assert_eq!(
            run_until_event(&mut game, Input::default()),
            Some(FrameEvent::LifeLost)
        );
        assert_eq!(game.lives(), 2);
        assert_eq!(
            run_until_event(&mut game, Input::default()),
            Some(FrameEvent::LifeLost)
        );
        assert_eq!(
            run_until_event(&mut game, Input::default()),
            Some(FrameEvent::GameOver)
        );
        assert_eq!(game.phase(), RunPhase::GameOver);

        // Terminal: further frames are no-ops
        assert_eq!(game.frame(1.0 / 60.0, Input::default()), None);
    }

    #[test]
    fn test_winning_advances_then_completes() {
        let mut game = Game::new(plans(&[WIN, WIN]), 2).unwrap();

        assert_eq!(run_until_event(&mut game, RIGHT), Some(FrameEvent::LevelWon));
        assert_eq!(game.level_index(), 1);
        assert_eq!(game.lives(), STARTING_LIVES);

        assert_eq!(
            run_until_event(&mut game, RIGHT),
            Some(FrameEvent::GameComplete)
        );
        assert_eq!(game.phase(), RunPhase::Complete);
    }

    #[test]
    fn test_pause_freezes_level_state() {
        let mut game = Game::new(plans(&[WIN]), 3).unwrap();
        let time_before = game.level().round_time();

        game.toggle_pause();
        assert_eq!(game.phase(), RunPhase::Paused);
        assert_eq!(game.frame(1.0 / 60.0, RIGHT), None);
        assert_eq!(game.level().round_time(), time_before);

        game.toggle_pause();
        game.frame(1.0 / 60.0, Input::default());
        assert!(game.level().round_time() < time_before);
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let mut game = Game::new(plans(&[WIN]), 4).unwrap();
        game.frame(5.0, Input::default());
        // A 5-second stall only costs MAX_FRAME_DT of round time
        assert!((game.level().round_time() - (TIME_PER_ROUND - MAX_FRAME_DT)).abs() < 1e-3);
    }
}
