//! Level state: static grid, dynamic actors, and the win/lose machine
//!
//! A `Level` is constructed once per attempt from a textual plan and
//! discarded on retry or advance. The grid never changes after
//! construction; all motion happens in the actor list.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::actor;
use super::plan::PlanError;
use super::state::{Actor, ActorKind, Input, Obstacle, Status, Tile, TouchKind, overlaps};
use crate::consts::*;

/// A single level attempt
#[derive(Debug, Clone)]
pub struct Level {
    width: usize,
    height: usize,
    /// Indexed `[row][col]`, immutable after construction
    grid: Vec<Vec<Tile>>,
    /// Insertion order from the plan scan; order matters for `actor_at`
    actors: Vec<Actor>,
    player_id: u32,
    status: Status,
    /// Countdown started when status leaves `Playing`; keeps the level
    /// active briefly so the end state is visible
    finish_delay: Option<f32>,
    round_time: f32,
}

impl Level {
    /// Build a level from a rectangular character plan
    ///
    /// Rejects empty plans, ragged rows, and plans without exactly one `@`.
    /// Coin wobble phases are drawn from `rng` so the simulation stays
    /// deterministic for a given seed.
    pub fn from_plan<S: AsRef<str>>(plan: &[S], rng: &mut Pcg32) -> Result<Self, PlanError> {
        if plan.is_empty() || plan[0].as_ref().is_empty() {
            return Err(PlanError::Empty);
        }
        let width = plan[0].as_ref().chars().count();
        let height = plan.len();

        let mut grid = Vec::with_capacity(height);
        let mut actors = Vec::new();
        let mut player_id = None;
        let mut next_id = 1u32;

        for (y, line) in plan.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != width {
                return Err(PlanError::RaggedRow {
                    row: y,
                    len,
                    expected: width,
                });
            }

            let mut row = Vec::with_capacity(width);
            for (x, ch) in line.chars().enumerate() {
                let cell = Vec2::new(x as f32, y as f32);
                let tile = match ch {
                    'x' => Tile::Wall,
                    '!' => Tile::Lava,
                    '@' => {
                        if player_id.is_some() {
                            return Err(PlanError::MultiplePlayers);
                        }
                        player_id = Some(next_id);
                        actors.push(Actor::player(next_id, cell));
                        next_id += 1;
                        Tile::Empty
                    }
                    'o' => {
                        let wobble = rng.random::<f32>() * std::f32::consts::TAU;
                        actors.push(Actor::coin(next_id, cell, wobble));
                        next_id += 1;
                        Tile::Empty
                    }
                    '=' | '|' | 'v' => {
                        // The character table guarantees a lava variant here
                        if let Some(lava) = Actor::lava(next_id, cell, ch) {
                            actors.push(lava);
                            next_id += 1;
                        }
                        Tile::Empty
                    }
                    _ => Tile::Empty,
                };
                row.push(tile);
            }
            grid.push(row);
        }

        let player_id = player_id.ok_or(PlanError::MissingPlayer)?;

        Ok(Self {
            width,
            height,
            grid,
            actors,
            player_id,
            status: Status::Playing,
            finish_delay: None,
            round_time: TIME_PER_ROUND,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at a grid cell; used by the renderer for the background draw
    pub fn tile(&self, x: usize, y: usize) -> Tile {
        self.grid[y][x]
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub(crate) fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Remaining time budget for this attempt
    pub fn round_time(&self) -> f32 {
        self.round_time
    }

    /// The player actor
    ///
    /// `None` only if the never-removed invariant were broken; callers
    /// treat that as "nothing to do" rather than panicking.
    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == self.player_id)
    }

    pub(crate) fn player_index(&self) -> Option<usize> {
        self.actors.iter().position(|a| a.id == self.player_id)
    }

    /// Grid obstacle covered by the box `[pos, pos + size]`
    ///
    /// The box is expanded to whole cells with floor/ceil. Beyond the left,
    /// right, or top edge counts as wall; beyond the bottom edge counts as
    /// lava (falling out of the world). Otherwise the first non-empty cell
    /// in row-major scan order wins, matching the reference tie-breaking.
    pub fn obstacle_at(&self, pos: Vec2, size: Vec2) -> Option<Obstacle> {
        let x_start = pos.x.floor() as i64;
        let x_end = (pos.x + size.x).ceil() as i64;
        let y_start = pos.y.floor() as i64;
        let y_end = (pos.y + size.y).ceil() as i64;

        if x_start < 0 || x_end > self.width as i64 || y_start < 0 {
            return Some(Obstacle::Wall);
        }
        if y_end > self.height as i64 {
            return Some(Obstacle::Lava);
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                match self.grid[y as usize][x as usize] {
                    Tile::Wall => return Some(Obstacle::Wall),
                    Tile::Lava => return Some(Obstacle::Lava),
                    Tile::Empty => {}
                }
            }
        }
        None
    }

    /// First other actor whose box strictly overlaps `actor`, in list order
    pub fn actor_at(&self, actor: &Actor) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|other| other.id != actor.id && overlaps(actor, other))
    }

    /// Advance the simulation by `step` seconds
    ///
    /// Runs the round-time and finish-delay bookkeeping once, then slices
    /// `step` into sub-steps no larger than [`MAX_STEP`] and updates every
    /// actor each slice.
    pub fn animate(&mut self, step: f32, input: Input) {
        self.round_time = (self.round_time - step).max(0.0);
        if self.round_time <= 0.0 && self.status == Status::Playing {
            self.status = Status::Lost;
            self.finish_delay = Some(FINISH_DELAY);
        }

        if self.status != Status::Playing
            && let Some(delay) = &mut self.finish_delay
        {
            *delay -= step;
        }

        let mut remaining = step;
        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP);
            self.step_actors(dt, input);
            remaining -= dt;
        }
    }

    /// Update every actor for one sub-step, in list order
    ///
    /// Iterates over a snapshot of ids so coin removal mid-step can't skip
    /// or double-update anyone.
    fn step_actors(&mut self, dt: f32, input: Input) {
        let ids: Vec<u32> = self.actors.iter().map(|a| a.id).collect();
        for id in ids {
            let Some(idx) = self.actors.iter().position(|a| a.id == id) else {
                continue;
            };
            match self.actors[idx].kind {
                ActorKind::Coin { .. } => actor::step_coin(&mut self.actors[idx], dt),
                ActorKind::Lava { .. } => actor::step_lava(self, idx, dt),
                ActorKind::Player { .. } => actor::step_player(self, dt, input),
            }
        }
    }

    /// React to the player touching an obstacle or another actor
    ///
    /// Lava loses the level (one-shot: a later touch never resets the
    /// delay). Collecting the last coin wins it. Walls only block motion,
    /// which the caller handles by refusing to move.
    pub fn player_touched(&mut self, kind: TouchKind, actor_id: Option<u32>) {
        match kind {
            TouchKind::Lava if self.status == Status::Playing => {
                self.status = Status::Lost;
                self.finish_delay = Some(FINISH_DELAY);
            }
            TouchKind::Coin => {
                if let Some(id) = actor_id {
                    self.actors.retain(|a| a.id != id);
                }
                if !self.actors.iter().any(|a| a.kind.is_coin()) {
                    self.status = Status::Won;
                    self.finish_delay = Some(FINISH_DELAY);
                }
            }
            _ => {}
        }
    }

    /// Whether this attempt is over, including the end-of-level grace period
    pub fn is_finished(&self) -> bool {
        self.status != Status::Playing && self.finish_delay.is_some_and(|d| d < 0.0)
    }
}
