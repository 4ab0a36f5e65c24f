//! Core simulation types
//!
//! Tiles, actors, and the small value types passed through the update loop.

use glam::Vec2;

use crate::consts::*;

/// One cell of the static level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Lava,
}

/// Whether the level is still being played, or how it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Lost,
    Won,
}

/// Result of a grid collision query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstacle {
    Wall,
    Lava,
}

impl Obstacle {
    /// The touch report this obstacle produces when it blocks the player
    pub fn touch(self) -> TouchKind {
        match self {
            Obstacle::Wall => TouchKind::Wall,
            Obstacle::Lava => TouchKind::Lava,
        }
    }
}

/// What the player ran into, reported to [`Level::player_touched`]
///
/// [`Level::player_touched`]: super::Level::player_touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Wall,
    Lava,
    Coin,
    Player,
}

/// Input snapshot for one frame (deterministic)
///
/// Copied once per frame before the sub-step loop, so actor updates never
/// observe input changing mid-tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

/// Variant-specific actor state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorKind {
    Player {
        /// Current velocity (x driven by input, y by gravity)
        speed: Vec2,
    },
    Coin {
        /// Anchor the wobble oscillates around
        base_pos: Vec2,
        /// Wobble phase (radians)
        wobble: f32,
    },
    Lava {
        speed: Vec2,
        /// Spawn position to teleport back to; set only for the dripping
        /// variant (`v`)
        reset_pos: Option<Vec2>,
    },
}

impl ActorKind {
    /// The touch report produced when the player overlaps this actor
    pub fn touch(&self) -> TouchKind {
        match self {
            ActorKind::Player { .. } => TouchKind::Player,
            ActorKind::Coin { .. } => TouchKind::Coin,
            ActorKind::Lava { .. } => TouchKind::Lava,
        }
    }

    pub fn is_coin(&self) -> bool {
        matches!(self, ActorKind::Coin { .. })
    }
}

/// A dynamic entity in a level
///
/// `pos` is the top-left corner of the axis-aligned bounding box; all
/// coordinates are in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ActorKind,
}

impl Actor {
    /// Spawn the player at a grid cell
    ///
    /// Shifted up half a unit so the 1.5-unit-tall body rests on the cell
    /// below the spawn marker.
    pub fn player(id: u32, cell: Vec2) -> Self {
        Self {
            id,
            pos: cell + Vec2::new(0.0, -0.5),
            size: Vec2::new(0.8, 1.5),
            kind: ActorKind::Player { speed: Vec2::ZERO },
        }
    }

    /// Spawn a coin centered in its grid cell, with the given wobble phase
    pub fn coin(id: u32, cell: Vec2, wobble: f32) -> Self {
        let pos = cell + Vec2::new(0.2, 0.1);
        Self {
            id,
            pos,
            size: Vec2::new(0.6, 0.6),
            kind: ActorKind::Coin {
                base_pos: pos,
                wobble,
            },
        }
    }

    /// Spawn a moving lava block from its plan character
    ///
    /// `=` moves horizontally, `|` vertically, `v` drips (falls fast and
    /// resets to its spawn point instead of bouncing). Returns `None` for
    /// any other character.
    pub fn lava(id: u32, cell: Vec2, ch: char) -> Option<Self> {
        let (speed, reset_pos) = match ch {
            '=' => (Vec2::new(2.0, 0.0), None),
            '|' => (Vec2::new(0.0, 2.0), None),
            'v' => (Vec2::new(0.0, 3.0), Some(cell)),
            _ => return None,
        };
        Some(Self {
            id,
            pos: cell,
            size: Vec2::ONE,
            kind: ActorKind::Lava { speed, reset_pos },
        })
    }

    /// Displayed wobble offset for a coin (pure function of phase)
    pub fn wobble_offset(wobble: f32) -> f32 {
        wobble.sin() * WOBBLE_DIST
    }
}

/// Strict AABB overlap: touching edges do not count
pub fn overlaps(a: &Actor, b: &Actor) -> bool {
    a.pos.x + a.size.x > b.pos.x
        && a.pos.x < b.pos.x + b.size.x
        && a.pos.y + a.size.y > b.pos.y
        && a.pos.y < b.pos.y + b.size.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lava_variants() {
        let horizontal = Actor::lava(1, Vec2::new(3.0, 2.0), '=').unwrap();
        assert_eq!(
            horizontal.kind,
            ActorKind::Lava {
                speed: Vec2::new(2.0, 0.0),
                reset_pos: None
            }
        );

        let dripping = Actor::lava(2, Vec2::new(5.0, 1.0), 'v').unwrap();
        let ActorKind::Lava { speed, reset_pos } = dripping.kind else {
            panic!("expected lava");
        };
        assert_eq!(speed, Vec2::new(0.0, 3.0));
        assert_eq!(reset_pos, Some(Vec2::new(5.0, 1.0)));

        assert!(Actor::lava(3, Vec2::ZERO, 'x').is_none());
    }

    #[test]
    fn test_player_spawn_alignment() {
        let player = Actor::player(1, Vec2::new(4.0, 6.0));
        // Bottom of the box sits on the top edge of the row below the marker
        assert_eq!(player.pos.y + player.size.y, 7.0);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Actor::coin(1, Vec2::new(0.0, 0.0), 0.0);
        let mut b = a;
        b.id = 2;

        // Identical boxes overlap
        assert!(overlaps(&a, &b));

        // Edge-touching boxes do not
        b.pos.x = a.pos.x + a.size.x;
        assert!(!overlaps(&a, &b));

        b.pos.x = a.pos.x + a.size.x - 0.001;
        assert!(overlaps(&a, &b));
    }
}
