//! Per-owner continuous beam state (§3 Laser beam, §4.6 Laser system).
//!
//! The teacher has no hitscan weapon to ground this on directly; the
//! point-to-segment hit test follows the same "resolve against a geometric
//! primitive, collect ids, apply effects after" shape as the teacher's
//! `weapons::detect_bullet_hits`.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

pub const LASER_DURATION_TICKS: u32 = 120;
pub const LASER_RANGE: f32 = 2000.0;
pub const LASER_HIT_RADIUS: f32 = 25.0;
pub const LASER_DAMAGE_PER_TICK: f32 = 2.0;
/// Extra margin added to a mine's trigger radius for laser-vs-mine tests.
pub const LASER_MINE_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserBeam {
    pub owner: PlayerId,
    pub current_angle: f32,
    pub ticks_remaining: u32,
}

impl LaserBeam {
    pub fn new(owner: PlayerId, angle: f32) -> Self {
        Self { owner, current_angle: angle, ticks_remaining: LASER_DURATION_TICKS }
    }

    /// Decrement the beam's remaining duration. Returns `true` once expired.
    pub fn tick(&mut self) -> bool {
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        self.ticks_remaining == 0
    }
}
