//! Ship (player) state and physics.
//!
//! The `Health`/ammo-tracking shape is grounded on the teacher's
//! `components::Health` and `components::EquippedWeapon`; the per-tick
//! integrate/friction/clamp/bounce step is the 2D narrowing of
//! `physics::step_character`'s ground-clamp idiom.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::ids::PlayerId;
use crate::weapons::WeaponKind;

pub const SHIP_COLLISION_RADIUS: f32 = 25.0;
pub const VELOCITY_DAMPING: f32 = 0.92;
pub const VELOCITY_EPSILON: f32 = 0.01;
pub const MAX_SPEED: f32 = 15.0;
pub const WALL_BOUNCE_DAMPING: f32 = -0.5;

/// A fixed neon palette, assigned to ships by insertion order (§4.8 Admit).
pub const COLOR_PALETTE: &[&str] = &[
    "#ff00ff", "#00ffff", "#ffff00", "#ff4444", "#44ff44", "#4444ff", "#ff8800", "#8800ff",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: PlayerId,
    pub external_player_key: Option<String>,
    pub display_label: String,
    pub color: String,
    pub position: Vec2,
    pub facing_rotation: f32,
    pub velocity: Vec2,
    pub health: f32,
    pub shield: f32,
    pub active_weapon: WeaponKind,
    /// `None` while holding the infinite-ammo machine gun.
    pub ammo: Option<u32>,
    pub kills: u32,
    pub deaths: u32,
    pub placement_points: i32,
    pub score_submitted: bool,
}

impl Ship {
    pub fn new(id: PlayerId, external_player_key: Option<String>, label: String, color: String, starting_health: f32) -> Self {
        Self {
            id,
            external_player_key,
            display_label: label,
            color,
            position: Vec2::ZERO,
            facing_rotation: 0.0,
            velocity: Vec2::ZERO,
            health: starting_health.clamp(0.0, 100.0),
            shield: 0.0,
            active_weapon: WeaponKind::MachineGun,
            ammo: None,
            kills: 0,
            deaths: 0,
            placement_points: 0,
            score_submitted: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Clamp the ship's position to the map bounds, reflecting and damping
    /// velocity on any axis that clamped (§4.2 ship physics).
    pub fn clamp_to_map_and_bounce(&mut self) {
        let (clamped_x, clamped_y) = self.position.clamp_to_map();
        if clamped_x {
            self.velocity.x *= WALL_BOUNCE_DAMPING;
        }
        if clamped_y {
            self.velocity.y *= WALL_BOUNCE_DAMPING;
        }
    }

    /// One tick of ship physics: integrate, apply friction, cap speed, clamp
    /// to map bounds with wall-bounce damping (§4.2).
    pub fn step_physics(&mut self) {
        self.position += self.velocity;
        self.velocity.x *= VELOCITY_DAMPING;
        self.velocity.y *= VELOCITY_DAMPING;
        if self.velocity.x.abs() < VELOCITY_EPSILON {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < VELOCITY_EPSILON {
            self.velocity.y = 0.0;
        }
        let speed = self.velocity.length();
        if speed > MAX_SPEED {
            let scale = MAX_SPEED / speed;
            self.velocity.x *= scale;
            self.velocity.y *= scale;
        }
        self.clamp_to_map_and_bounce();
    }

    pub fn is_moving_nontrivially(&self) -> bool {
        self.velocity.length() > VELOCITY_EPSILON
    }

    /// Apply damage, absorbing through shield first (§4.5 Shield Collect).
    /// Returns the amount that actually hit health (after shield absorption),
    /// clamped so health never goes negative.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let mut remaining = amount.max(0.0);
        if self.shield > 0.0 {
            let absorbed = remaining.min(self.shield);
            self.shield -= absorbed;
            remaining -= absorbed;
        }
        let before = self.health;
        self.health = (self.health - remaining).clamp(0.0, 100.0);
        before - self.health
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(100.0);
    }

    pub fn apply_knockback(&mut self, dvx: f32, dvy: f32) {
        self.velocity.x += dvx;
        self.velocity.y += dvy;
    }

    /// Reset state for a fresh life after the respawn timer fires (§4.9 step 3).
    pub fn respawn(&mut self, at: Vec2, starting_health: f32) {
        self.health = starting_health.clamp(0.0, 100.0);
        self.shield = 0.0;
        self.position = at;
        self.velocity = Vec2::ZERO;
        self.active_weapon = WeaponKind::MachineGun;
        self.ammo = None;
    }
}
