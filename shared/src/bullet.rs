//! In-flight projectile state and motion (§3 Bullet, §4.3 Bullet system).
//!
//! Grounded on the teacher's `components::Bullet`/`BulletVelocity` pair and
//! `weapons::simulate_bullets`'s integrate-then-bounce-then-expire loop,
//! narrowed from 3D ray/capsule tests to flat 2D distance tests (the actual
//! collision resolution against ships/mines lives in `server::room::bullets`,
//! since it needs the full world to test against).

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::ids::{BulletId, BotId, PlayerId};

pub const STANDARD_BULLET_SPEED: f32 = 15.0;
pub const ROCKET_BULLET_SPEED: f32 = 6.0;
pub const STANDARD_BULLET_LIFETIME_TICKS: u32 = 120;
pub const ROCKET_BULLET_LIFETIME_TICKS: u32 = 180;
/// Extra margin added to a ship's collision radius for bullet-vs-ship tests.
pub const BULLET_HIT_MARGIN: f32 = 3.0;
pub const ROCKET_EXPLOSION_RADIUS: f32 = 150.0;
pub const ROCKET_MAX_DAMAGE: f32 = 100.0;
pub const ROCKET_MAX_KNOCKBACK: f32 = 25.0;
/// Knockback impulse applied along a standard (non‑rocket) bullet's
/// direction of travel on a direct hit.
pub const BULLET_KNOCKBACK_MAGNITUDE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player(PlayerId),
    Bot(BotId),
}

impl BulletOwner {
    pub fn is_player(&self, id: PlayerId) -> bool {
        matches!(self, BulletOwner::Player(p) if *p == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: BulletId,
    pub owner: BulletOwner,
    pub position: Vec2,
    pub velocity: Vec2,
    pub remaining_lifetime_ticks: u32,
    pub is_rocket: bool,
    /// Direct-hit damage, captured from the firing weapon at spawn time so a
    /// later weapon swap on the owner's ship doesn't retroactively change an
    /// in-flight bullet's damage.
    pub damage: f32,
}

impl Bullet {
    pub fn spawn(id: BulletId, owner: BulletOwner, origin: Vec2, angle: f32, is_rocket: bool, damage: f32) -> Self {
        let speed = if is_rocket { ROCKET_BULLET_SPEED } else { STANDARD_BULLET_SPEED };
        let lifetime = if is_rocket { ROCKET_BULLET_LIFETIME_TICKS } else { STANDARD_BULLET_LIFETIME_TICKS };
        Self {
            id,
            owner,
            position: origin,
            velocity: Vec2::from_angle(angle) * speed,
            remaining_lifetime_ticks: lifetime,
            is_rocket,
            damage,
        }
    }

    /// Integrate one tick; bounce off walls (reflect + snap); decrement
    /// lifetime. Returns `true` if the bullet has expired and should be
    /// removed.
    pub fn step(&mut self) -> bool {
        self.position += self.velocity;
        let (clamped_x, clamped_y) = self.position.clamp_to_map();
        if clamped_x {
            self.velocity.x = -self.velocity.x;
        }
        if clamped_y {
            self.velocity.y = -self.velocity.y;
        }
        self.remaining_lifetime_ticks = self.remaining_lifetime_ticks.saturating_sub(1);
        self.remaining_lifetime_ticks == 0
    }
}

/// Linear falloff damage for a rocket explosion: full damage at the
/// epicentre, zero at `ROCKET_EXPLOSION_RADIUS`.
pub fn rocket_falloff_damage(distance: f32) -> f32 {
    if distance >= ROCKET_EXPLOSION_RADIUS {
        return 0.0;
    }
    ROCKET_MAX_DAMAGE * (1.0 - distance / ROCKET_EXPLOSION_RADIUS)
}

/// Linear falloff knockback magnitude for a rocket explosion.
pub fn rocket_falloff_knockback(distance: f32) -> f32 {
    if distance >= ROCKET_EXPLOSION_RADIUS {
        return 0.0;
    }
    ROCKET_MAX_KNOCKBACK * (1.0 - distance / ROCKET_EXPLOSION_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounce_scenario_reflects_velocity_at_wall() {
        // Bounce scenario: bullet near the east wall heading east.
        let origin = Vec2::new(crate::geometry::MAP_HALF_W - 10.0, 0.0);
        let mut b = Bullet::spawn(BulletId(1), BulletOwner::Player(PlayerId(1)), origin, 0.0, false, 10.0);
        assert!((b.velocity.x - STANDARD_BULLET_SPEED).abs() < 0.001);
        b.step();
        assert!((b.position.x - crate::geometry::MAP_HALF_W).abs() < 0.001);
        assert!((b.velocity.x - (-STANDARD_BULLET_SPEED)).abs() < 0.001);
    }

    #[test]
    fn test_lifetime_expires_to_zero() {
        let mut b = Bullet::spawn(BulletId(1), BulletOwner::Player(PlayerId(1)), Vec2::ZERO, 0.0, false, 10.0);
        let mut expired = false;
        for _ in 0..STANDARD_BULLET_LIFETIME_TICKS {
            expired = b.step();
        }
        assert!(expired);
        assert_eq!(b.remaining_lifetime_ticks, 0);
    }

    #[test]
    fn test_rocket_damage_is_max_at_epicentre_and_zero_at_radius() {
        assert!((rocket_falloff_damage(0.0) - ROCKET_MAX_DAMAGE).abs() < 0.001);
        assert_eq!(rocket_falloff_damage(ROCKET_EXPLOSION_RADIUS), 0.0);
        assert_eq!(rocket_falloff_damage(ROCKET_EXPLOSION_RADIUS + 1.0), 0.0);
    }

    #[test]
    fn test_owner_never_matches_a_different_players_bullet() {
        let owner = BulletOwner::Player(PlayerId(1));
        assert!(!owner.is_player(PlayerId(2)));
        assert!(owner.is_player(PlayerId(1)));
    }
}
