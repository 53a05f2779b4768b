//! Static mine state (§3 Mine, §4.4 Mine system).

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::ids::MineId;

pub const MINE_TRIGGER_RADIUS: f32 = 20.0;
pub const MINE_DAMAGE_RADIUS: f32 = 240.0;
pub const MINE_DAMAGE: f32 = 40.0;
pub const MINE_KNOCKBACK_MAX: f32 = 20.0;
pub const MINE_SPAWN_INTERVAL_MS: u64 = 2000;
pub const MINE_MAX_LIVE: usize = 10;
/// Deferred chain-reaction check, fired this long after the triggering
/// explosion (§4.4; the stagger is deliberate, visible to clients as a
/// cascading rumble).
pub const MINE_CHAIN_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub id: MineId,
    pub position: Vec2,
}

impl Mine {
    pub fn new(id: MineId, position: Vec2) -> Self {
        Self { id, position }
    }
}

/// Radial knockback magnitude at `distance` from the mine's epicentre
/// (§4.4 `Explode`: `20 × (1 − dist/damageRadius)`).
pub fn mine_knockback_magnitude(distance: f32) -> f32 {
    if distance >= MINE_DAMAGE_RADIUS {
        return 0.0;
    }
    MINE_KNOCKBACK_MAX * (1.0 - distance / MINE_DAMAGE_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockback_is_max_at_epicentre() {
        assert!((mine_knockback_magnitude(0.0) - MINE_KNOCKBACK_MAX).abs() < 0.001);
    }

    #[test]
    fn test_knockback_is_zero_at_damage_radius() {
        assert_eq!(mine_knockback_magnitude(MINE_DAMAGE_RADIUS), 0.0);
    }
}
