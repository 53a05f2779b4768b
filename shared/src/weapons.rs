//! Weapon kinds and their stats.
//!
//! Same shape as the teacher's `WeaponType`/`WeaponStats`/`.stats()` idiom,
//! stripped of the 3D falloff/headshot/recoil model this arena doesn't use.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    MachineGun,
    TripleShot,
    Shotgun,
    Rocket,
    Laser,
    HomingMissiles,
}

/// Complete stats for a weapon kind.
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    /// Damage dealt per bullet on a direct hit.
    pub damage: f32,
    /// Minimum ticks between shots.
    pub fire_cooldown_ticks: u32,
    /// Number of bullets spawned per shot (TripleShot/Shotgun fan out).
    pub pellet_count: u32,
    /// `None` means unlimited ammo (machine gun); `Some(n)` is shots remaining
    /// when the weapon is picked up.
    pub starting_ammo: Option<u32>,
    /// Whether a shot from this weapon spawns a rocket bullet (area damage).
    pub is_rocket: bool,
}

impl WeaponKind {
    pub fn stats(&self) -> WeaponStats {
        match self {
            WeaponKind::MachineGun => WeaponStats {
                damage: 10.0,
                fire_cooldown_ticks: 6,
                pellet_count: 1,
                starting_ammo: None,
                is_rocket: false,
            },
            WeaponKind::TripleShot => WeaponStats {
                damage: 10.0,
                fire_cooldown_ticks: 10,
                pellet_count: 3,
                starting_ammo: Some(3),
                is_rocket: false,
            },
            WeaponKind::Shotgun => WeaponStats {
                damage: 8.0,
                fire_cooldown_ticks: 16,
                pellet_count: 5,
                starting_ammo: Some(3),
                is_rocket: false,
            },
            WeaponKind::Rocket => WeaponStats {
                damage: 100.0,
                fire_cooldown_ticks: 24,
                pellet_count: 1,
                starting_ammo: Some(3),
                is_rocket: true,
            },
            WeaponKind::Laser => WeaponStats {
                damage: 2.0,
                fire_cooldown_ticks: 1,
                pellet_count: 1,
                starting_ammo: Some(3),
                is_rocket: false,
            },
            WeaponKind::HomingMissiles => WeaponStats {
                damage: 40.0,
                fire_cooldown_ticks: 20,
                pellet_count: 1,
                starting_ammo: Some(3),
                is_rocket: true,
            },
        }
    }

    /// Shots remaining when this weapon is freshly picked up; `None` means
    /// infinite (only the default machine gun).
    pub fn starting_ammo(&self) -> Option<u32> {
        self.stats().starting_ammo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_gun_is_unlimited_ammo() {
        assert_eq!(WeaponKind::MachineGun.starting_ammo(), None);
    }

    #[test]
    fn test_special_weapons_have_three_shots() {
        for kind in [
            WeaponKind::TripleShot,
            WeaponKind::Shotgun,
            WeaponKind::Rocket,
            WeaponKind::Laser,
            WeaponKind::HomingMissiles,
        ] {
            assert_eq!(kind.starting_ammo(), Some(3));
        }
    }

    #[test]
    fn test_machine_gun_hit_matches_kill_scenario_damage() {
        // The "Kill" scenario in the spec configures 10 dmg machine-gun hits.
        assert!((WeaponKind::MachineGun.stats().damage - 10.0).abs() < 0.01);
    }
}
