//! One-shot collectible state (§3 Pickup, §4.5 Powerup system).
//!
//! Narrowed from the teacher's `items::ItemType` weighted-drop idiom down to
//! the three pickup kinds this arena has.

use serde::{Deserialize, Serialize};

use crate::ids::PickupId;
use crate::geometry::Vec2;
use crate::weapons::WeaponKind;

pub const PICKUP_RADIUS: f32 = 30.0;
pub const PICKUP_SPAWN_INTERVAL_MS: u64 = 3000;
pub const PICKUP_MAX_LIVE: usize = 5;
pub const HEALTH_PICKUP_AMOUNT: f32 = 50.0;
pub const SHIELD_PICKUP_AMOUNT: f32 = 30.0;

pub const WEAPON_KINDS: &[WeaponKind] = &[
    WeaponKind::TripleShot,
    WeaponKind::Shotgun,
    WeaponKind::Rocket,
    WeaponKind::Laser,
    WeaponKind::HomingMissiles,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickupKind {
    Weapon(WeaponKind),
    Health,
    Shield,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: PickupId,
    pub position: Vec2,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn new(id: PickupId, position: Vec2, kind: PickupKind) -> Self {
        Self { id, position, kind }
    }
}

/// Weighted draw per §4.5: Weapon 70%, Health 20%, Shield 10%; weapon kind
/// uniform over the five special weapons.
pub fn roll_pickup_kind() -> PickupKind {
    let roll = rand::random::<f32>();
    if roll < 0.70 {
        let idx = (rand::random::<f32>() * WEAPON_KINDS.len() as f32) as usize;
        PickupKind::Weapon(WEAPON_KINDS[idx.min(WEAPON_KINDS.len() - 1)])
    } else if roll < 0.90 {
        PickupKind::Health
    } else {
        PickupKind::Shield
    }
}
