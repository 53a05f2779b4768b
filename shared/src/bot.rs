//! Bot (server-simulated NPC ship) state.
//!
//! Narrowed from the teacher's `npc::Npc`/`NpcPosition`/`NpcRotation` plus
//! the A*-wander state machine — this arena's bots only wander and fire, no
//! pathfinding or archetypes.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::ids::BotId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub id: BotId,
    pub label: String,
    pub position: Vec2,
    pub heading: f32,
    pub health: f32,
}

impl Bot {
    pub fn new(id: BotId, position: Vec2, health: f32) -> Self {
        Self { id, label: id.to_string(), position, heading: 0.0, health }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn apply_damage(&mut self, amount: f32, max_health: f32) {
        self.health = (self.health - amount).clamp(0.0, max_health);
    }
}
