//! Mutable game settings, patched only by the admin channel (§3 GameSettings).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameSettings {
    pub bot_speed: f32,
    pub bot_count: u32,
    pub bot_health: f32,
    pub player_starting_health: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            bot_speed: 3.0,
            bot_count: 5,
            bot_health: 100.0,
            player_starting_health: 100.0,
        }
    }
}

/// A partial patch to `GameSettings`; `None` fields are left untouched
/// (§4.10 `updateSettings(partial)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_starting_health: Option<f32>,
}

impl GameSettings {
    pub fn apply_patch(&mut self, patch: &GameSettingsPatch) {
        if let Some(v) = patch.bot_speed {
            self.bot_speed = v;
        }
        if let Some(v) = patch.bot_count {
            self.bot_count = v;
        }
        if let Some(v) = patch.bot_health {
            self.bot_health = v.clamp(1.0, 100.0);
        }
        if let Some(v) = patch.player_starting_health {
            self.player_starting_health = v.clamp(1.0, 100.0);
        }
    }
}
