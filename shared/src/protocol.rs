//! Wire protocol: tagged inbound/outbound event enums (§6, §9).
//!
//! The reference transport is schemaless JSON; per the design notes this
//! reimplementation defines one tagged variant per event, adjacently tagged
//! as `{"event": "<name>", "data": {...}}`, and validates shape at
//! deserialization time. This plays the same role as the teacher's
//! `protocol.rs` (one struct per message type), generalized from lightyear's
//! binary message registration to an adjacently-tagged JSON sum type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::{BotId, BulletId, MineId, PickupId, PlayerId};
use crate::settings::{GameSettings, GameSettingsPatch};
use crate::weapons::WeaponKind;

// ---------------------------------------------------------------------
// Inbound (client -> server)
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "cursor:move")]
    CursorMove { x: f32, y: f32, rotation: f32 },

    #[serde(rename = "bullet:shoot")]
    BulletShoot {
        x: f32,
        y: f32,
        angle: f32,
        #[serde(default)]
        is_rocket: bool,
    },

    #[serde(rename = "laser:shoot")]
    LaserShoot { x: f32, y: f32, angle: f32 },

    #[serde(rename = "health:damage")]
    HealthDamage {
        #[serde(rename = "userId")]
        user_id: PlayerId,
        health: f32,
        #[serde(rename = "attackerId", default)]
        attacker_id: Option<PlayerId>,
    },

    #[serde(rename = "admin:login")]
    AdminLogin { password: String },

    #[serde(rename = "admin:getPlayers")]
    AdminGetPlayers { token: String },

    #[serde(rename = "admin:getBots")]
    AdminGetBots { token: String },

    #[serde(rename = "admin:addBot")]
    AdminAddBot { token: String },

    #[serde(rename = "admin:removeBot")]
    AdminRemoveBot { token: String, id: BotId },

    #[serde(rename = "admin:removeAllBots")]
    AdminRemoveAllBots { token: String },

    /// `id` is a raw id string rather than `PlayerId` so a bot-shaped id
    /// ("bot5") still deserializes — the handler distinguishes the two and
    /// replies `admin:error` with `CannotKickBot` instead of dropping the
    /// frame as malformed.
    #[serde(rename = "admin:kickPlayer")]
    AdminKickPlayer { token: String, id: String },

    #[serde(rename = "admin:kickAll")]
    AdminKickAll { token: String },

    #[serde(rename = "admin:getSettings")]
    AdminGetSettings { token: String },

    #[serde(rename = "admin:updateSettings")]
    AdminUpdateSettings {
        token: String,
        settings: GameSettingsPatch,
    },

    #[serde(rename = "admin:endGame")]
    AdminEndGame { token: String },
}

// ---------------------------------------------------------------------
// Outbound (server -> client)
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorKind {
    Player,
    Bot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorInfo {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub color: String,
    pub label: String,
    pub health: f32,
    #[serde(rename = "type")]
    pub kind: CursorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_weapon: Option<WeaponKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shield: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_id: String,
    pub player_name: String,
    pub score: u8,
    pub kills: u32,
    pub deaths: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPlayerInfo {
    pub id: PlayerId,
    pub label: String,
    pub health: f32,
    pub kills: u32,
    pub deaths: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBotInfo {
    pub id: BotId,
    pub label: String,
    pub health: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "player:info")]
    PlayerInfo {
        #[serde(rename = "userId")]
        user_id: PlayerId,
        label: String,
        color: String,
        kills: u32,
        deaths: u32,
        health: f32,
    },

    #[serde(rename = "user:joined")]
    UserJoined {
        #[serde(rename = "userId")]
        user_id: PlayerId,
        #[serde(flatten)]
        cursor: CursorInfo,
    },

    #[serde(rename = "user:left")]
    UserLeft {
        #[serde(rename = "userId")]
        user_id: PlayerId,
    },

    #[serde(rename = "cursors:sync")]
    CursorsSync { cursors: HashMap<String, CursorInfo> },

    #[serde(rename = "cursor:update")]
    CursorUpdate {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(flatten)]
        cursor: CursorInfo,
    },

    #[serde(rename = "bullet:spawn")]
    BulletSpawn {
        #[serde(rename = "bulletId")]
        bullet_id: BulletId,
        #[serde(rename = "userId")]
        user_id: String,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        color: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "isRocket")]
        is_rocket: Option<bool>,
    },

    #[serde(rename = "health:update")]
    HealthUpdate {
        #[serde(rename = "userId")]
        user_id: String,
        health: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        shield: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "attackerId")]
        attacker_id: Option<String>,
    },

    #[serde(rename = "knockback")]
    Knockback {
        #[serde(rename = "userId")]
        user_id: String,
        vx: f32,
        vy: f32,
    },

    #[serde(rename = "mine:spawn")]
    MineSpawn {
        #[serde(rename = "mineId")]
        mine_id: MineId,
        x: f32,
        y: f32,
    },

    #[serde(rename = "mine:sync")]
    MineSync { mines: Vec<(MineId, f32, f32)> },

    #[serde(rename = "mine:explode")]
    MineExplode {
        #[serde(rename = "mineId")]
        mine_id: MineId,
        x: f32,
        y: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "triggeredBy")]
        triggered_by: Option<String>,
    },

    #[serde(rename = "powerup:spawn")]
    PowerupSpawn {
        #[serde(rename = "powerUpId")]
        power_up_id: PickupId,
        x: f32,
        y: f32,
        #[serde(rename = "type")]
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "weaponType")]
        weapon_type: Option<WeaponKind>,
    },

    #[serde(rename = "powerup:sync")]
    PowerupSync {
        powerups: Vec<(PickupId, f32, f32, String, Option<WeaponKind>)>,
    },

    #[serde(rename = "powerup:collect")]
    PowerupCollect {
        #[serde(rename = "powerUpId")]
        power_up_id: PickupId,
        #[serde(rename = "userId")]
        user_id: PlayerId,
        #[serde(rename = "type")]
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "weaponType")]
        weapon_type: Option<WeaponKind>,
    },

    #[serde(rename = "laser:spawn")]
    LaserSpawn {
        #[serde(rename = "userId")]
        user_id: PlayerId,
        x: f32,
        y: f32,
        angle: f32,
        color: String,
    },

    #[serde(rename = "player:killed")]
    PlayerKilled {
        #[serde(rename = "victimId")]
        victim_id: PlayerId,
        #[serde(rename = "victimName")]
        victim_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "attackerId")]
        attacker_id: Option<PlayerId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "attackerName")]
        attacker_name: Option<String>,
    },

    #[serde(rename = "player:respawn")]
    PlayerRespawn {
        #[serde(rename = "userId")]
        user_id: PlayerId,
        x: f32,
        y: f32,
        #[serde(rename = "respawnTime")]
        respawn_time: u64,
    },

    #[serde(rename = "stats:update")]
    StatsUpdate {
        #[serde(rename = "userId")]
        user_id: PlayerId,
        kills: u32,
        deaths: u32,
    },

    #[serde(rename = "score:update")]
    ScoreUpdate { scores: Vec<ScoreEntry> },

    #[serde(rename = "kill")]
    Kill {
        #[serde(rename = "killerId")]
        killer_id: PlayerId,
        #[serde(rename = "killerName")]
        killer_name: String,
        #[serde(rename = "victimId")]
        victim_id: PlayerId,
        #[serde(rename = "victimName")]
        victim_name: String,
        points: i32,
    },

    #[serde(rename = "admin:login:ok")]
    AdminLoginOk { token: String },

    #[serde(rename = "admin:login:error")]
    AdminLoginError {},

    #[serde(rename = "admin:error")]
    AdminError {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    #[serde(rename = "admin:players")]
    AdminPlayers { players: Vec<AdminPlayerInfo> },

    #[serde(rename = "admin:bots")]
    AdminBots { bots: Vec<AdminBotInfo> },

    #[serde(rename = "admin:settings")]
    AdminSettings { settings: GameSettings },

    #[serde(rename = "admin:endGame:ok")]
    AdminEndGameOk { submitted: u32, failed: u32, total: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_deserializes_from_envelope() {
        let json = r#"{"event":"cursor:move","data":{"x":1.0,"y":2.0,"rotation":0.5}}"#;
        let ev: ClientEvent = serde_json::from_str(json).unwrap();
        match ev {
            ClientEvent::CursorMove { x, y, rotation } => {
                assert_eq!(x, 1.0);
                assert_eq!(y, 2.0);
                assert_eq!(rotation, 0.5);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_unknown_event_fails_to_parse_and_is_dropped() {
        let json = r#"{"event":"totally:unknown","data":{}}"#;
        let result: Result<ClientEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_bullet_shoot_is_rocket_defaults_false() {
        let json = r#"{"event":"bullet:shoot","data":{"x":0.0,"y":0.0,"angle":0.0}}"#;
        let ev: ClientEvent = serde_json::from_str(json).unwrap();
        match ev {
            ClientEvent::BulletShoot { is_rocket, .. } => assert!(!is_rocket),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_player_killed_event_serializes_envelope_shape() {
        let ev = ServerEvent::PlayerKilled {
            victim_id: PlayerId(2),
            victim_name: "B".into(),
            attacker_id: Some(PlayerId(1)),
            attacker_name: Some("A".into()),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "player:killed");
        assert_eq!(json["data"]["victimId"], "p2");
        assert_eq!(json["data"]["attackerId"], "p1");
    }

    #[test]
    fn test_admin_login_requires_password_field() {
        let json = r#"{"event":"admin:login","data":{"password":"hunter2"}}"#;
        let ev: ClientEvent = serde_json::from_str(json).unwrap();
        match ev {
            ClientEvent::AdminLogin { password } => assert_eq!(password, "hunter2"),
            _ => panic!("wrong variant"),
        }
    }
}
