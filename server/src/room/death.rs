//! Centralised death/respawn policy (§4.9).

use shared::geometry::random_interior_point;
use shared::ids::PlayerId;
use shared::protocol::{CursorInfo, CursorKind, ScoreEntry, ServerEvent};
use shared::rank::leaderboard_score;

use super::timers::DeferredAction;
use super::Room;

const RESPAWN_DELAY_MS: u64 = 6000;
const KILL_PLACEMENT_POINTS: i32 = 100;
const DEATH_PLACEMENT_PENALTY: i32 = 50;

/// Entry point for any ship transitioning from alive to dead this tick,
/// regardless of cause (bullet, rocket, mine, or laser). `attacker_id` is
/// `None` for suicides and environmental deaths.
pub(crate) fn on_ship_death(room: &mut Room, victim_id: PlayerId, attacker_id: Option<PlayerId>) {
    let Some(victim) = room.ships.get_mut(&victim_id) else { return };
    victim.deaths += 1;
    victim.placement_points = (victim.placement_points - DEATH_PLACEMENT_PENALTY).max(0);
    let victim_name = victim.display_label.clone();
    let victim_deaths = victim.deaths;
    let victim_kills = victim.kills;

    let mut attacker_name = None;
    if let Some(attacker_id) = attacker_id {
        if attacker_id != victim_id {
            if let Some(attacker) = room.ships.get_mut(&attacker_id) {
                attacker.kills += 1;
                attacker.placement_points += KILL_PLACEMENT_POINTS;
                attacker_name = Some(attacker.display_label.clone());
                let attacker_kills = attacker.kills;
                let attacker_deaths = attacker.deaths;
                room.broadcast(ServerEvent::StatsUpdate { user_id: attacker_id, kills: attacker_kills, deaths: attacker_deaths });
            }
            if let Some(attacker_name) = &attacker_name {
                room.broadcast(ServerEvent::Kill {
                    killer_id: attacker_id,
                    killer_name: attacker_name.clone(),
                    victim_id,
                    victim_name: victim_name.clone(),
                    points: KILL_PLACEMENT_POINTS,
                });
            }
        }
    }

    room.broadcast(ServerEvent::PlayerKilled {
        victim_id,
        victim_name: victim_name.clone(),
        attacker_id: attacker_id.filter(|a| *a != victim_id),
        attacker_name,
    });
    room.broadcast(ServerEvent::StatsUpdate { user_id: victim_id, kills: victim_kills, deaths: victim_deaths });

    broadcast_score_snapshot(room);

    let respawn_at = room.now_ms + RESPAWN_DELAY_MS;
    room.broadcast(ServerEvent::PlayerRespawn { user_id: victim_id, x: 0.0, y: 0.0, respawn_time: respawn_at });
    room.timers.schedule(respawn_at, DeferredAction::RespawnShip { player_id: victim_id });
}

/// Fires `RESPAWN_DELAY_MS` after death: reset health/position/weapon and
/// tell clients authoritatively (§4.9 step 3).
pub(crate) fn respawn_ship(room: &mut Room, player_id: PlayerId) {
    let starting_health = room.settings.player_starting_health;
    let Some(ship) = room.ships.get_mut(&player_id) else { return };
    ship.respawn(random_interior_point(), starting_health);

    room.broadcast(ServerEvent::HealthUpdate {
        user_id: player_id.to_string(),
        health: ship.health,
        shield: Some(ship.shield),
        attacker_id: None,
    });

    let cursor = CursorInfo {
        x: ship.position.x,
        y: ship.position.y,
        rotation: ship.facing_rotation,
        color: ship.color.clone(),
        label: ship.display_label.clone(),
        health: ship.health,
        kind: CursorKind::Player,
        active_weapon: Some(ship.active_weapon),
        shield: Some(ship.shield),
    };
    room.broadcast(ServerEvent::CursorUpdate { user_id: player_id.to_string(), cursor });
}

fn broadcast_score_snapshot(room: &Room) {
    let scores: Vec<ScoreEntry> = room
        .insertion_order
        .iter()
        .filter_map(|id| room.ships.get(id))
        .map(|s| ScoreEntry {
            player_id: s.id.to_string(),
            player_name: s.display_label.clone(),
            score: leaderboard_score(s.kills, s.deaths).clamp(0, 100) as u8,
            kills: s.kills,
            deaths: s.deaths,
        })
        .collect();
    room.broadcast(ServerEvent::ScoreUpdate { scores });
}
