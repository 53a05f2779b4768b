//! Bot population maintenance and wandering AI (§4.7).
//!
//! Grounded on the teacher's `npc::update_npc_movement` wander step; the
//! archetype/pathfinding layers it also has are dropped since this arena's
//! bots only wander and fire.

use rand::Rng;

use shared::geometry::random_interior_point;
use shared::ids::BotId;
use shared::protocol::{CursorInfo, CursorKind, ServerEvent};
use shared::{Bot, BulletOwner, Vec2};

use super::timers::DeferredAction;
use super::Room;

/// Bot AI runs on its own ~60 ms cadence, independent of the 16 ms tick.
const BOT_PASS_INTERVAL_MS: u64 = 60;
const BOT_RESPAWN_DELAY_MS: u64 = 3000;
const BOT_HEADING_JITTER_CHANCE: f32 = 0.25;
const BOT_HEADING_JITTER_RANGE: f32 = 0.4;
const BOT_STEP_MIN_MULTIPLIER: f32 = 1.0;
const BOT_STEP_MAX_MULTIPLIER: f32 = 2.2;
const BOT_FIRE_CHANCE: f32 = 0.06;
const BOT_FIRE_SPREAD: f32 = 0.3;
const BOT_BULLET_DAMAGE: f32 = 10.0;

pub(crate) fn maybe_advance(room: &mut Room) {
    if room.now_ms < room.next_bot_pass_ms {
        return;
    }
    room.next_bot_pass_ms = room.now_ms + BOT_PASS_INTERVAL_MS;

    reconcile_population(room);

    let bot_ids: Vec<BotId> = room.bots.keys().copied().collect();
    for bot_id in bot_ids {
        step_bot(room, bot_id);
    }
}

fn reconcile_population(room: &mut Room) {
    let target = room.settings.bot_count as usize;
    while room.bots.len() < target {
        spawn_one(room);
    }
    while room.bots.len() > target {
        let Some(id) = room.bots.keys().next().copied() else { break };
        room.bots.remove(&id);
    }
}

pub(crate) fn spawn_one(room: &mut Room) {
    let bot = Bot::new(BotId::next(), random_interior_point(), room.settings.bot_health);
    room.bots.insert(bot.id, bot);
}

fn step_bot(room: &mut Room, bot_id: BotId) {
    let Some(bot) = room.bots.get_mut(&bot_id) else { return };
    if bot.is_dead() {
        return;
    }

    let mut rng = rand::thread_rng();
    if rng.gen::<f32>() < BOT_HEADING_JITTER_CHANCE {
        bot.heading += rng.gen_range(-BOT_HEADING_JITTER_RANGE..BOT_HEADING_JITTER_RANGE);
    }

    let step_len = room.settings.bot_speed * rng.gen_range(BOT_STEP_MIN_MULTIPLIER..BOT_STEP_MAX_MULTIPLIER);
    let mut next = bot.position + Vec2::from_angle(bot.heading) * step_len;
    let (clamped_x, clamped_y) = next.clamp_to_map();
    if clamped_x {
        bot.heading = std::f32::consts::PI - bot.heading;
    }
    if clamped_y {
        bot.heading = -bot.heading;
    }
    bot.position = next;

    room.broadcast(ServerEvent::CursorUpdate {
        user_id: bot_id.to_string(),
        cursor: CursorInfo {
            x: bot.position.x,
            y: bot.position.y,
            rotation: bot.heading,
            color: "#888888".to_string(),
            label: bot.label.clone(),
            health: bot.health,
            kind: CursorKind::Bot,
            active_weapon: None,
            shield: None,
        },
    });

    if rng.gen::<f32>() < BOT_FIRE_CHANCE {
        let angle = bot.heading + rng.gen_range(-BOT_FIRE_SPREAD..BOT_FIRE_SPREAD);
        let origin = bot.position;
        let bullet = shared::Bullet::spawn(
            shared::ids::BulletId::next(),
            BulletOwner::Bot(bot_id),
            origin,
            angle,
            false,
            BOT_BULLET_DAMAGE,
        );
        room.broadcast(ServerEvent::BulletSpawn {
            bullet_id: bullet.id,
            user_id: bot_id.to_string(),
            x: bullet.position.x,
            y: bullet.position.y,
            vx: bullet.velocity.x,
            vy: bullet.velocity.y,
            color: "#888888".to_string(),
            is_rocket: None,
        });
        room.bullets.insert(bullet.id, bullet);
    }
}

/// Credit a bot kill to its attacker (if any) and schedule the bot's
/// respawn (§4.6, §4.7 step 3).
pub(crate) fn on_bot_killed(room: &mut Room, bot_id: BotId, attacker: Option<shared::ids::PlayerId>) {
    // Bots have no placement/hub stake (§3 Bot has no externalPlayerKey), so a
    // bot kill credits the attacker's kill count and stats but never emits
    // `kill`/`player:killed` — those events' `victimId` is typed as a player id.
    if let Some(attacker_id) = attacker {
        if let Some(ship) = room.ships.get_mut(&attacker_id) {
            ship.kills += 1;
            room.broadcast(ServerEvent::StatsUpdate { user_id: attacker_id, kills: ship.kills, deaths: ship.deaths });
        }
    }

    room.timers.schedule(room.now_ms + BOT_RESPAWN_DELAY_MS, DeferredAction::RespawnBot { bot_id });
}

pub(crate) fn respawn_bot(room: &mut Room, bot_id: BotId) {
    let Some(bot) = room.bots.get_mut(&bot_id) else { return };
    bot.position = random_interior_point();
    bot.health = room.settings.bot_health;
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{connect_test_player, drain, new_test_room};
    use super::*;

    #[tokio::test]
    async fn test_reconcile_population_spawns_up_to_target() {
        let mut room = new_test_room();
        room.settings.bot_count = 3;
        reconcile_population(&mut room);
        assert_eq!(room.bots.len(), 3);
    }

    #[tokio::test]
    async fn test_reconcile_population_shrinks_to_target() {
        let mut room = new_test_room();
        room.settings.bot_count = 5;
        reconcile_population(&mut room);
        room.settings.bot_count = 1;
        reconcile_population(&mut room);
        assert_eq!(room.bots.len(), 1);
    }

    #[tokio::test]
    async fn test_bot_kill_credits_attacker_and_emits_no_player_killed_event() {
        let mut room = new_test_room();
        let (attacker, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        let bot_id = BotId::next();

        on_bot_killed(&mut room, bot_id, Some(attacker));

        assert_eq!(room.ships[&attacker].kills, 1);
        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(e, shared::protocol::ServerEvent::StatsUpdate { .. })));
        assert!(!events.iter().any(|e| matches!(e, shared::protocol::ServerEvent::PlayerKilled { .. })));
    }

    #[tokio::test]
    async fn test_respawn_bot_resets_health() {
        let mut room = new_test_room();
        let bot_id = BotId::next();
        room.bots.insert(bot_id, Bot::new(bot_id, Vec2::ZERO, room.settings.bot_health));
        room.bots.get_mut(&bot_id).unwrap().health = 0.0;

        respawn_bot(&mut room, bot_id);

        assert_eq!(room.bots[&bot_id].health, room.settings.bot_health);
    }
}
