//! Mine spawn cadence, explosion, and chain reactions (§4.4).

use shared::geometry::random_interior_point;
use shared::ids::{MineId, PlayerId};
use shared::mine::{
    mine_knockback_magnitude, Mine, MINE_CHAIN_DELAY_MS, MINE_DAMAGE, MINE_DAMAGE_RADIUS, MINE_MAX_LIVE,
    MINE_SPAWN_INTERVAL_MS, MINE_TRIGGER_RADIUS,
};
use shared::protocol::ServerEvent;
use shared::Vec2;

use super::death;
use super::timers::DeferredAction;
use super::Room;

pub(crate) fn advance_spawn(room: &mut Room) {
    if room.now_ms < room.next_mine_spawn_ms {
        return;
    }
    room.next_mine_spawn_ms = room.now_ms + MINE_SPAWN_INTERVAL_MS;
    if room.mines.len() >= MINE_MAX_LIVE {
        return;
    }
    let mine = Mine::new(MineId::next(), random_interior_point());
    room.broadcast(ServerEvent::MineSpawn { mine_id: mine.id, x: mine.position.x, y: mine.position.y });
    room.mines.insert(mine.id, mine);
}

pub(crate) fn check_ship_contact(room: &mut Room) {
    let alive: Vec<(PlayerId, Vec2)> =
        room.ships.iter().filter(|(_, s)| !s.is_dead()).map(|(id, s)| (*id, s.position)).collect();
    let mine_positions: Vec<(MineId, Vec2)> = room.mines.iter().map(|(id, m)| (*id, m.position)).collect();

    for (mine_id, mine_pos) in mine_positions {
        if !room.mines.contains_key(&mine_id) {
            continue;
        }
        for (player_id, ship_pos) in &alive {
            if ship_pos.distance(mine_pos) <= MINE_TRIGGER_RADIUS {
                explode(room, mine_id, Some(*player_id));
                break;
            }
        }
    }
}

/// Explode a mine: remove it from the world first (so a chain reaction
/// cannot double-trigger it), then apply splash damage/knockback, then
/// schedule the deferred chain-reaction check (§4.4).
pub(crate) fn explode(room: &mut Room, mine_id: MineId, triggered_by: Option<PlayerId>) {
    let Some(mine) = room.mines.remove(&mine_id) else { return };
    let epicentre = mine.position;

    room.broadcast(ServerEvent::MineExplode {
        mine_id,
        x: epicentre.x,
        y: epicentre.y,
        triggered_by: triggered_by.map(|p| p.to_string()),
    });

    let victims: Vec<PlayerId> = room
        .ships
        .iter()
        .filter(|(_, s)| !s.is_dead())
        .filter(|(_, s)| s.position.distance(epicentre) < MINE_DAMAGE_RADIUS)
        .map(|(id, _)| *id)
        .collect();

    for victim_id in victims {
        let ship = room.ships.get_mut(&victim_id).expect("victim collected from live ships map");
        let distance = ship.position.distance(epicentre);
        let magnitude = mine_knockback_magnitude(distance);
        if magnitude > 0.0 {
            let direction = if distance > 0.001 {
                Vec2::new((ship.position.x - epicentre.x) / distance, (ship.position.y - epicentre.y) / distance)
            } else {
                Vec2::new(1.0, 0.0)
            };
            let dvx = direction.x * magnitude;
            let dvy = direction.y * magnitude;
            ship.apply_knockback(dvx, dvy);
            room.broadcast(ServerEvent::Knockback { user_id: victim_id.to_string(), vx: dvx, vy: dvy });
        }

        let ship = room.ships.get_mut(&victim_id).expect("victim collected from live ships map");
        let was_alive = !ship.is_dead();
        ship.apply_damage(MINE_DAMAGE);
        room.broadcast(ServerEvent::HealthUpdate {
            user_id: victim_id.to_string(),
            health: ship.health,
            shield: Some(ship.shield),
            attacker_id: triggered_by.map(|p| p.to_string()),
        });

        if was_alive && room.ships[&victim_id].is_dead() {
            let credited_attacker = triggered_by.filter(|a| *a != victim_id);
            death::on_ship_death(room, victim_id, credited_attacker);
        }
    }

    room.timers.schedule(
        room.now_ms + MINE_CHAIN_DELAY_MS,
        DeferredAction::MineChainCheck { epicentre, original_damage_radius: MINE_DAMAGE_RADIUS, triggered_by },
    );
}

/// Deferred chain-reaction check (§4.4): any mine whose centre is within
/// `triggerRadius + originalDamageRadius` of the epicentre also explodes.
pub(crate) fn chain_check(room: &mut Room, epicentre: Vec2, original_damage_radius: f32, triggered_by: Option<PlayerId>) {
    let reach = MINE_TRIGGER_RADIUS + original_damage_radius;
    let chained: Vec<MineId> =
        room.mines.iter().filter(|(_, m)| m.position.distance(epicentre) <= reach).map(|(id, _)| *id).collect();
    for mine_id in chained {
        explode(room, mine_id, triggered_by);
    }
}
