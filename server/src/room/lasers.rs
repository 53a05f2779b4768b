//! Continuous laser beams: re-raycast and apply damage-per-tick (§4.6).

use shared::geometry::point_segment_distance;
use shared::ids::{BotId, PlayerId};
use shared::laser::{LASER_DAMAGE_PER_TICK, LASER_HIT_RADIUS, LASER_MINE_MARGIN, LASER_RANGE};
use shared::mine::MINE_TRIGGER_RADIUS;
use shared::protocol::ServerEvent;
use shared::Vec2;

use super::bots;
use super::death;
use super::mines;
use super::Room;

pub(crate) fn advance(room: &mut Room) {
    let owners: Vec<PlayerId> = room.lasers.keys().copied().collect();

    for owner in owners {
        let Some(ship) = room.ships.get(&owner) else {
            room.lasers.remove(&owner);
            continue;
        };
        if ship.is_dead() {
            room.lasers.remove(&owner);
            continue;
        }
        let origin = ship.position;
        let rotation = ship.facing_rotation;

        let expired = {
            let beam = room.lasers.get_mut(&owner).expect("owner key came from lasers map");
            beam.current_angle = rotation;
            beam.tick()
        };
        if expired {
            room.lasers.remove(&owner);
            continue;
        }

        let direction = Vec2::from_angle(rotation);
        let end = Vec2::new(origin.x + direction.x * LASER_RANGE, origin.y + direction.y * LASER_RANGE);

        hit_ships(room, owner, origin, end);
        hit_bots(room, owner, origin, end);
        hit_mines(room, owner, origin, end);
    }
}

fn hit_bots(room: &mut Room, owner: PlayerId, origin: Vec2, end: Vec2) {
    let hits: Vec<BotId> = room
        .bots
        .iter()
        .filter(|(_, b)| !b.is_dead())
        .filter(|(_, b)| point_segment_distance(b.position, origin, end) <= LASER_HIT_RADIUS)
        .map(|(id, _)| *id)
        .collect();

    for bot_id in hits {
        let bot_health_cap = room.settings.bot_health;
        let Some(bot) = room.bots.get_mut(&bot_id) else { continue };
        let was_alive = !bot.is_dead();
        bot.apply_damage(LASER_DAMAGE_PER_TICK, bot_health_cap);
        if was_alive && bot.is_dead() {
            bots::on_bot_killed(room, bot_id, Some(owner));
        }
    }
}

fn hit_ships(room: &mut Room, owner: PlayerId, origin: Vec2, end: Vec2) {
    let hits: Vec<PlayerId> = room
        .ships
        .iter()
        .filter(|(id, s)| **id != owner && !s.is_dead())
        .filter(|(_, s)| point_segment_distance(s.position, origin, end) <= LASER_HIT_RADIUS)
        .map(|(id, _)| *id)
        .collect();

    for victim_id in hits {
        let ship = room.ships.get_mut(&victim_id).expect("victim collected from live ships map");
        let was_alive = !ship.is_dead();
        ship.apply_damage(LASER_DAMAGE_PER_TICK);
        room.broadcast(ServerEvent::HealthUpdate {
            user_id: victim_id.to_string(),
            health: ship.health,
            shield: Some(ship.shield),
            attacker_id: Some(owner.to_string()),
        });
        if was_alive && room.ships[&victim_id].is_dead() {
            death::on_ship_death(room, victim_id, Some(owner));
        }
    }
}

fn hit_mines(room: &mut Room, owner: PlayerId, origin: Vec2, end: Vec2) {
    let reach = MINE_TRIGGER_RADIUS + LASER_MINE_MARGIN;
    let hits: Vec<_> = room
        .mines
        .iter()
        .filter(|(_, m)| point_segment_distance(m.position, origin, end) <= reach)
        .map(|(id, _)| *id)
        .collect();
    for mine_id in hits {
        mines::explode(room, mine_id, Some(owner));
    }
}
