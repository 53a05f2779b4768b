//! In-flight bullet motion and collision resolution (§4.1 step 3 & step 8, §4.3).

use shared::bullet::{rocket_falloff_damage, rocket_falloff_knockback, BulletOwner, ROCKET_EXPLOSION_RADIUS, BULLET_KNOCKBACK_MAGNITUDE};
use shared::ids::{BotId, BulletId, MineId, PlayerId};
use shared::mine::MINE_TRIGGER_RADIUS;
use shared::protocol::ServerEvent;
use shared::ship::SHIP_COLLISION_RADIUS;
use shared::bullet::BULLET_HIT_MARGIN;
use shared::Vec2;

use super::bots;
use super::death;
use super::mines;
use super::Room;

pub(crate) fn advance(room: &mut Room) {
    let expired: Vec<BulletId> =
        room.bullets.iter_mut().filter(|(_, b)| b.step()).map(|(id, _)| *id).collect();
    for id in expired {
        room.bullets.remove(&id);
    }
}

pub(crate) fn resolve_collisions(room: &mut Room) {
    let bullet_ids: Vec<BulletId> = room.bullets.keys().copied().collect();

    for bullet_id in bullet_ids {
        let Some(bullet) = room.bullets.get(&bullet_id) else { continue };
        let position = bullet.position;
        let velocity = bullet.velocity;
        let owner = bullet.owner;
        let is_rocket = bullet.is_rocket;
        let damage = bullet.damage;

        if let Some(mine_id) = touching_mine(room, position) {
            room.bullets.remove(&bullet_id);
            if is_rocket {
                explode_rocket(room, owner, position);
            } else {
                mines::explode(room, mine_id, owner_as_player(owner));
            }
            continue;
        }

        if let Some(victim_id) = touching_ship(room, owner, position) {
            room.bullets.remove(&bullet_id);
            if is_rocket {
                explode_rocket(room, owner, position);
            } else {
                apply_direct_hit(room, owner, victim_id, velocity, damage);
            }
            continue;
        }

        if let Some(bot_id) = touching_bot(room, position) {
            room.bullets.remove(&bullet_id);
            apply_direct_hit_bot(room, owner, bot_id, damage);
        }
    }
}

fn touching_mine(room: &Room, position: Vec2) -> Option<MineId> {
    room.mines.iter().find(|(_, m)| m.position.distance(position) <= MINE_TRIGGER_RADIUS).map(|(id, _)| *id)
}

fn touching_ship(room: &Room, owner: BulletOwner, position: Vec2) -> Option<PlayerId> {
    room.ships
        .iter()
        .filter(|(id, s)| !s.is_dead() && !owner.is_player(*(*id)))
        .find(|(_, s)| s.position.distance(position) <= SHIP_COLLISION_RADIUS + BULLET_HIT_MARGIN)
        .map(|(id, _)| *id)
}

fn touching_bot(room: &Room, position: Vec2) -> Option<BotId> {
    room.bots
        .iter()
        .filter(|(_, b)| !b.is_dead())
        .find(|(_, b)| b.position.distance(position) <= SHIP_COLLISION_RADIUS + BULLET_HIT_MARGIN)
        .map(|(id, _)| *id)
}

fn apply_direct_hit_bot(room: &mut Room, owner: BulletOwner, bot_id: BotId, damage: f32) {
    let attacker = owner_as_player(owner);
    let bot_health_cap = room.settings.bot_health;
    let Some(bot) = room.bots.get_mut(&bot_id) else { return };
    let was_alive = !bot.is_dead();
    bot.apply_damage(damage, bot_health_cap);
    if was_alive && bot.is_dead() {
        bots::on_bot_killed(room, bot_id, attacker);
    }
}

fn owner_as_player(owner: BulletOwner) -> Option<PlayerId> {
    match owner {
        BulletOwner::Player(id) => Some(id),
        BulletOwner::Bot(_) => None,
    }
}

/// A standard bullet's direct hit: configured damage, knockback along the
/// bullet's direction of travel (§4.1 step 8).
fn apply_direct_hit(room: &mut Room, owner: BulletOwner, victim_id: PlayerId, bullet_velocity: Vec2, damage: f32) {
    let attacker = owner_as_player(owner);
    let speed = bullet_velocity.length();
    let (dvx, dvy) = if speed > 0.001 {
        (bullet_velocity.x / speed * BULLET_KNOCKBACK_MAGNITUDE, bullet_velocity.y / speed * BULLET_KNOCKBACK_MAGNITUDE)
    } else {
        (BULLET_KNOCKBACK_MAGNITUDE, 0.0)
    };
    let ship = room.ships.get_mut(&victim_id).expect("victim collected from live ships map");
    ship.apply_knockback(dvx, dvy);
    room.broadcast(ServerEvent::Knockback { user_id: victim_id.to_string(), vx: dvx, vy: dvy });

    let ship = room.ships.get_mut(&victim_id).expect("victim collected from live ships map");
    let was_alive = !ship.is_dead();
    ship.apply_damage(damage);
    room.broadcast(ServerEvent::HealthUpdate {
        user_id: victim_id.to_string(),
        health: ship.health,
        shield: Some(ship.shield),
        attacker_id: attacker.map(|a| a.to_string()),
    });

    if was_alive && room.ships[&victim_id].is_dead() {
        let credited = attacker.filter(|a| *a != victim_id);
        death::on_ship_death(room, victim_id, credited);
    }
}

/// A rocket's radial explosion: linear falloff damage and knockback over
/// `ROCKET_EXPLOSION_RADIUS`. Suicide (owner caught in its own blast) deals
/// damage but credits no kill (§4.1 step 8).
fn explode_rocket(room: &mut Room, owner: BulletOwner, epicentre: Vec2) {
    let attacker = owner_as_player(owner);

    let victims: Vec<PlayerId> = room
        .ships
        .iter()
        .filter(|(_, s)| !s.is_dead())
        .filter(|(_, s)| s.position.distance(epicentre) < ROCKET_EXPLOSION_RADIUS)
        .map(|(id, _)| *id)
        .collect();

    for victim_id in victims {
        let ship = room.ships.get_mut(&victim_id).expect("victim collected from live ships map");
        let distance = ship.position.distance(epicentre);
        let knockback = rocket_falloff_knockback(distance);
        if knockback > 0.0 {
            let (dvx, dvy) = if distance > 0.001 {
                ((ship.position.x - epicentre.x) / distance * knockback, (ship.position.y - epicentre.y) / distance * knockback)
            } else {
                (knockback, 0.0)
            };
            ship.apply_knockback(dvx, dvy);
            room.broadcast(ServerEvent::Knockback { user_id: victim_id.to_string(), vx: dvx, vy: dvy });
        }

        let ship = room.ships.get_mut(&victim_id).expect("victim collected from live ships map");
        let was_alive = !ship.is_dead();
        let damage = rocket_falloff_damage(distance);
        ship.apply_damage(damage);
        room.broadcast(ServerEvent::HealthUpdate {
            user_id: victim_id.to_string(),
            health: ship.health,
            shield: Some(ship.shield),
            attacker_id: attacker.map(|a| a.to_string()),
        });

        if was_alive && room.ships[&victim_id].is_dead() {
            let credited = attacker.filter(|a| *a != victim_id);
            death::on_ship_death(room, victim_id, credited);
        }
    }
}
