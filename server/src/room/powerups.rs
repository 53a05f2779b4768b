//! Pickup spawn cadence and collection (§4.5).

use shared::geometry::random_interior_point;
use shared::ids::PickupId;
use shared::pickup::{
    roll_pickup_kind, Pickup, PickupKind, HEALTH_PICKUP_AMOUNT, PICKUP_MAX_LIVE, PICKUP_RADIUS, PICKUP_SPAWN_INTERVAL_MS,
    SHIELD_PICKUP_AMOUNT,
};
use shared::protocol::ServerEvent;
use shared::ship::SHIP_COLLISION_RADIUS;
use shared::ids::PlayerId;
use shared::Vec2;

use super::{pickup_kind_wire, Room};

pub(crate) fn advance_spawn(room: &mut Room) {
    if room.now_ms < room.next_pickup_spawn_ms {
        return;
    }
    room.next_pickup_spawn_ms = room.now_ms + PICKUP_SPAWN_INTERVAL_MS;
    if room.pickups.len() >= PICKUP_MAX_LIVE {
        return;
    }
    let kind = roll_pickup_kind();
    let pickup = Pickup::new(PickupId::next(), random_interior_point(), kind);
    let (kind_wire, weapon_wire) = pickup_kind_wire(kind);
    room.broadcast(ServerEvent::PowerupSpawn {
        power_up_id: pickup.id,
        x: pickup.position.x,
        y: pickup.position.y,
        kind: kind_wire,
        weapon_type: weapon_wire,
    });
    room.pickups.insert(pickup.id, pickup);
}

pub(crate) fn check_collection(room: &mut Room) {
    let alive: Vec<(PlayerId, Vec2)> =
        room.ships.iter().filter(|(_, s)| !s.is_dead()).map(|(id, s)| (*id, s.position)).collect();
    let pickups: Vec<(PickupId, Vec2)> = room.pickups.iter().map(|(id, p)| (*id, p.position)).collect();

    'pickups: for (pickup_id, pos) in pickups {
        if !room.pickups.contains_key(&pickup_id) {
            continue;
        }
        for (player_id, ship_pos) in &alive {
            if ship_pos.distance(pos) <= SHIP_COLLISION_RADIUS + PICKUP_RADIUS {
                collect(room, pickup_id, *player_id);
                continue 'pickups;
            }
        }
    }
}

fn collect(room: &mut Room, pickup_id: PickupId, player_id: PlayerId) {
    let Some(pickup) = room.pickups.remove(&pickup_id) else { return };
    let (kind_wire, weapon_wire) = pickup_kind_wire(pickup.kind);

    room.broadcast(ServerEvent::PowerupCollect {
        power_up_id: pickup_id,
        user_id: player_id,
        kind: kind_wire,
        weapon_type: weapon_wire,
    });

    let Some(ship) = room.ships.get_mut(&player_id) else { return };
    match pickup.kind {
        PickupKind::Weapon(weapon) => {
            ship.active_weapon = weapon;
            ship.ammo = weapon.starting_ammo();
        }
        PickupKind::Health => {
            ship.heal(HEALTH_PICKUP_AMOUNT);
            room.broadcast(ServerEvent::HealthUpdate {
                user_id: player_id.to_string(),
                health: room.ships[&player_id].health,
                shield: Some(room.ships[&player_id].shield),
                attacker_id: None,
            });
        }
        PickupKind::Shield => {
            ship.shield = SHIELD_PICKUP_AMOUNT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{connect_test_player, drain, new_test_room};
    use super::*;
    use shared::weapons::WeaponKind;

    #[tokio::test]
    async fn test_collecting_shield_pickup_sets_shield_amount() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        let pickup = Pickup::new(PickupId::next(), Vec2::ZERO, PickupKind::Shield);
        let pickup_id = pickup.id;
        room.pickups.insert(pickup_id, pickup);

        collect(&mut room, pickup_id, id);

        assert_eq!(room.ships[&id].shield, SHIELD_PICKUP_AMOUNT);
        assert!(!room.pickups.contains_key(&pickup_id));
    }

    #[tokio::test]
    async fn test_collecting_weapon_pickup_equips_it_with_starting_ammo() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        let pickup = Pickup::new(PickupId::next(), Vec2::ZERO, PickupKind::Weapon(WeaponKind::Rocket));
        let pickup_id = pickup.id;
        room.pickups.insert(pickup_id, pickup);

        collect(&mut room, pickup_id, id);

        assert_eq!(room.ships[&id].active_weapon, WeaponKind::Rocket);
        assert_eq!(room.ships[&id].ammo, Some(3));
    }

    #[tokio::test]
    async fn test_dead_ship_cannot_collect_pickups() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        let ship = room.ships.get_mut(&id).unwrap();
        ship.health = 0.0;
        let pickup = Pickup::new(PickupId::next(), ship.position, PickupKind::Health);
        let pickup_id = pickup.id;
        room.pickups.insert(pickup_id, pickup);

        check_collection(&mut room);

        assert!(room.pickups.contains_key(&pickup_id));
    }
}
