//! Multi-step scenario tests driving a `Room` directly, tick-by-tick,
//! with no socket or hub in the loop. Each test reproduces one of the
//! concrete scenarios: Bounce, Kill, Rocket suicide, Shield absorb, Chain
//! reactions, Placement.

use tokio::sync::mpsc;

use shared::bullet::{BulletOwner, STANDARD_BULLET_SPEED};
use shared::geometry::MAP_HALF_W;
use shared::ids::{BulletId, MineId, PlayerId};
use shared::protocol::{ClientEvent, ServerEvent};
use shared::{Bullet, Mine, Vec2};

use server::hub::HubClient;
use server::room::Room;
use server::session::WorkerMsg;

fn new_room() -> Room {
    let hub = HubClient::new("https://hub.invalid".to_string(), "scenario-test".to_string());
    let (self_tx, _self_rx) = mpsc::channel::<WorkerMsg>(32);
    Room::new(hub, "scenario-admin".to_string(), self_tx)
}

fn connect(room: &mut Room) -> (PlayerId, mpsc::UnboundedReceiver<ServerEvent>) {
    let id = PlayerId::next();
    let (tx, rx) = mpsc::unbounded_channel();
    room.connect(id, None, tx);
    (id, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test]
async fn bounce_scenario_reflects_off_the_wall_and_returns() {
    let mut room = new_room();
    let (_player, mut rx) = connect(&mut room);
    drain(&mut rx);

    let origin = Vec2::new(MAP_HALF_W - 10.0, 0.0);
    let bullet = Bullet::spawn(BulletId::next(), BulletOwner::Player(_player), origin, 0.0, false, 10.0);
    let bullet_id = bullet.id;
    room.bullets.insert(bullet_id, bullet);

    room.tick();
    let after_one = &room.bullets[&bullet_id];
    assert!((after_one.position.x - MAP_HALF_W).abs() < 0.001);
    assert!((after_one.velocity.x - (-STANDARD_BULLET_SPEED)).abs() < 0.001);

    room.tick();
    let after_two = &room.bullets[&bullet_id];
    assert!((after_two.position.x - (MAP_HALF_W - STANDARD_BULLET_SPEED)).abs() < 0.001);
    assert!((after_two.velocity.x - (-STANDARD_BULLET_SPEED)).abs() < 0.001);
}

#[tokio::test]
async fn kill_scenario_seven_hits_leave_health_at_thirty_then_tenth_hit_kills() {
    let mut room = new_room();
    let (attacker, mut attacker_rx) = connect(&mut room);
    let (victim, mut victim_rx) = connect(&mut room);
    drain(&mut attacker_rx);
    drain(&mut victim_rx);

    let starting = room.settings.player_starting_health;
    let mut health = starting;
    for _ in 0..7 {
        health -= 10.0;
        room.handle_client_event(victim, ClientEvent::HealthDamage { user_id: victim, health, attacker_id: Some(attacker) });
    }
    assert!((room.ships[&victim].health - 30.0).abs() < 0.001);
    assert!(!room.ships[&victim].is_dead());

    for _ in 0..3 {
        health -= 10.0;
        room.handle_client_event(victim, ClientEvent::HealthDamage { user_id: victim, health, attacker_id: Some(attacker) });
    }
    assert!(room.ships[&victim].is_dead());
    assert_eq!(room.ships[&attacker].kills, 1);

    let events = drain(&mut victim_rx);
    let kills: Vec<_> = events.iter().filter(|e| matches!(e, ServerEvent::PlayerKilled { .. })).collect();
    assert_eq!(kills.len(), 1);
}

#[tokio::test]
async fn rocket_suicide_damages_owner_and_credits_no_kill() {
    let mut room = new_room();
    let (owner, mut rx) = connect(&mut room);
    drain(&mut rx);

    let origin = room.ships[&owner].position;
    let bullet = Bullet::spawn(BulletId::next(), BulletOwner::Player(owner), origin, 0.0, true, 100.0);
    room.bullets.insert(bullet.id, bullet);

    room.tick();

    assert!(room.ships[&owner].is_dead());
    assert_eq!(room.ships[&owner].kills, 0);

    let events = drain(&mut rx);
    assert!(events.iter().any(
        |e| matches!(e, ServerEvent::PlayerKilled { victim_id, attacker_id: None, .. } if *victim_id == owner)
    ));
}

#[tokio::test]
async fn shield_absorb_scenario_two_twenty_damage_hits() {
    let mut room = new_room();
    let (victim, mut rx) = connect(&mut room);
    drain(&mut rx);
    room.ships.get_mut(&victim).unwrap().shield = 30.0;
    assert_eq!(room.ships[&victim].health, 100.0);

    room.ships.get_mut(&victim).unwrap().apply_damage(20.0);
    assert!((room.ships[&victim].shield - 10.0).abs() < 0.001);
    assert!((room.ships[&victim].health - 100.0).abs() < 0.001);

    room.ships.get_mut(&victim).unwrap().apply_damage(20.0);
    assert!((room.ships[&victim].shield - 0.0).abs() < 0.001);
    assert!((room.ships[&victim].health - 90.0).abs() < 0.001);
}

#[tokio::test]
async fn chain_reaction_scenario_three_colinear_mines() {
    let mut room = new_room();

    let m1 = Mine::new(MineId::next(), Vec2::new(200.0, 0.0));
    let m2 = Mine::new(MineId::next(), Vec2::new(400.0, 0.0));
    let m3 = Mine::new(MineId::next(), Vec2::new(600.0, 0.0));
    let (m1_id, m2_id, m3_id) = (m1.id, m2.id, m3.id);
    room.mines.insert(m1_id, m1);
    room.mines.insert(m2_id, m2);
    room.mines.insert(m3_id, m3);

    let bullet = Bullet::spawn(BulletId::next(), BulletOwner::Player(PlayerId::next()), Vec2::new(200.0, 0.0), 0.0, false, 10.0);
    room.bullets.insert(bullet.id, bullet);

    // One tick to resolve the bullet-vs-mine collision that triggers M1.
    room.tick();
    assert!(!room.mines.contains_key(&m1_id));
    assert!(room.mines.contains_key(&m2_id));
    assert!(room.mines.contains_key(&m3_id));

    // The chain check for M1 fires 100ms later; M2's chain check fires a
    // further 100ms after that, in turn detonating M3. Run enough ticks to
    // cover both staggers.
    for _ in 0..20 {
        room.tick();
    }

    assert!(!room.mines.contains_key(&m2_id));
    assert!(!room.mines.contains_key(&m3_id));
}

#[tokio::test]
async fn placement_scenario_four_players_ranked_by_score() {
    let mut room = new_room();
    let (a, mut a_rx) = connect(&mut room);
    let (b, mut b_rx) = connect(&mut room);
    let (c, mut c_rx) = connect(&mut room);
    let (d, mut d_rx) = connect(&mut room);
    for rx in [&mut a_rx, &mut b_rx, &mut c_rx, &mut d_rx] {
        drain(rx);
    }

    room.ships.get_mut(&a).unwrap().kills = 6;
    room.ships.get_mut(&b).unwrap().kills = 4;
    room.ships.get_mut(&c).unwrap().kills = 2;
    room.ships.get_mut(&d).unwrap().kills = 0;

    room.handle_client_event(a, ClientEvent::AdminEndGame { token: "scenario-admin".to_string() });

    let events = drain(&mut a_rx);
    assert!(events.iter().any(|e| matches!(e, ServerEvent::AdminEndGameOk { .. })));
    assert!(events.iter().any(|e| matches!(e, ServerEvent::ScoreUpdate { .. })));
}
