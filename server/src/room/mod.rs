//! `Room`: the single owner of all world state (§2 World state, §9 "Global
//! mutable state" decision). Every subsystem advance function below is a
//! free function taking `&mut Room`, called in the fixed order from `tick()`
//! — the direct translation of the teacher's chained `FixedUpdate` system
//! tuples in `server/src/main.rs` into an explicit function-call sequence.

mod admin;
mod bots;
mod bullets;
mod death;
mod lasers;
mod mines;
mod powerups;
#[cfg(test)]
pub(crate) mod test_support;
mod timers;

pub use admin::AdminCommandError;
pub use timers::DeferredAction;

use std::collections::HashMap;

use tokio::sync::mpsc::Sender;
use tracing::info;

use shared::geometry::random_interior_point;
use shared::protocol::{CursorInfo, CursorKind, ServerEvent};
use shared::{BotId, BulletId, GameSettings, MineId, PickupId, PlayerId, Ship};

use crate::hub::HubClient;
use crate::session::WorkerMsg;
use timers::TimerQueue;

pub const TICK_MS: u64 = 16;
/// Cadence for the unsolicited `admin:players`/`admin:bots` snapshot push
/// (§4.10).
const ADMIN_PUSH_INTERVAL_MS: u64 = 500;

pub struct Session {
    pub outbox: tokio::sync::mpsc::UnboundedSender<ServerEvent>,
}

pub struct Room {
    pub now_ms: u64,
    pub settings: GameSettings,
    pub ships: HashMap<PlayerId, Ship>,
    pub insertion_order: Vec<PlayerId>,
    pub bots: HashMap<BotId, shared::Bot>,
    pub bullets: HashMap<BulletId, shared::Bullet>,
    pub mines: HashMap<MineId, shared::Mine>,
    pub pickups: HashMap<PickupId, shared::Pickup>,
    pub lasers: HashMap<PlayerId, shared::LaserBeam>,
    pub sessions: HashMap<PlayerId, Session>,

    pub(crate) next_mine_spawn_ms: u64,
    pub(crate) next_pickup_spawn_ms: u64,
    pub(crate) next_bot_pass_ms: u64,
    pub(crate) next_admin_push_ms: u64,
    pub(crate) timers: TimerQueue,

    pub(crate) hub: HubClient,
    pub(crate) admin_password: String,
    /// Handle back into the worker's own inbound queue, so fire-and-forget
    /// hub HTTP calls can report their result without the tick ever awaiting.
    pub(crate) self_tx: Sender<WorkerMsg>,
}

impl Room {
    pub fn new(hub: HubClient, admin_password: String, self_tx: Sender<WorkerMsg>) -> Self {
        Self {
            now_ms: 0,
            settings: GameSettings::default(),
            ships: HashMap::new(),
            insertion_order: Vec::new(),
            bots: HashMap::new(),
            bullets: HashMap::new(),
            mines: HashMap::new(),
            pickups: HashMap::new(),
            lasers: HashMap::new(),
            sessions: HashMap::new(),
            next_mine_spawn_ms: 0,
            next_pickup_spawn_ms: 0,
            next_bot_pass_ms: 0,
            next_admin_push_ms: 0,
            timers: TimerQueue::default(),
            hub,
            admin_password,
            self_tx,
        }
    }

    // -- emission helpers --------------------------------------------------

    pub(crate) fn emit_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(session) = self.sessions.get(&player_id) {
            let _ = session.outbox.send(event);
        }
    }

    pub(crate) fn broadcast(&self, event: ServerEvent) {
        for session in self.sessions.values() {
            let _ = session.outbox.send(event.clone());
        }
    }

    pub(crate) fn broadcast_except(&self, exclude: PlayerId, event: ServerEvent) {
        for (id, session) in self.sessions.iter() {
            if *id != exclude {
                let _ = session.outbox.send(event.clone());
            }
        }
    }

    fn cursor_info_for_ship(ship: &Ship) -> CursorInfo {
        CursorInfo {
            x: ship.position.x,
            y: ship.position.y,
            rotation: ship.facing_rotation,
            color: ship.color.clone(),
            label: ship.display_label.clone(),
            health: ship.health,
            kind: CursorKind::Player,
            active_weapon: Some(ship.active_weapon),
            shield: Some(ship.shield),
        }
    }

    fn cursor_info_for_bot(bot: &shared::Bot) -> CursorInfo {
        CursorInfo {
            x: bot.position.x,
            y: bot.position.y,
            rotation: bot.heading,
            color: "#888888".to_string(),
            label: bot.label.clone(),
            health: bot.health,
            kind: CursorKind::Bot,
            active_weapon: None,
            shield: None,
        }
    }

    // -- connection lifecycle (§4.8 Admit) ---------------------------------

    pub fn connect(
        &mut self,
        player_id: PlayerId,
        external_player_key: Option<String>,
        outbox: tokio::sync::mpsc::UnboundedSender<ServerEvent>,
    ) {
        let color_idx = self.insertion_order.len() % shared::ship::COLOR_PALETTE.len();
        let color = shared::ship::COLOR_PALETTE[color_idx].to_string();
        let label = player_id.to_string();

        let ship = Ship::new(
            player_id,
            external_player_key.clone(),
            label.clone(),
            color.clone(),
            self.settings.player_starting_health,
        );
        self.ships.insert(player_id, ship);
        self.insertion_order.push(player_id);
        self.sessions.insert(player_id, Session { outbox });

        self.emit_to(
            player_id,
            ServerEvent::PlayerInfo {
                user_id: player_id,
                label: label.clone(),
                color: color.clone(),
                kills: 0,
                deaths: 0,
                health: self.settings.player_starting_health,
            },
        );

        let joined_cursor = Self::cursor_info_for_ship(&self.ships[&player_id]);
        self.broadcast_except(
            player_id,
            ServerEvent::UserJoined { user_id: player_id, cursor: joined_cursor },
        );

        let mut cursors = HashMap::new();
        for (id, ship) in self.ships.iter() {
            if *id != player_id {
                cursors.insert(id.to_string(), Self::cursor_info_for_ship(ship));
            }
        }
        for bot in self.bots.values() {
            cursors.insert(bot.id.to_string(), Self::cursor_info_for_bot(bot));
        }
        self.emit_to(player_id, ServerEvent::CursorsSync { cursors });

        let mines: Vec<(MineId, f32, f32)> =
            self.mines.values().map(|m| (m.id, m.position.x, m.position.y)).collect();
        self.emit_to(player_id, ServerEvent::MineSync { mines });

        let powerups: Vec<(PickupId, f32, f32, String, Option<shared::WeaponKind>)> = self
            .pickups
            .values()
            .map(|p| {
                let (kind, weapon) = pickup_kind_wire(p.kind);
                (p.id, p.position.x, p.position.y, kind, weapon)
            })
            .collect();
        self.emit_to(player_id, ServerEvent::PowerupSync { powerups });

        if let Some(key) = external_player_key {
            let hub = self.hub.clone();
            let self_tx = self.self_tx.clone();
            tokio::spawn(async move {
                if let Ok(resp) = hub.fetch_current_game().await {
                    if let Some(player) = resp.players.into_iter().find(|p| p.player_key == key) {
                        let _ = self_tx.send(WorkerMsg::HubNameResolved { player_id, name: player.name }).await;
                    }
                }
            });
        }

        info!(%player_id, "ship connected");
    }

    pub fn disconnect(&mut self, player_id: PlayerId) {
        self.ships.remove(&player_id);
        self.insertion_order.retain(|id| *id != player_id);
        self.sessions.remove(&player_id);
        self.lasers.remove(&player_id);
        self.broadcast(ServerEvent::UserLeft { user_id: player_id });
        info!(%player_id, "ship disconnected");
    }

    pub fn mark_score_submitted(&mut self, player_id: PlayerId, ok: bool) {
        admin::mark_score_submitted(self, player_id, ok);
    }

    pub fn resolve_hub_name(&mut self, player_id: PlayerId, name: String) {
        if let Some(ship) = self.ships.get_mut(&player_id) {
            ship.display_label = name;
            let cursor = Self::cursor_info_for_ship(ship);
            self.broadcast(ServerEvent::CursorUpdate { user_id: player_id.to_string(), cursor });
        }
    }

    // -- inbound events (§4.8) ---------------------------------------------

    pub fn handle_client_event(&mut self, player_id: PlayerId, event: shared::protocol::ClientEvent) {
        use shared::protocol::ClientEvent as E;
        match event {
            E::CursorMove { x, y, rotation } => self.on_cursor_move(player_id, x, y, rotation),
            E::BulletShoot { x, y, angle, is_rocket } => self.on_bullet_shoot(player_id, x, y, angle, is_rocket),
            E::LaserShoot { angle, .. } => self.on_laser_shoot(player_id, angle),
            E::HealthDamage { user_id, health, attacker_id } => {
                self.on_health_damage(user_id, health, attacker_id)
            }
            other => admin::dispatch(self, player_id, other),
        }
    }

    fn on_cursor_move(&mut self, player_id: PlayerId, x: f32, y: f32, rotation: f32) {
        if !x.is_finite() || !y.is_finite() || !rotation.is_finite() {
            return;
        }
        let Some(ship) = self.ships.get_mut(&player_id) else { return };
        if ship.is_dead() {
            return;
        }
        ship.position.x = x;
        ship.position.y = y;
        ship.position.clamp_to_map();
        ship.facing_rotation = rotation;
        let cursor = Self::cursor_info_for_ship(ship);
        self.broadcast_except(player_id, ServerEvent::CursorUpdate { user_id: player_id.to_string(), cursor });
    }

    fn on_bullet_shoot(&mut self, player_id: PlayerId, x: f32, y: f32, angle: f32, is_rocket: bool) {
        let Some(ship) = self.ships.get_mut(&player_id) else { return };
        if ship.is_dead() {
            return;
        }
        if ship.ammo == Some(0) {
            return;
        }
        let stats = ship.active_weapon.stats();
        let color = ship.color.clone();
        let origin = shared::Vec2::new(x, y);

        if let Some(remaining) = ship.ammo {
            let remaining = remaining - 1;
            if remaining == 0 {
                ship.active_weapon = shared::WeaponKind::MachineGun;
                ship.ammo = None;
            } else {
                ship.ammo = Some(remaining);
            }
        }

        let pellets = stats.pellet_count.max(1);
        let spread = if pellets > 1 { 0.15 } else { 0.0 };
        for i in 0..pellets {
            let offset = if pellets > 1 {
                (i as f32 / (pellets - 1) as f32 - 0.5) * 2.0 * spread
            } else {
                0.0
            };
            let bullet = shared::Bullet::spawn(
                BulletId::next(),
                shared::BulletOwner::Player(player_id),
                origin,
                angle + offset,
                is_rocket && stats.is_rocket,
                stats.damage,
            );
            self.broadcast(ServerEvent::BulletSpawn {
                bullet_id: bullet.id,
                user_id: player_id.to_string(),
                x: bullet.position.x,
                y: bullet.position.y,
                vx: bullet.velocity.x,
                vy: bullet.velocity.y,
                color: color.clone(),
                is_rocket: Some(bullet.is_rocket),
            });
            self.bullets.insert(bullet.id, bullet);
        }
    }

    fn on_laser_shoot(&mut self, player_id: PlayerId, angle: f32) {
        let Some(ship) = self.ships.get(&player_id) else { return };
        if ship.is_dead() {
            return;
        }
        let color = ship.color.clone();
        let beam = shared::LaserBeam::new(player_id, angle);
        self.lasers.insert(player_id, beam);
        let ship = &self.ships[&player_id];
        self.broadcast(ServerEvent::LaserSpawn {
            user_id: player_id,
            x: ship.position.x,
            y: ship.position.y,
            angle,
            color,
        });
    }

    fn on_health_damage(&mut self, user_id: PlayerId, health: f32, attacker_id: Option<PlayerId>) {
        let Some(ship) = self.ships.get_mut(&user_id) else { return };
        if ship.is_dead() || !health.is_finite() {
            return;
        }
        let was_alive = !ship.is_dead();
        ship.health = health.clamp(0.0, 100.0);
        self.broadcast(ServerEvent::HealthUpdate {
            user_id: user_id.to_string(),
            health: ship.health,
            shield: Some(ship.shield),
            attacker_id: attacker_id.map(|a| a.to_string()),
        });
        if was_alive && self.ships[&user_id].is_dead() {
            death::on_ship_death(self, user_id, attacker_id);
        }
    }

    // -- the tick (§4.1) -----------------------------------------------------

    pub fn tick(&mut self) {
        for action in self.timers.drain_due(self.now_ms) {
            match action {
                DeferredAction::RespawnShip { player_id } => death::respawn_ship(self, player_id),
                DeferredAction::RespawnBot { bot_id } => bots::respawn_bot(self, bot_id),
                DeferredAction::MineChainCheck { epicentre, original_damage_radius, triggered_by } => {
                    mines::chain_check(self, epicentre, original_damage_radius, triggered_by)
                }
            }
        }

        mines::advance_spawn(self);
        powerups::advance_spawn(self);
        bullets::advance(self);
        lasers::advance(self);

        for ship in self.ships.values_mut() {
            ship.step_physics();
        }
        let moving: Vec<PlayerId> = self
            .ships
            .iter()
            .filter(|(_, s)| s.is_moving_nontrivially())
            .map(|(id, _)| *id)
            .collect();
        for id in moving {
            let cursor = Self::cursor_info_for_ship(&self.ships[&id]);
            self.broadcast(ServerEvent::CursorUpdate { user_id: id.to_string(), cursor });
        }

        powerups::check_collection(self);
        mines::check_ship_contact(self);
        bullets::resolve_collisions(self);
        bots::maybe_advance(self);

        if self.now_ms >= self.next_admin_push_ms {
            self.next_admin_push_ms = self.now_ms + ADMIN_PUSH_INTERVAL_MS;
            admin::push_snapshots(self);
        }

        self.now_ms += TICK_MS;
    }
}

pub(crate) fn pickup_kind_wire(kind: shared::PickupKind) -> (String, Option<shared::WeaponKind>) {
    match kind {
        shared::PickupKind::Weapon(w) => ("weapon".to_string(), Some(w)),
        shared::PickupKind::Health => ("health".to_string(), None),
        shared::PickupKind::Shield => ("shield".to_string(), None),
    }
}

pub(crate) fn random_spawn_point() -> shared::Vec2 {
    random_interior_point()
}

#[cfg(test)]
mod tests {
    use super::test_support::{connect_test_player, drain, new_test_room};
    use super::*;
    use shared::protocol::ClientEvent;

    #[tokio::test]
    async fn test_connect_emits_player_info_and_joins_others() {
        let mut room = new_test_room();
        let (first_id, mut first_rx) = connect_test_player(&mut room);
        let events = drain(&mut first_rx);
        assert!(matches!(events[0], ServerEvent::PlayerInfo { user_id, .. } if user_id == first_id));

        let (_second_id, _second_rx) = connect_test_player(&mut room);
        let events = drain(&mut first_rx);
        assert!(events.iter().any(|e| matches!(e, ServerEvent::UserJoined { .. })));
    }

    #[tokio::test]
    async fn test_disconnect_removes_ship_and_broadcasts_left() {
        let mut room = new_test_room();
        let (first_id, mut first_rx) = connect_test_player(&mut room);
        let (second_id, mut second_rx) = connect_test_player(&mut room);
        drain(&mut first_rx);
        drain(&mut second_rx);

        room.disconnect(first_id);
        assert!(!room.ships.contains_key(&first_id));
        let events = drain(&mut second_rx);
        assert!(matches!(events[0], ServerEvent::UserLeft { user_id } if user_id == first_id));
    }

    #[tokio::test]
    async fn test_tick_advances_simulated_clock_by_tick_ms() {
        let mut room = new_test_room();
        let before = room.now_ms;
        room.tick();
        assert_eq!(room.now_ms, before + TICK_MS);
    }

    #[tokio::test]
    async fn test_cursor_move_is_ignored_for_dead_ship() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        room.ships.get_mut(&id).unwrap().health = 0.0;

        room.handle_client_event(id, ClientEvent::CursorMove { x: 10.0, y: 10.0, rotation: 0.0 });
        assert_eq!(room.ships[&id].position.x, 0.0);
    }

    #[tokio::test]
    async fn test_bullet_shoot_spawns_configured_pellet_count() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        room.ships.get_mut(&id).unwrap().active_weapon = shared::WeaponKind::Shotgun;

        room.handle_client_event(id, ClientEvent::BulletShoot { x: 0.0, y: 0.0, angle: 0.0, is_rocket: false });
        assert_eq!(room.bullets.len(), 5);
    }

    #[tokio::test]
    async fn test_bullet_shoot_decrements_special_weapon_ammo() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        let ship = room.ships.get_mut(&id).unwrap();
        ship.active_weapon = shared::WeaponKind::Rocket;
        ship.ammo = Some(3);

        room.handle_client_event(id, ClientEvent::BulletShoot { x: 0.0, y: 0.0, angle: 0.0, is_rocket: true });

        assert_eq!(room.ships[&id].ammo, Some(2));
        assert_eq!(room.ships[&id].active_weapon, shared::WeaponKind::Rocket);
    }

    #[tokio::test]
    async fn test_bullet_shoot_reverts_to_machine_gun_when_ammo_depletes() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        let ship = room.ships.get_mut(&id).unwrap();
        ship.active_weapon = shared::WeaponKind::Rocket;
        ship.ammo = Some(1);

        room.handle_client_event(id, ClientEvent::BulletShoot { x: 0.0, y: 0.0, angle: 0.0, is_rocket: true });

        assert_eq!(room.ships[&id].ammo, None);
        assert_eq!(room.ships[&id].active_weapon, shared::WeaponKind::MachineGun);
    }

    #[tokio::test]
    async fn test_bullet_shoot_is_refused_once_ammo_is_exhausted() {
        let mut room = new_test_room();
        let (id, mut rx) = connect_test_player(&mut room);
        drain(&mut rx);
        let ship = room.ships.get_mut(&id).unwrap();
        ship.active_weapon = shared::WeaponKind::Rocket;
        ship.ammo = Some(0);

        room.handle_client_event(id, ClientEvent::BulletShoot { x: 0.0, y: 0.0, angle: 0.0, is_rocket: true });

        assert!(room.bullets.is_empty());
    }
}
