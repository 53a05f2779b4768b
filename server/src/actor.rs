//! The single worker task that owns `Room` (§5).
//!
//! Generalises the teacher's headless `bevy_app::App` run loop (one thread,
//! owning world state, driven by a fixed-timestep scheduler) onto a plain
//! `tokio` task: `tokio::select!` alternates between draining the inbound
//! channel (applied immediately) and firing the tick interval.

use std::time::Duration;

use tokio::sync::mpsc::Receiver;
use tokio::time::interval;
use tracing::info;

use crate::hub::HubClient;
use crate::room::{Room, TICK_MS};
use crate::session::WorkerMsg;

pub async fn run(mut rx: Receiver<WorkerMsg>, hub: HubClient, admin_password: String, self_tx: tokio::sync::mpsc::Sender<WorkerMsg>) {
    let mut room = Room::new(hub, admin_password, self_tx);
    let mut ticker = interval(Duration::from_millis(TICK_MS));

    info!("simulation worker started");

    loop {
        tokio::select! {
            biased;

            msg = rx.recv() => {
                match msg {
                    Some(msg) => apply(&mut room, msg),
                    None => {
                        info!("worker channel closed, shutting down");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                room.tick();
            }
        }
    }
}

fn apply(room: &mut Room, msg: WorkerMsg) {
    match msg {
        WorkerMsg::Connect { player_id, external_player_key, outbox } => {
            room.connect(player_id, external_player_key, outbox);
        }
        WorkerMsg::ClientEvent { player_id, event } => {
            room.handle_client_event(player_id, event);
        }
        WorkerMsg::Disconnect { player_id } => {
            room.disconnect(player_id);
        }
        WorkerMsg::HubNameResolved { player_id, name } => {
            room.resolve_hub_name(player_id, name);
        }
        WorkerMsg::ScoreSubmitted { player_id, ok } => {
            room.mark_score_submitted(player_id, ok);
        }
    }
}
