//! Test-only helpers for constructing a bare `Room` without a live socket or
//! hub connection.

use tokio::sync::mpsc;

use shared::ids::PlayerId;
use shared::protocol::ServerEvent;

use crate::hub::HubClient;
use crate::session::WorkerMsg;

use super::Room;

pub(crate) fn new_test_room() -> Room {
    let hub = HubClient::new("https://hub.invalid".to_string(), "test-game".to_string());
    let (self_tx, _self_rx) = mpsc::channel::<WorkerMsg>(32);
    Room::new(hub, "admin-secret".to_string(), self_tx)
}

/// Connects a fresh player and hands back its id plus the outbox so a test
/// can assert on broadcast events.
pub(crate) fn connect_test_player(room: &mut Room) -> (PlayerId, mpsc::UnboundedReceiver<ServerEvent>) {
    let id = PlayerId::next();
    let (tx, rx) = mpsc::unbounded_channel();
    room.connect(id, None, tx);
    (id, rx)
}

pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}
