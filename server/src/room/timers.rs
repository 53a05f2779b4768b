//! Deferred-action timer queue (§9 "per-tick closures and timers").
//!
//! The mine chain re-check (100 ms), the death/respawn handler (6000 ms) and
//! the bot respawn (3000 ms) all map to a min-heap of `(dueTime, callback)`
//! drained at the top of each tick — this is that heap, generalized from the
//! teacher's tick-down timer *components* (`RespawnTimer`,
//! `DeadNpcDespawnTimer`) into explicit scheduled actions, since `Room` has
//! no per-entity component storage to attach a countdown to.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use shared::{BotId, PlayerId, Vec2};

#[derive(Debug, Clone)]
pub enum DeferredAction {
    RespawnShip { player_id: PlayerId },
    RespawnBot { bot_id: BotId },
    MineChainCheck { epicentre: Vec2, original_damage_radius: f32, triggered_by: Option<PlayerId> },
}

#[derive(Debug, Clone)]
struct TimerEntry {
    due_ms: u64,
    seq: u64,
    action: DeferredAction,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}
impl Eq for TimerEntry {}
impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<TimerEntry>>,
    seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, due_ms: u64, action: DeferredAction) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(TimerEntry { due_ms, seq, action }));
    }

    /// Pop and return every action due at or before `now_ms`, in due-time
    /// (then insertion) order.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.due_ms > now_ms {
                break;
            }
            let Reverse(entry) = self.heap.pop().unwrap();
            due.push(entry.action);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_in_due_time_order() {
        let mut q = TimerQueue::default();
        q.schedule(200, DeferredAction::RespawnBot { bot_id: BotId(1) });
        q.schedule(100, DeferredAction::RespawnBot { bot_id: BotId(2) });
        let due = q.drain_due(200);
        match (&due[0], &due[1]) {
            (DeferredAction::RespawnBot { bot_id: a }, DeferredAction::RespawnBot { bot_id: b }) => {
                assert_eq!(*a, BotId(2));
                assert_eq!(*b, BotId(1));
            }
            _ => panic!("wrong variants"),
        }
    }

    #[test]
    fn test_not_yet_due_actions_stay_queued() {
        let mut q = TimerQueue::default();
        q.schedule(500, DeferredAction::RespawnBot { bot_id: BotId(1) });
        assert!(q.drain_due(100).is_empty());
        assert_eq!(q.drain_due(500).len(), 1);
    }
}
