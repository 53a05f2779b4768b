//! Library surface for the arena shooter server core.
//!
//! `main.rs` is a thin process bootstrap over this crate; `tests/scenarios.rs`
//! drives `Room` directly through this same public surface, with no socket
//! in the loop (§10.4).

pub mod actor;
pub mod config;
pub mod hub;
pub mod room;
pub mod session;
