//! Types and pure logic shared by the server core and its wire protocol.
//!
//! This crate owns no I/O and no async runtime; it is the data model and
//! per-entity math that `server` drives from a single-writer tick loop.

pub mod bot;
pub mod bullet;
pub mod geometry;
pub mod ids;
pub mod laser;
pub mod mine;
pub mod pickup;
pub mod protocol;
pub mod rank;
pub mod settings;
pub mod ship;
pub mod weapons;

pub use bot::Bot;
pub use bullet::{Bullet, BulletOwner};
pub use geometry::Vec2;
pub use ids::{BotId, BulletId, MineId, PickupId, PlayerId};
pub use laser::LaserBeam;
pub use mine::Mine;
pub use pickup::{Pickup, PickupKind};
pub use settings::{GameSettings, GameSettingsPatch};
pub use ship::Ship;
pub use weapons::WeaponKind;
