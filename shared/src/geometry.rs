//! 2D vector math and map bounds.
//!
//! The simulation is flat (top-down), unlike the teacher's 3D `Vec3`-based
//! physics — this module is the narrowed 2D equivalent of `shared::physics`'s
//! vector helpers.

use serde::{Deserialize, Serialize};

/// Map half-extent on X. The world spans [-MAP_HALF_W, +MAP_HALF_W].
pub const MAP_HALF_W: f32 = 1000.0;
/// Map half-extent on Y. The world spans [-MAP_HALF_H, +MAP_HALF_H].
pub const MAP_HALF_H: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f32) -> Self {
        Self { x: angle.cos(), y: angle.sin() }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }

    /// Clamp both axes to the map's half-extents in place.
    ///
    /// Returns which axes were clamped, so callers can reflect velocity on
    /// the clamped axis (the wall-bounce behaviour shared by ships and
    /// bullets).
    pub fn clamp_to_map(&mut self) -> (bool, bool) {
        let mut clamped_x = false;
        let mut clamped_y = false;
        if self.x > MAP_HALF_W {
            self.x = MAP_HALF_W;
            clamped_x = true;
        } else if self.x < -MAP_HALF_W {
            self.x = -MAP_HALF_W;
            clamped_x = true;
        }
        if self.y > MAP_HALF_H {
            self.y = MAP_HALF_H;
            clamped_y = true;
        } else if self.y < -MAP_HALF_H {
            self.y = -MAP_HALF_H;
            clamped_y = true;
        }
        (clamped_x, clamped_y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Uniform-random interior point, used for respawns and mine/pickup spawns.
pub fn random_interior_point() -> Vec2 {
    Vec2::new(
        rand::random::<f32>() * 2.0 * MAP_HALF_W - MAP_HALF_W,
        rand::random::<f32>() * 2.0 * MAP_HALF_H - MAP_HALF_H,
    )
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn point_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < 1e-6 {
        return point.distance(a);
    }
    let ap = point - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    point.distance(closest)
}
