//! 2D collision geometry: axis-aligned bounds and angle helpers.
//!
//! Coordinates are screen-style: +x right, +y down. A body "falls" with
//! positive vertical velocity and rests on a block whose `top()` equals its
//! own `bottom()`.

use bevy::math::Vec2;
use std::f32::consts::{PI, TAU};

/// Axis-aligned rectangle (top-left corner + size).
///
/// Инвариант: width ≥ 0, height ≥ 0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width * 0.5, center.y - height * 0.5, width, height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ]
    }

    /// Midpoints of the four edges (top, bottom, left, right).
    pub fn edge_midpoints(&self) -> [Vec2; 4] {
        let c = self.center();
        [
            Vec2::new(c.x, self.top()),
            Vec2::new(c.x, self.bottom()),
            Vec2::new(self.left(), c.y),
            Vec2::new(self.right(), c.y),
        ]
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    /// Shrinks every side by `amount` (never below zero size).
    pub fn inset(&self, amount: f32) -> Self {
        self.shrunk(amount, amount)
    }

    /// Shrinks left/right sides by `dx` and top/bottom sides by `dy`.
    pub fn shrunk(&self, dx: f32, dy: f32) -> Self {
        let dx = dx.min(self.width * 0.5);
        let dy = dy.min(self.height * 0.5);
        Self::new(self.x + dx, self.y + dy, self.width - dx * 2.0, self.height - dy * 2.0)
    }

    /// Strict overlap: rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Closest point of the rectangle (boundary or interior) to `point`.
    pub fn nearest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        )
    }

    /// Distance from `point` to the nearest point of the rectangle (0 inside).
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        point.distance(self.nearest_point(point))
    }

    /// X of the vertical edge facing an observer at `observer_x`:
    /// left edge when the observer is left of center, otherwise right edge.
    pub fn face_x_toward(&self, observer_x: f32) -> f32 {
        if observer_x < self.center().x {
            self.left()
        } else {
            self.right()
        }
    }

    /// Aim point on the facing vertical edge, at the observer's height clamped
    /// to the edge span.
    pub fn face_point_toward(&self, observer: Vec2) -> Vec2 {
        Vec2::new(
            self.face_x_toward(observer.x),
            observer.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// Wraps an angle into (-π, π].
pub fn normalize_angle(angle: f32) -> f32 {
    let mut wrapped = angle % TAU;
    if wrapped <= -PI {
        wrapped += TAU;
    } else if wrapped > PI {
        wrapped -= TAU;
    }
    wrapped
}

/// Smallest absolute angle between two headings (0..=π).
pub fn angle_between(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Heading for a horizontal facing flag (0 = right, π = left).
pub fn facing_angle(facing_right: bool) -> f32 {
    if facing_right {
        0.0
    } else {
        PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        let c = Bounds::new(9.0, 9.0, 10.0, 10.0);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_distance_to_point_is_edge_aware() {
        let target = Bounds::new(100.0, 0.0, 200.0, 50.0);

        // Center-to-center would be 200+, edge distance is 50
        assert_abs_diff_eq!(target.distance_to_point(Vec2::new(50.0, 25.0)), 50.0);
        // Inside → 0
        assert_abs_diff_eq!(target.distance_to_point(Vec2::new(150.0, 10.0)), 0.0);
        // Diagonal from the corner (3-4-5)
        assert_abs_diff_eq!(target.distance_to_point(Vec2::new(97.0, -4.0)), 5.0);
    }

    #[test]
    fn test_face_x_picks_near_vertical_edge() {
        let target = Bounds::new(100.0, 0.0, 40.0, 40.0);

        assert_eq!(target.face_x_toward(20.0), 100.0);
        assert_eq!(target.face_x_toward(300.0), 140.0);

        let aim = target.face_point_toward(Vec2::new(20.0, 100.0));
        assert_eq!(aim, Vec2::new(100.0, 40.0));
    }

    #[test]
    fn test_inset_never_inverts() {
        let tiny = Bounds::new(0.0, 0.0, 1.0, 1.0).inset(5.0);
        assert!(tiny.width >= 0.0 && tiny.height >= 0.0);
        assert_abs_diff_eq!(tiny.center().x, 0.5);
    }

    #[test]
    fn test_normalize_angle_range() {
        assert_abs_diff_eq!(normalize_angle(2.5 * PI), PI / 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(normalize_angle(-PI / 2.0 - TAU), -PI / 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(angle_between(0.1, TAU - 0.1), 0.2, epsilon = 1e-5);
    }
}
