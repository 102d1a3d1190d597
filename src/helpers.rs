//! Utility functions for hoopshot

use bevy::prelude::*;

/// Distance between two points ignoring height
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Horizontal unit vector from `from` toward `to`, or `fallback` when they coincide
pub fn flat_direction(from: Vec3, to: Vec3, fallback: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z)
        .try_normalize()
        .unwrap_or(fallback)
}

/// Reflect velocity about a unit surface normal, scaled by restitution.
/// Only the approaching component is reflected; a separating ball keeps its velocity.
pub fn reflect_scaled(velocity: Vec3, normal: Vec3, restitution: f32) -> Vec3 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        return velocity;
    }
    (velocity - 2.0 * approach * normal) * restitution
}

/// Closest point on an axis-aligned box to `point`
pub fn closest_point_on_box(center: Vec3, half: Vec3, point: Vec3) -> Vec3 {
    (point - center).clamp(-half, half) + center
}

/// Outward normal for a point that lies inside a box (push out along the shallowest axis)
pub fn box_exit_normal(center: Vec3, half: Vec3, point: Vec3) -> (Vec3, f32) {
    let local = point - center;
    let depths = half - local.abs();
    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
    if depths.x <= depths.y && depths.x <= depths.z {
        (Vec3::X * sign(local.x), depths.x)
    } else if depths.y <= depths.z {
        (Vec3::Y * sign(local.y), depths.y)
    } else {
        (Vec3::Z * sign(local.z), depths.z)
    }
}

/// True if every component is finite
pub fn is_finite_vec(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_direction_fallback_on_coincident_points() {
        let dir = flat_direction(Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, 5.0, 1.0), Vec3::X);
        assert_eq!(dir, Vec3::X);
    }

    #[test]
    fn test_reflect_scaled_only_when_approaching() {
        let v = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(reflect_scaled(v, -Vec3::X, 0.5), Vec3::new(-5.0, 0.0, 0.0));
        assert_eq!(reflect_scaled(v, Vec3::X, 0.5), v);
    }

    #[test]
    fn test_box_helpers() {
        let center = Vec3::ZERO;
        let half = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(
            closest_point_on_box(center, half, Vec3::new(5.0, 0.0, 0.0)),
            Vec3::new(1.0, 0.0, 0.0)
        );
        let (normal, depth) = box_exit_normal(center, half, Vec3::new(0.8, 0.0, 0.0));
        assert_eq!(normal, Vec3::X);
        assert!((depth - 0.2).abs() < 1e-5);
    }
}
