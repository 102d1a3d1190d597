//! Court bounds and hoop collidable parts
//!
//! Geometry is static: it is built once at startup, validated, and inserted
//! as a resource. Physics only ever reads it.

use bevy::prelude::*;
use std::fmt;

use crate::constants::*;

pub mod spawn;

pub use spawn::{spawn_court, spawn_hoops};

/// Which end of the court a hoop sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HoopSide {
    Left,
    Right,
}

impl HoopSide {
    /// Sign of the x axis on this side
    pub fn sign(self) -> f32 {
        match self {
            HoopSide::Left => -1.0,
            HoopSide::Right => 1.0,
        }
    }
}

impl fmt::Display for HoopSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoopSide::Left => write!(f, "left"),
            HoopSide::Right => write!(f, "right"),
        }
    }
}

/// Semantic tag used for outcome classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PartRole {
    Rim,
    Backboard,
    Pole,
    SupportArm,
    /// Visual only, never collides
    Net,
}

impl PartRole {
    pub fn is_collidable(self) -> bool {
        !matches!(self, PartRole::Net)
    }
}

/// Intersection-testable shape in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    /// Horizontal ring (rim): `major` is ring radius, `minor` is tube radius
    Torus { center: Vec3, major: f32, minor: f32 },
    /// Axis-aligned box
    Box { center: Vec3, half: Vec3 },
}

impl PartShape {
    pub fn center(&self) -> Vec3 {
        match *self {
            PartShape::Torus { center, .. } | PartShape::Box { center, .. } => center,
        }
    }

    fn bounds(&self) -> Bounds3 {
        match *self {
            PartShape::Torus { center, major, minor } => {
                let half = Vec3::new(major + minor, minor, major + minor);
                Bounds3 { min: center - half, max: center + half }
            }
            PartShape::Box { center, half } => Bounds3 { min: center - half, max: center + half },
        }
    }
}

/// Axis-aligned bounding box for broad-phase tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3 {
    /// Sphere vs box overlap
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }
}

/// One named piece of a hoop
#[derive(Debug, Clone, PartialEq)]
pub struct HoopPart {
    pub role: PartRole,
    pub shape: PartShape,
    pub bounds: Bounds3,
}

impl HoopPart {
    pub fn new(role: PartRole, shape: PartShape) -> Self {
        Self { role, shape, bounds: shape.bounds() }
    }
}

/// A hoop assembly. Parts are kept in collision priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct Hoop {
    pub side: HoopSide,
    pub parts: Vec<HoopPart>,
}

impl Hoop {
    /// Build the standard assembly on one side of the court
    pub fn standard(side: HoopSide) -> Self {
        let s = side.sign();
        let rim_center = Vec3::new(s * HOOP_RIM_X, RIM_HEIGHT, 0.0);
        let board_x = s * (HOOP_RIM_X + BACKBOARD_OFFSET);
        let board_center = Vec3::new(board_x, RIM_HEIGHT + BACKBOARD_RISE, 0.0);
        let arm_center = Vec3::new(
            board_x + s * (BACKBOARD_HALF.x + SUPPORT_ARM_HALF.x),
            board_center.y,
            0.0,
        );
        let pole_x = arm_center.x + s * (SUPPORT_ARM_HALF.x + POLE_HALF_THICKNESS);
        let pole_half_height = (POLE_HEIGHT - COURT_FLOOR_Y) * 0.5;
        let pole_center = Vec3::new(pole_x, COURT_FLOOR_Y + pole_half_height, 0.0);
        let net_center = rim_center - Vec3::Y * (NET_LENGTH * 0.5);

        Self {
            side,
            parts: vec![
                HoopPart::new(
                    PartRole::Rim,
                    PartShape::Torus { center: rim_center, major: RIM_RADIUS, minor: RIM_TUBE_RADIUS },
                ),
                HoopPart::new(
                    PartRole::Backboard,
                    PartShape::Box { center: board_center, half: BACKBOARD_HALF },
                ),
                HoopPart::new(
                    PartRole::SupportArm,
                    PartShape::Box { center: arm_center, half: SUPPORT_ARM_HALF },
                ),
                HoopPart::new(
                    PartRole::Pole,
                    PartShape::Box {
                        center: pole_center,
                        half: Vec3::new(POLE_HALF_THICKNESS, pole_half_height, POLE_HALF_THICKNESS),
                    },
                ),
                HoopPart::new(
                    PartRole::Net,
                    PartShape::Box {
                        center: net_center,
                        half: Vec3::new(RIM_RADIUS * 0.8, NET_LENGTH * 0.5, RIM_RADIUS * 0.8),
                    },
                ),
            ],
        }
    }

    pub fn part(&self, role: PartRole) -> Option<&HoopPart> {
        self.parts.iter().find(|p| p.role == role)
    }

    /// World position of the rim center
    pub fn rim_center(&self) -> Vec3 {
        self.part(PartRole::Rim)
            .map(|p| p.shape.center())
            .unwrap_or(Vec3::new(self.side.sign() * HOOP_RIM_X, RIM_HEIGHT, 0.0))
    }

    /// Ring radius of the rim
    pub fn rim_radius(&self) -> f32 {
        match self.part(PartRole::Rim).map(|p| p.shape) {
            Some(PartShape::Torus { major, .. }) => major,
            _ => RIM_RADIUS,
        }
    }
}

/// Inner playable rectangle and outer world rectangle, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtBounds {
    /// Half extents (x, z) of the playable court
    pub inner_half: Vec2,
    /// Half extents (x, z) of the collision volume
    pub outer_half: Vec2,
    pub floor_y: f32,
    pub fall_through_y: f32,
}

impl CourtBounds {
    pub fn standard() -> Self {
        let inner_half = Vec2::new(COURT_WIDTH * 0.5, COURT_DEPTH * 0.5);
        Self {
            inner_half,
            outer_half: inner_half + Vec2::splat(OUTER_MARGIN),
            floor_y: COURT_FLOOR_Y,
            fall_through_y: FALL_THROUGH_Y,
        }
    }

    /// A position on the outer edge counts as outside
    pub fn is_outside_outer(&self, pos: Vec3) -> bool {
        pos.x.abs() >= self.outer_half.x || pos.z.abs() >= self.outer_half.y
    }

    pub fn is_inside_inner(&self, pos: Vec3) -> bool {
        pos.x.abs() <= self.inner_half.x && pos.z.abs() <= self.inner_half.y
    }

    /// Clamp a ball center into the inner court, each axis independently
    pub fn clamp_inner(&self, pos: Vec3, radius: f32) -> Vec3 {
        let hx = (self.inner_half.x - radius).max(0.0);
        let hz = (self.inner_half.y - radius).max(0.0);
        Vec3::new(pos.x.clamp(-hx, hx), pos.y, pos.z.clamp(-hz, hz))
    }
}

/// Invalid geometry configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    NonFinite { what: String },
    MissingRim { side: HoopSide },
    RimTooSmall { rim_radius: f32, ball_radius: f32 },
    InvertedBounds,
    MissingHoop { side: HoopSide },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::NonFinite { what } => write!(f, "non-finite geometry value in {}", what),
            GeometryError::MissingRim { side } => write!(f, "{} hoop has no rim", side),
            GeometryError::RimTooSmall { rim_radius, ball_radius } => write!(
                f,
                "rim radius {} must be larger than ball radius {}",
                rim_radius, ball_radius
            ),
            GeometryError::InvertedBounds => {
                write!(f, "outer court bounds must enclose the inner court")
            }
            GeometryError::MissingHoop { side } => write!(f, "no {} hoop configured", side),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Static court description consumed by the physics step
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CourtGeometry {
    pub bounds: CourtBounds,
    pub ball_radius: f32,
    pub hoops: Vec<Hoop>,
}

impl CourtGeometry {
    /// Standard court with both hoops, validated
    pub fn standard() -> Result<Self, GeometryError> {
        let geometry = Self {
            bounds: CourtBounds::standard(),
            ball_radius: BALL_RADIUS,
            hoops: vec![Hoop::standard(HoopSide::Left), Hoop::standard(HoopSide::Right)],
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let b = &self.bounds;
        for (what, v) in [
            ("inner bounds", b.inner_half.x),
            ("inner bounds", b.inner_half.y),
            ("outer bounds", b.outer_half.x),
            ("outer bounds", b.outer_half.y),
            ("floor height", b.floor_y),
            ("fall-through height", b.fall_through_y),
            ("ball radius", self.ball_radius),
        ] {
            if !v.is_finite() {
                return Err(GeometryError::NonFinite { what: what.to_string() });
            }
        }
        if b.inner_half.min_element() <= 0.0
            || b.outer_half.x < b.inner_half.x
            || b.outer_half.y < b.inner_half.y
            || b.fall_through_y >= b.floor_y
        {
            return Err(GeometryError::InvertedBounds);
        }

        for side in [HoopSide::Left, HoopSide::Right] {
            let hoop = self
                .hoops
                .iter()
                .find(|h| h.side == side)
                .ok_or(GeometryError::MissingHoop { side })?;
            let rim = hoop.part(PartRole::Rim).ok_or(GeometryError::MissingRim { side })?;
            let PartShape::Torus { major, minor, center } = rim.shape else {
                return Err(GeometryError::MissingRim { side });
            };
            if !major.is_finite() || !minor.is_finite() || !center.is_finite() {
                return Err(GeometryError::NonFinite { what: format!("{} rim", side) });
            }
            if major <= self.ball_radius {
                return Err(GeometryError::RimTooSmall {
                    rim_radius: major,
                    ball_radius: self.ball_radius,
                });
            }
            for part in &hoop.parts {
                if let PartShape::Box { center, half } = part.shape {
                    if !center.is_finite() || !half.is_finite() {
                        return Err(GeometryError::NonFinite {
                            what: format!("{} {:?}", side, part.role),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Hoop on the ball's half of the court (x >= 0 is the right half)
    pub fn hoop_for(&self, pos: Vec3) -> &Hoop {
        let side = if pos.x >= 0.0 { HoopSide::Right } else { HoopSide::Left };
        self.hoops
            .iter()
            .find(|h| h.side == side)
            .unwrap_or(&self.hoops[0])
    }

    /// Hoops in collision order: the ball's own half first
    pub fn hoops_by_side(&self, pos: Vec3) -> impl Iterator<Item = &Hoop> {
        let first = self.hoop_for(pos);
        std::iter::once(first).chain(self.hoops.iter().filter(move |h| h.side != first.side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_geometry_is_valid() {
        let court = CourtGeometry::standard().unwrap();
        assert_eq!(court.hoops.len(), 2);
        let right = court.hoop_for(Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(right.side, HoopSide::Right);
        assert_eq!(right.rim_center(), Vec3::new(HOOP_RIM_X, RIM_HEIGHT, 0.0));
        let left = court.hoop_for(Vec3::new(-0.01, 0.0, 0.0));
        assert_eq!(left.rim_center(), Vec3::new(-HOOP_RIM_X, RIM_HEIGHT, 0.0));
    }

    #[test]
    fn test_parts_ordered_rim_first() {
        let hoop = Hoop::standard(HoopSide::Right);
        let roles: Vec<_> = hoop.parts.iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![PartRole::Rim, PartRole::Backboard, PartRole::SupportArm, PartRole::Pole, PartRole::Net]
        );
        assert!(!PartRole::Net.is_collidable());
    }

    #[test]
    fn test_hoop_parts_mirror() {
        let left = Hoop::standard(HoopSide::Left);
        let right = Hoop::standard(HoopSide::Right);
        for (l, r) in left.parts.iter().zip(&right.parts) {
            let (lc, rc) = (l.shape.center(), r.shape.center());
            assert!((lc.x + rc.x).abs() < 1e-4);
            assert_eq!(lc.y, rc.y);
        }
        // Backboard sits behind the rim, pole behind the backboard
        let board = right.part(PartRole::Backboard).unwrap().shape.center();
        let pole = right.part(PartRole::Pole).unwrap().shape.center();
        assert!(board.x > HOOP_RIM_X);
        assert!(pole.x > board.x);
    }

    #[test]
    fn test_outer_edge_counts_as_outside() {
        let bounds = CourtBounds::standard();
        let edge = Vec3::new(bounds.outer_half.x, 5.0, 0.0);
        assert!(bounds.is_outside_outer(edge));
        assert!(!bounds.is_outside_outer(Vec3::new(bounds.outer_half.x - 0.01, 5.0, 0.0)));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let mut court = CourtGeometry::standard().unwrap();
        court.ball_radius = 2.0;
        assert!(matches!(court.validate(), Err(GeometryError::RimTooSmall { .. })));

        let mut court = CourtGeometry::standard().unwrap();
        court.hoops[0].parts.retain(|p| p.role != PartRole::Rim);
        assert_eq!(court.validate(), Err(GeometryError::MissingRim { side: HoopSide::Left }));

        let mut court = CourtGeometry::standard().unwrap();
        court.bounds.floor_y = f32::NAN;
        assert!(matches!(court.validate(), Err(GeometryError::NonFinite { .. })));

        let mut court = CourtGeometry::standard().unwrap();
        court.bounds.outer_half = Vec2::splat(1.0);
        assert_eq!(court.validate(), Err(GeometryError::InvertedBounds));
    }

    #[test]
    fn test_clamp_inner_per_axis() {
        let bounds = CourtBounds::standard();
        let clamped = bounds.clamp_inner(Vec3::new(100.0, 0.7, -3.0), BALL_RADIUS);
        assert_eq!(clamped, Vec3::new(COURT_WIDTH * 0.5 - BALL_RADIUS, 0.7, -3.0));
    }
}
