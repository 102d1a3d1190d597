//! Ball vs hoop part contact
//!
//! At most one part is resolved per tick. Parts are visited in declaration
//! order (rim, backboard, arm, pole) on the ball's own hoop first, and the
//! first part that produces a contact wins. This is not closest-contact
//! resolution: two overlapping parts in one tick resolve against whichever
//! comes first.

use bevy::prelude::*;

use super::components::BallBody;
use crate::constants::PERCH_NORMAL_Y;
use crate::court::{CourtGeometry, HoopSide, PartRole, PartShape};
use crate::helpers::{
    box_exit_normal, closest_point_on_box, flat_direction, horizontal_distance, reflect_scaled,
};

/// Result of touching a hoop part
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum HoopContact {
    /// Dropped through the rim opening while descending (first time this throw)
    Made { side: HoopSide },
    /// Inside the opening but rising or already scored
    RimGraze { side: HoopSide, below_rim: bool },
    /// Bounced off the rim tube
    RimDeflect { side: HoopSide },
    Backboard { side: HoopSide },
    /// Pole or support arm, classified by height against the rim
    Structure { side: HoopSide, role: PartRole, above_rim: bool },
}

impl HoopContact {
    pub fn side(&self) -> HoopSide {
        match *self {
            HoopContact::Made { side }
            | HoopContact::RimGraze { side, .. }
            | HoopContact::RimDeflect { side }
            | HoopContact::Backboard { side }
            | HoopContact::Structure { side, .. } => side,
        }
    }

    pub fn role(&self) -> PartRole {
        match *self {
            HoopContact::Made { .. } | HoopContact::RimGraze { .. } | HoopContact::RimDeflect { .. } => {
                PartRole::Rim
            }
            HoopContact::Backboard { .. } => PartRole::Backboard,
            HoopContact::Structure { role, .. } => role,
        }
    }
}

/// Resolve at most one hoop part against the ball
pub fn resolve_hoop_contact(
    body: &mut BallBody,
    previous: Vec3,
    court: &CourtGeometry,
    restitution: f32,
) -> Option<HoopContact> {
    let radius = body.radius;
    for hoop in court.hoops_by_side(body.position) {
        let rim_y = hoop.rim_center().y;
        for part in &hoop.parts {
            if !part.role.is_collidable() {
                continue;
            }
            let contact = match part.shape {
                PartShape::Torus { center, major, minor } => {
                    // A fast ball can skip the rim slab in one tick, so plane crossings also count
                    let crossed = crossed_rim_plane(previous, body.position, center, major - radius);
                    if !crossed && !part.bounds.intersects_sphere(body.position, radius) {
                        continue;
                    }
                    rim_contact(body, hoop.side, center, major, minor, restitution, crossed)
                }
                PartShape::Box { center, half } => {
                    if !part.bounds.intersects_sphere(body.position, radius) {
                        continue;
                    }
                    let Some(normal) = box_contact(body, center, half, restitution) else {
                        continue;
                    };
                    if normal.y > PERCH_NORMAL_Y {
                        body.perched_contacts += 1;
                    }
                    Some(match part.role {
                        PartRole::Backboard => HoopContact::Backboard { side: hoop.side },
                        role => HoopContact::Structure {
                            side: hoop.side,
                            role,
                            above_rim: body.position.y > rim_y,
                        },
                    })
                }
            };
            if contact.is_some() {
                return contact;
            }
        }
    }
    None
}

/// Ball center passed downward through the rim plane inside the opening
fn crossed_rim_plane(previous: Vec3, current: Vec3, center: Vec3, opening: f32) -> bool {
    if !(previous.y >= center.y && current.y < center.y) {
        return false;
    }
    let span = previous.y - current.y;
    let t = if span > f32::EPSILON { (previous.y - center.y) / span } else { 0.0 };
    let at_plane = previous.lerp(current, t);
    horizontal_distance(at_plane, center) < opening
}

fn rim_contact(
    body: &mut BallBody,
    side: HoopSide,
    center: Vec3,
    major: f32,
    minor: f32,
    restitution: f32,
    crossed: bool,
) -> Option<HoopContact> {
    let radius = body.radius;
    let distance = horizontal_distance(body.position, center);

    if crossed || distance < major - radius {
        if body.velocity.y < 0.0 && !body.scored_this_throw {
            body.scored_this_throw = true;
            return Some(HoopContact::Made { side });
        }
        return Some(HoopContact::RimGraze {
            side,
            below_rim: body.position.y < center.y,
        });
    }

    // Nearest point on the ring centerline
    let radial = flat_direction(center, body.position, Vec3::X);
    let ring_point = center + radial * major;
    let gap = body.position.distance(ring_point);
    let reach = radius + minor;
    if gap >= reach {
        return None;
    }

    let normal = if distance >= major { radial } else { -radial };
    body.velocity = reflect_scaled(body.velocity, normal, restitution);
    body.position += normal * (reach - gap);
    Some(HoopContact::RimDeflect { side })
}

/// Sphere vs box; reflects and pushes out. Returns the contact normal.
fn box_contact(body: &mut BallBody, center: Vec3, half: Vec3, restitution: f32) -> Option<Vec3> {
    let radius = body.radius;
    let closest = closest_point_on_box(center, half, body.position);
    let offset = body.position - closest;
    let dist_sq = offset.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }

    let (normal, depth) = if dist_sq > 1e-8 {
        let dist = dist_sq.sqrt();
        (offset / dist, radius - dist)
    } else {
        // Center is inside the box
        let (normal, depth) = box_exit_normal(center, half, body.position);
        (normal, depth + radius)
    };
    body.velocity = reflect_scaled(body.velocity, normal, restitution);
    body.position += normal * depth;
    Some(normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::components::BallMode;
    use crate::constants::*;

    fn airborne_at(position: Vec3, velocity: Vec3) -> BallBody {
        BallBody {
            position,
            velocity,
            mode: BallMode::Airborne,
            ..BallBody::default()
        }
    }

    #[test]
    fn test_descending_through_rim_scores_once() {
        let court = CourtGeometry::standard().unwrap();
        let mut body = airborne_at(
            Vec3::new(HOOP_RIM_X, RIM_HEIGHT + 0.2, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
        );

        let previous = body.position;
        let first = resolve_hoop_contact(&mut body, previous, &court, RESTITUTION);
        assert_eq!(first, Some(HoopContact::Made { side: HoopSide::Right }));
        assert!(body.scored_this_throw);

        let previous = body.position;
        let second = resolve_hoop_contact(&mut body, previous, &court, RESTITUTION);
        assert!(matches!(second, Some(HoopContact::RimGraze { .. })));
    }

    #[test]
    fn test_rising_inside_rim_is_graze() {
        let court = CourtGeometry::standard().unwrap();
        let mut body = airborne_at(
            Vec3::new(HOOP_RIM_X, RIM_HEIGHT - 0.3, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
        );
        let previous = body.position;
        let contact = resolve_hoop_contact(&mut body, previous, &court, RESTITUTION);
        assert_eq!(
            contact,
            Some(HoopContact::RimGraze { side: HoopSide::Right, below_rim: true })
        );
        assert!(!body.scored_this_throw);
    }

    #[test]
    fn test_fast_ball_crossing_plane_scores() {
        let court = CourtGeometry::standard().unwrap();
        let previous = Vec3::new(HOOP_RIM_X, RIM_HEIGHT + 1.0, 0.0);
        let mut body = airborne_at(
            Vec3::new(HOOP_RIM_X, RIM_HEIGHT - 1.0, 0.0),
            Vec3::new(0.0, -120.0, 0.0),
        );
        let contact = resolve_hoop_contact(&mut body, previous, &court, RESTITUTION);
        assert_eq!(contact, Some(HoopContact::Made { side: HoopSide::Right }));
    }

    #[test]
    fn test_rim_tube_deflects_outward() {
        let court = CourtGeometry::standard().unwrap();
        // Just outside the ring, level with it, moving inward
        let start = Vec3::new(HOOP_RIM_X - RIM_RADIUS - 0.5, RIM_HEIGHT, 0.0);
        let mut body = airborne_at(start, Vec3::new(8.0, 0.0, 0.0));
        let contact = resolve_hoop_contact(&mut body, start, &court, RESTITUTION);
        assert_eq!(contact, Some(HoopContact::RimDeflect { side: HoopSide::Right }));
        assert!(body.velocity.x < 0.0);
        assert!((body.velocity.x + 8.0 * RESTITUTION).abs() < 1e-4);
        assert!(body.position.x < start.x);
    }

    #[test]
    fn test_backboard_reflects_and_reports() {
        let court = CourtGeometry::standard().unwrap();
        let board_face = HOOP_RIM_X + BACKBOARD_OFFSET - BACKBOARD_HALF.x;
        let start = Vec3::new(board_face - 0.4, RIM_HEIGHT + BACKBOARD_RISE, 0.0);
        let mut body = airborne_at(start, Vec3::new(20.0, 1.0, 0.0));
        let contact = resolve_hoop_contact(&mut body, start, &court, RESTITUTION);
        assert_eq!(contact, Some(HoopContact::Backboard { side: HoopSide::Right }));
        assert!((body.velocity.x + 20.0 * RESTITUTION).abs() < 1e-4);
        assert!((body.velocity.y - 1.0 * RESTITUTION).abs() < 1e-4);
        assert!(body.position.x <= board_face - BALL_RADIUS + 1e-4);
    }

    #[test]
    fn test_pole_below_rim_is_low_structure_hit() {
        let court = CourtGeometry::standard().unwrap();
        let hoop = court.hoop_for(Vec3::X);
        let pole = hoop.part(PartRole::Pole).unwrap().shape.center();
        let start = Vec3::new(pole.x - POLE_HALF_THICKNESS - 0.5, 3.0, 0.0);
        let mut body = airborne_at(start, Vec3::new(10.0, 0.0, 0.0));
        let contact = resolve_hoop_contact(&mut body, start, &court, RESTITUTION);
        assert_eq!(
            contact,
            Some(HoopContact::Structure {
                side: HoopSide::Right,
                role: PartRole::Pole,
                above_rim: false
            })
        );
        assert!(body.velocity.x < 0.0);
    }

    #[test]
    fn test_far_from_hoops_no_contact() {
        let court = CourtGeometry::standard().unwrap();
        let mut body = airborne_at(Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
        let before = body.clone();
        assert_eq!(resolve_hoop_contact(&mut body, before.position, &court, RESTITUTION), None);
        assert_eq!(body, before);
    }
}
