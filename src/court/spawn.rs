//! Mesh spawning for the court and hoops (windowed binary only)

use bevy::prelude::*;

use super::{CourtGeometry, PartRole, PartShape};
use crate::constants::*;

/// Marker for static court visuals
#[derive(Component)]
pub struct CourtVisual;

/// Spawn the court slab
pub fn spawn_court(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    court: &CourtGeometry,
) {
    let size = court.bounds.inner_half * 2.0;
    let slab_thickness = 0.2;
    commands.spawn((
        CourtVisual,
        Mesh3d(meshes.add(Cuboid::new(size.x, slab_thickness, size.y))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: COURT_COLOR,
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::from_xyz(0.0, court.bounds.floor_y - slab_thickness * 0.5, 0.0),
    ));
}

/// Spawn every hoop part as a primitive mesh
pub fn spawn_hoops(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    court: &CourtGeometry,
) {
    let rim_mat = materials.add(StandardMaterial {
        base_color: RIM_COLOR,
        metallic: 0.6,
        ..default()
    });
    let structure_mat = materials.add(StandardMaterial {
        base_color: STRUCTURE_COLOR,
        metallic: 0.4,
        ..default()
    });
    let board_mat = materials.add(StandardMaterial {
        base_color: BACKBOARD_COLOR,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let net_mat = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    for hoop in &court.hoops {
        for part in &hoop.parts {
            let material = match part.role {
                PartRole::Rim => rim_mat.clone(),
                PartRole::Backboard => board_mat.clone(),
                PartRole::Pole | PartRole::SupportArm => structure_mat.clone(),
                PartRole::Net => net_mat.clone(),
            };
            let (mesh, center) = match part.shape {
                PartShape::Torus { center, major, minor } => (
                    meshes.add(Torus {
                        minor_radius: minor,
                        major_radius: major,
                    }),
                    center,
                ),
                PartShape::Box { center, half } if part.role == PartRole::Net => (
                    meshes.add(ConicalFrustum {
                        radius_top: RIM_RADIUS,
                        radius_bottom: half.x * 0.6,
                        height: half.y * 2.0,
                    }),
                    center,
                ),
                PartShape::Box { center, half } => (meshes.add(Cuboid::from_size(half * 2.0)), center),
            };
            commands.spawn((
                CourtVisual,
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_translation(center),
            ));
        }
    }
}
