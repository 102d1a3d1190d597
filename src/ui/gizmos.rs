//! Gizmo drawing for the aim indicator and ball trail

use bevy::prelude::*;

use crate::ball::{Ball, BallTrail};
use crate::constants::*;
use crate::shooting::{AimIndicator, AimState};

/// Arrow length at zero pitch; grows toward vertical so power reads at a glance
const AIM_ARROW_BASE: f32 = 3.0;
const AIM_ARROW_GROWTH: f32 = 2.0;

pub fn draw_aim_indicator(mut gizmos: Gizmos, indicator: Res<AimIndicator>, aim: Res<AimState>) {
    if !indicator.visible {
        return;
    }
    let power = (aim.pitch - PITCH_MIN) / (PITCH_MAX - PITCH_MIN).max(f32::EPSILON);
    let length = AIM_ARROW_BASE + AIM_ARROW_GROWTH * power;
    gizmos.arrow(
        indicator.position,
        indicator.position + indicator.direction * length,
        AIM_COLOR,
    );
}

pub fn draw_ball_trail(mut gizmos: Gizmos, query: Query<&BallTrail, With<Ball>>) {
    for trail in &query {
        if trail.points.len() < 2 {
            continue;
        }
        gizmos.linestrip(trail.points.iter().copied(), TRAIL_COLOR);
    }
}
