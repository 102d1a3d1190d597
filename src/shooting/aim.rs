//! Aim direction and pitch control

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::ball::{Ball, BallBody};
use crate::constants::*;
use crate::court::CourtGeometry;
use crate::helpers::flat_direction;
use crate::input::ControlIntent;
use crate::tuning::PhysicsTweaks;

/// Pitch close enough to vertical that tan() is meaningless
const NEAR_VERTICAL: f32 = 1e-4;

/// Current aim. Pitch persists between throws; direction is recomputed every tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct AimState {
    /// Launch elevation in [PITCH_MIN, PITCH_MAX]
    pub pitch: f32,
    /// Radians per second while a power key is held
    pub pitch_rate: f32,
    /// Unit launch direction
    pub direction: Vec3,
}

impl Default for AimState {
    fn default() -> Self {
        Self {
            pitch: PITCH_MIN,
            pitch_rate: PITCH_RATE,
            direction: Vec3::X,
        }
    }
}

impl AimState {
    /// Raise or lower pitch at the fixed rate, always clamped
    pub fn adjust_pitch(&mut self, increase: bool, decrease: bool, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let sign = (increase as i8 - decrease as i8) as f32;
        self.pitch = (self.pitch + sign * self.pitch_rate * dt).clamp(PITCH_MIN, PITCH_MAX);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        if pitch.is_finite() {
            self.pitch = pitch.clamp(PITCH_MIN, PITCH_MAX);
        }
    }
}

/// Flat bearing from ball to rim, raised by `tan(pitch)` and renormalized
pub fn aimed_direction(ball: Vec3, rim: Vec3, pitch: f32) -> Vec3 {
    let fallback = if rim.x >= 0.0 { Vec3::X } else { Vec3::NEG_X };
    let flat = flat_direction(ball, rim, fallback);
    if pitch >= FRAC_PI_2 - NEAR_VERTICAL {
        return Vec3::Y;
    }
    Vec3::new(flat.x, pitch.tan(), flat.z)
        .try_normalize()
        .unwrap_or(flat)
}

/// Aim arrow state for rendering
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct AimIndicator {
    pub position: Vec3,
    pub direction: Vec3,
    pub visible: bool,
}

impl Default for AimIndicator {
    fn default() -> Self {
        Self {
            position: BALL_SPAWN,
            direction: Vec3::X,
            visible: true,
        }
    }
}

impl AimIndicator {
    pub fn track(&mut self, position: Vec3, direction: Vec3) {
        self.position = position;
        self.direction = direction;
        self.visible = true;
    }
}

/// Update pitch and aim direction while grounded; hide the indicator in flight
pub fn update_aim(
    time: Res<Time>,
    tweaks: Res<PhysicsTweaks>,
    intent: Res<ControlIntent>,
    court: Res<CourtGeometry>,
    mut aim: ResMut<AimState>,
    mut indicator: ResMut<AimIndicator>,
    ball_query: Query<&BallBody, With<Ball>>,
) {
    // Use minimum dt for headless mode compatibility
    let dt = time.delta_secs().max(MIN_TICK_DT);
    let Ok(body) = ball_query.single() else {
        return;
    };

    if body.is_airborne() {
        indicator.visible = false;
        return;
    }

    aim.pitch_rate = tweaks.pitch_rate;
    aim.adjust_pitch(intent.increase_power, intent.decrease_power, dt);
    let rim = court.hoop_for(body.position).rim_center();
    aim.direction = aimed_direction(body.position, rim, aim.pitch);
    indicator.track(body.position, aim.direction);
}
