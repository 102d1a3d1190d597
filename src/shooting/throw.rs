//! Ball launch and reset

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::ball::{Ball, BallBody, BallMode, BallTrail};
use crate::court::CourtGeometry;
use crate::events::{EventBus, GameEvent, vec_tuple};
use crate::gameplay::TickOutcome;
use crate::input::{BallCommands, ControlIntent};
use crate::modes::ModeController;
use crate::scoring::{GameStats, ShotTracker};
use crate::shooting::{AimIndicator, AimState, aimed_direction};
use crate::tuning::PhysicsTweaks;

/// Launch speed grows linearly with pitch: base force at 0, base + bonus at vertical.
/// No minimum upward component is enforced, so a flat throw leaves with zero vertical velocity.
pub fn launch_velocity(direction: Vec3, pitch: f32, tweaks: &PhysicsTweaks) -> Vec3 {
    let pitch = pitch.clamp(0.0, FRAC_PI_2);
    let speed = tweaks.throw_force + tweaks.throw_pitch_bonus * (pitch / FRAC_PI_2);
    direction.try_normalize().unwrap_or(Vec3::X) * speed
}

/// Put a grounded ball into flight. Returns the launch velocity, or `None` if already airborne.
pub fn launch(body: &mut BallBody, aim: &AimState, tweaks: &PhysicsTweaks) -> Option<Vec3> {
    if body.is_airborne() {
        return None;
    }
    body.velocity = launch_velocity(aim.direction, aim.pitch, tweaks);
    body.mode = BallMode::Airborne;
    body.bounces = 0;
    body.scored_this_throw = false;
    body.perched_contacts = 0;
    Some(body.velocity)
}

/// Consume launch/reset commands queued by input or the mode controller
pub fn apply_ball_commands(
    tweaks: Res<PhysicsTweaks>,
    court: Res<CourtGeometry>,
    aim: Res<AimState>,
    mode: Res<ModeController>,
    mut commands: ResMut<BallCommands>,
    mut intent: ResMut<ControlIntent>,
    mut indicator: ResMut<AimIndicator>,
    mut tracker: ResMut<ShotTracker>,
    mut stats: ResMut<GameStats>,
    mut outcome: ResMut<TickOutcome>,
    mut bus: ResMut<EventBus>,
    mut ball_query: Query<(&mut BallBody, &mut BallTrail), With<Ball>>,
) {
    let pending = std::mem::take(&mut *commands);
    if !mode.accepts_play_input() {
        intent.clear();
    }
    let Ok((mut body, mut trail)) = ball_query.single_mut() else {
        return;
    };

    let manual_reset = pending.reset && mode.allows_manual_reset();
    if pending.forced_reset || manual_reset {
        outcome.reset_in_flight = body.is_airborne();
        body.reset();
        trail.clear();
        tracker.begin_throw();
        indicator.track(body.position, aim.direction);
        outcome.reset = true;
        info!("Ball reset{}", if pending.forced_reset { " (forced)" } else { "" });
        bus.emit(GameEvent::BallReset { forced: pending.forced_reset });
        return;
    }

    if !pending.launch || !mode.accepts_play_input() {
        return;
    }
    let origin = body.position;
    // Aim from where the ball is now; the stored direction may be a tick old
    let rim = court.hoop_for(origin).rim_center();
    let current_aim = AimState {
        direction: aimed_direction(origin, rim, aim.pitch),
        ..*aim
    };
    let Some(velocity) = launch(&mut body, &current_aim, &tweaks) else {
        return;
    };

    stats.record_attempt();
    tracker.begin_throw();
    intent.clear();
    indicator.visible = false;
    if velocity.y > 0.0 {
        trail.start(origin);
    } else {
        trail.clear();
    }
    outcome.launched = true;
    info!(
        "Launch from ({:.1}, {:.1}) pitch {:.2} speed {:.1}",
        origin.x,
        origin.z,
        aim.pitch,
        velocity.length()
    );
    bus.emit(GameEvent::ShotLaunched {
        pos: vec_tuple(origin),
        velocity: vec_tuple(velocity),
        pitch: aim.pitch,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    #[test]
    fn test_flat_launch_has_no_vertical_velocity() {
        let tweaks = PhysicsTweaks::default();
        let dir = aimed_direction(BALL_SPAWN, Vec3::new(HOOP_RIM_X, RIM_HEIGHT, 0.0), 0.0);
        let v = launch_velocity(dir, 0.0, &tweaks);
        assert_eq!(v.y, 0.0);
        assert!((v.length() - THROW_FORCE).abs() < 1e-4);
    }

    #[test]
    fn test_bonus_is_linear_in_pitch() {
        let tweaks = PhysicsTweaks::default();
        let half = launch_velocity(Vec3::X, FRAC_PI_2 * 0.5, &tweaks);
        assert!((half.length() - (THROW_FORCE + THROW_PITCH_BONUS * 0.5)).abs() < 1e-3);
        let full = launch_velocity(Vec3::Y, FRAC_PI_2, &tweaks);
        assert!((full.y - (THROW_FORCE + THROW_PITCH_BONUS)).abs() < 1e-3);
    }

    #[test]
    fn test_launch_only_from_ground() {
        let tweaks = PhysicsTweaks::default();
        let aim = AimState { pitch: 0.8, ..default() };
        let mut body = BallBody::default();
        assert!(launch(&mut body, &aim, &tweaks).is_some());
        assert!(body.is_airborne());
        let v = body.velocity;
        assert!(launch(&mut body, &aim, &tweaks).is_none());
        assert_eq!(body.velocity, v);
    }
}
