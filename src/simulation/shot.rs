//! Single-shot simulation on the pure core
//!
//! Places a resting ball, aims at the nearest rim, launches, and steps the
//! ball physics until it settles, classifying the throw the same way the
//! game does. No Bevy app is involved, so thousands of shots run per second.

use bevy::prelude::*;

use crate::ball::{BallBody, HoopContact, step_ball};
use crate::constants::MIN_TICK_DT;
use crate::court::CourtGeometry;
use crate::input::ControlIntent;
use crate::scoring::{ShotFeedback, ShotTracker};
use crate::shooting::{AimState, aimed_direction, launch};
use crate::tuning::PhysicsTweaks;

/// Ten seconds of fixed ticks
pub const DEFAULT_MAX_TICKS: u32 = 600;

/// Outcome of one simulated throw
#[derive(Debug, Clone, PartialEq)]
pub struct ShotResult {
    pub made: bool,
    /// Verdict the player would have seen; `None` on timeout
    pub feedback: Option<ShotFeedback>,
    pub ticks: u32,
    pub launch_velocity: Vec3,
    pub peak_height: f32,
    pub contacts: Vec<HoopContact>,
    pub rest_position: Vec3,
    /// False when the tick cap was hit before the ball came to rest
    pub settled: bool,
}

/// Resting ball position at a court spot
pub fn court_spot(court: &CourtGeometry, x: f32, z: f32) -> Vec3 {
    Vec3::new(x, court.bounds.floor_y + court.ball_radius, z)
}

/// Throw from `start` at `pitch` toward the hoop on that half of the court
pub fn simulate_shot(
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
    start: Vec3,
    pitch: f32,
    max_ticks: u32,
) -> ShotResult {
    let mut body = BallBody::at_rest(start, court.ball_radius);
    let rim = court.hoop_for(start).rim_center();
    let mut aim = AimState::default();
    aim.set_pitch(pitch);
    aim.direction = aimed_direction(start, rim, aim.pitch);

    let intent = ControlIntent::default();
    let mut tracker = ShotTracker::default();
    let mut result = ShotResult {
        made: false,
        feedback: None,
        ticks: 0,
        launch_velocity: launch(&mut body, &aim, tweaks).unwrap_or(Vec3::ZERO),
        peak_height: start.y,
        contacts: Vec::new(),
        rest_position: start,
        settled: false,
    };

    while result.ticks < max_ticks {
        result.ticks += 1;
        let report = step_ball(&mut body, &intent, court, tweaks, MIN_TICK_DT);
        result.peak_height = result.peak_height.max(body.position.y);

        if body.is_airborne() {
            let rim = court.hoop_for(body.position).rim_center();
            tracker.observe_flight(body.position, rim);
        }
        if let Some(contact) = report.contact {
            result.made |= matches!(contact, HoopContact::Made { .. });
            result.contacts.push(contact);
            tracker.on_contact(&contact);
        }
        if report.forced_reset() {
            tracker.on_forced_reset();
        } else if report.settled {
            tracker.on_settle();
        }
        if report.settled {
            result.settled = true;
            break;
        }
    }

    result.feedback = tracker.feedback;
    result.rest_position = body.position;
    result
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_3;

    use super::*;
    use crate::constants::*;
    use crate::court::HoopSide;

    fn setup() -> (CourtGeometry, PhysicsTweaks) {
        (CourtGeometry::standard().unwrap(), PhysicsTweaks::default())
    }

    #[test]
    fn test_flat_throw_from_center_is_weak() {
        let (court, tweaks) = setup();
        let start = court_spot(&court, 0.0, 0.0);
        let result = simulate_shot(&court, &tweaks, start, 0.0, DEFAULT_MAX_TICKS);
        assert!(result.settled);
        assert!(!result.made);
        assert_eq!(result.launch_velocity.y, 0.0);
        assert_eq!(result.feedback, Some(ShotFeedback::TooWeak));
    }

    #[test]
    fn test_sixty_degree_throw_from_center_swishes() {
        let (court, tweaks) = setup();
        let start = court_spot(&court, 0.0, 0.0);
        for pitch in [FRAC_PI_3 - 0.004, FRAC_PI_3, FRAC_PI_3 + 0.004] {
            let result = simulate_shot(&court, &tweaks, start, pitch, DEFAULT_MAX_TICKS);
            assert!(result.made, "pitch {} should score", pitch);
            assert_eq!(result.feedback, Some(ShotFeedback::Made));
            assert!(result.settled);
            assert_eq!(
                result.contacts.first(),
                Some(&HoopContact::Made { side: HoopSide::Right })
            );
            assert_eq!(
                result.contacts.iter().filter(|c| matches!(c, HoopContact::Made { .. })).count(),
                1
            );
        }
    }

    #[test]
    fn test_center_line_throws_always_finish() {
        let (court, tweaks) = setup();
        for step in 0..86 {
            let start = court_spot(&court, step as f32 * 0.5, 0.0);
            for i in 0..=30 {
                let pitch = PITCH_MAX * i as f32 / 30.0;
                let result = simulate_shot(&court, &tweaks, start, pitch, 3000);
                assert!(
                    result.settled,
                    "throw from {:?} at pitch {} never came to rest",
                    start, pitch
                );
            }
        }
    }

    #[test]
    fn test_vertical_throw_lands_near_start() {
        let (court, tweaks) = setup();
        let start = court_spot(&court, 10.0, 5.0);
        let result = simulate_shot(&court, &tweaks, start, PITCH_MAX, DEFAULT_MAX_TICKS);
        assert!(result.settled);
        assert!(result.peak_height > RIM_HEIGHT);
        assert!(result.rest_position.xz().distance(start.xz()) < 1.0);
        assert!(!result.made);
    }

    #[test]
    fn test_tick_cap_reports_unsettled() {
        let (court, tweaks) = setup();
        let start = court_spot(&court, 0.0, 0.0);
        let result = simulate_shot(&court, &tweaks, start, 1.0, 5);
        assert_eq!(result.ticks, 5);
        assert!(!result.settled);
        assert!(result.feedback.is_none());
    }

    #[test]
    fn test_deterministic() {
        let (court, tweaks) = setup();
        let start = court_spot(&court, -20.0, 8.0);
        let a = simulate_shot(&court, &tweaks, start, 0.9, DEFAULT_MAX_TICKS);
        let b = simulate_shot(&court, &tweaks, start, 0.9, DEFAULT_MAX_TICKS);
        assert_eq!(a, b);
        // Left half aims at the left hoop
        assert!(a.launch_velocity.x < 0.0);
    }
}
