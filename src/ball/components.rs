//! Ball-related components

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::constants::*;

/// Marker for ball entities
#[derive(Component)]
pub struct Ball;

/// Who is moving the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BallMode {
    /// Grounded; the player slides it around the court and aims
    #[default]
    Controlled,
    /// In flight after a launch, integrated ballistically
    Airborne,
}

/// Authoritative ball state. Only the physics step writes it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct BallBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// Reset point (center court, resting on the floor)
    pub home: Vec3,
    pub mode: BallMode,
    /// Floor bounces since launch
    pub bounces: u32,
    /// Latched on the first make of a throw
    pub scored_this_throw: bool,
    /// Contacts resting on top of a hoop part since launch
    pub perched_contacts: u32,
}

impl Default for BallBody {
    fn default() -> Self {
        Self::at_rest(BALL_SPAWN, BALL_RADIUS)
    }
}

impl BallBody {
    pub fn at_rest(home: Vec3, radius: f32) -> Self {
        Self {
            position: home,
            velocity: Vec3::ZERO,
            radius,
            home,
            mode: BallMode::Controlled,
            bounces: 0,
            scored_this_throw: false,
            perched_contacts: 0,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.mode == BallMode::Airborne
    }

    /// Back to center court at rest with all throw-scoped flags cleared
    pub fn reset(&mut self) {
        *self = Self::at_rest(self.home, self.radius);
    }

    /// Stop dead and hand control back to the player
    pub fn come_to_rest(&mut self) {
        self.velocity = Vec3::ZERO;
        self.mode = BallMode::Controlled;
    }
}

/// Recent flight positions for the trail effect
#[derive(Component, Debug, Clone)]
pub struct BallTrail {
    pub points: VecDeque<Vec3>,
    pub active: bool,
    pub max_points: usize,
}

impl Default for BallTrail {
    fn default() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_MAX_POINTS),
            active: false,
            max_points: TRAIL_MAX_POINTS,
        }
    }
}

impl BallTrail {
    pub fn start(&mut self, origin: Vec3) {
        self.points.clear();
        self.points.push_back(origin);
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.active = false;
    }

    /// Record a point while active, dropping the oldest beyond capacity
    pub fn record(&mut self, point: Vec3) {
        if !self.active {
            return;
        }
        self.points.push_back(point);
        while self.points.len() > self.max_points {
            self.points.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_is_idempotent() {
        let mut body = BallBody::default();
        body.position = Vec3::new(10.0, 4.0, -3.0);
        body.velocity = Vec3::new(1.0, 2.0, 3.0);
        body.mode = BallMode::Airborne;
        body.bounces = 3;
        body.scored_this_throw = true;

        body.reset();
        let first = body.clone();
        body.reset();
        assert_eq!(body, first);
        assert_eq!(body.position, BALL_SPAWN);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert!(!body.is_airborne());
        assert!(!body.scored_this_throw);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut trail = BallTrail::default();
        trail.record(Vec3::ONE);
        assert!(trail.points.is_empty());

        trail.start(Vec3::ZERO);
        for i in 0..(TRAIL_MAX_POINTS * 2) {
            trail.record(Vec3::splat(i as f32));
        }
        assert_eq!(trail.points.len(), TRAIL_MAX_POINTS);
        assert_eq!(trail.points.back(), Some(&Vec3::splat((TRAIL_MAX_POINTS * 2 - 1) as f32)));
    }
}
