//! Tunable constants for hoopshot
//!
//! All gameplay values are defined here for easy tweaking.
//! World units are roughly feet; +x points at the right hoop, +y is up.

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

// =============================================================================
// COURT DIMENSIONS
// =============================================================================

pub const COURT_WIDTH: f32 = 94.0; // Along x, hoop to hoop
pub const COURT_DEPTH: f32 = 50.0; // Along z, sideline to sideline
pub const COURT_FLOOR_Y: f32 = 0.1; // Top surface of the court slab
pub const OUTER_MARGIN: f32 = 15.0; // Outer world rectangle = court + margin on each side
pub const FALL_THROUGH_Y: f32 = -5.0; // Below this the ball is force-reset

// =============================================================================
// BALL
// =============================================================================

pub const BALL_RADIUS: f32 = 0.6;
pub const BALL_REST_Y: f32 = COURT_FLOOR_Y + BALL_RADIUS;
pub const BALL_SPAWN: Vec3 = Vec3::new(0.0, BALL_REST_Y, 0.0);

// =============================================================================
// BALL PHYSICS
// =============================================================================

pub const GRAVITY: f32 = -19.6; // Doubled for arcade feel
pub const AIR_FRICTION: f32 = 0.99; // Velocity retained per tick while airborne
pub const RESTITUTION: f32 = 0.7; // Fraction of impact speed kept after a bounce
pub const MIN_BOUNCE_SPEED: f32 = 2.0; // Below this vertical speed the ball stops bouncing
pub const ROLL_DAMP: f32 = 0.96; // Horizontal velocity retained per tick while rolling
pub const SLEEP_SPEED: f32 = 1.0; // Rolling ball below this speed goes to sleep
pub const SETTLE_SPEED_SQ: f32 = 0.05; // Speed² under which a near-floor ball is at rest
pub const NEAR_FLOOR_BAND: f32 = 0.3; // Height above rest that still counts as "on the floor"
pub const MAX_BOUNCES: u32 = 5; // Forced rest after this many floor bounces
pub const PERCH_NORMAL_Y: f32 = 0.7; // Box contact normals steeper than this hold the ball up
pub const PERCH_CONTACT_LIMIT: u32 = 30; // Resting contacts on a hoop part before the ball is reset
pub const MIN_TICK_DT: f32 = 1.0 / 60.0; // Minimum dt for headless mode compatibility
pub const FIXED_HZ: f64 = 60.0;

// =============================================================================
// AIM & THROW
// =============================================================================

pub const MOVE_SPEED: f32 = 20.0; // Ball translation speed while under control
pub const PITCH_RATE: f32 = std::f32::consts::PI / 3.0; // Radians per second
pub const PITCH_MIN: f32 = 0.0;
pub const PITCH_MAX: f32 = FRAC_PI_2;
pub const THROW_FORCE: f32 = 43.0; // Base launch speed
pub const THROW_PITCH_BONUS: f32 = 25.0; // Extra speed at full pitch, linear in pitch
pub const STICK_DEADZONE: f32 = 0.25;

// =============================================================================
// HOOPS (right hoop; the left hoop mirrors across x = 0)
// =============================================================================

pub const HOOP_RIM_X: f32 = 43.0;
pub const RIM_HEIGHT: f32 = 9.2;
pub const RIM_RADIUS: f32 = 1.1; // Torus major radius
pub const RIM_TUBE_RADIUS: f32 = 0.08; // Torus minor radius
pub const BACKBOARD_OFFSET: f32 = RIM_RADIUS + 0.35; // Rim center to backboard face
pub const BACKBOARD_HALF: Vec3 = Vec3::new(0.05, 1.05, 1.8);
pub const BACKBOARD_RISE: f32 = 0.9; // Backboard center above rim
pub const SUPPORT_ARM_HALF: Vec3 = Vec3::new(0.8, 0.1, 0.1);
pub const POLE_HEIGHT: f32 = 11.0;
pub const POLE_HALF_THICKNESS: f32 = 0.15;
pub const NET_LENGTH: f32 = 1.4;

// =============================================================================
// SHOT CLASSIFICATION
// =============================================================================

pub const HOOP_AREA_RADIUS: f32 = 8.0; // Within this distance of the rim = "reached hoop area"
pub const OVERSHOT_HORIZONTAL: f32 = 3.0; // Horizontal distance for the overshot check
pub const OVERSHOT_HEIGHT: f32 = 5.0; // Height above rim for the overshot check

// =============================================================================
// GAME MODES
// =============================================================================

pub const POINTS_PER_BASKET: u32 = 2;
pub const TIMED_CHALLENGE_SECS: f32 = 60.0;
pub const SHOT_LIMIT_ATTEMPTS: u32 = 15;
pub const SHOT_LIMIT_TARGET: u32 = 10;
pub const TWO_PLAYER_TARGET: u32 = 3;
pub const LEADERBOARD_SIZE: usize = 10;

// =============================================================================
// TRAIL
// =============================================================================

pub const TRAIL_MAX_POINTS: usize = 40;

// =============================================================================
// COLORS (windowed binary only)
// =============================================================================

pub const CLEAR_COLOR: Color = Color::srgb(0.02, 0.02, 0.03);
pub const COURT_COLOR: Color = Color::srgb(0.78, 0.53, 0.26); // Wood brown
pub const BALL_COLOR: Color = Color::srgb(0.93, 0.45, 0.13);
pub const RIM_COLOR: Color = Color::srgb(0.95, 0.35, 0.1);
pub const STRUCTURE_COLOR: Color = Color::srgb(0.25, 0.41, 0.88); // Pole and arm
pub const BACKBOARD_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.9);
pub const AIM_COLOR: Color = Color::srgb(1.0, 0.9, 0.2);
pub const TRAIL_COLOR: Color = Color::srgb(1.0, 0.6, 0.2);
pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.9, 0.8);
