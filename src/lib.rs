//! Hoopshot - a 3D basketball shooting game built with Bevy
//!
//! This crate provides the game core (ball physics, hoop collision, shot
//! classification, game modes) as ECS resources and systems, plus the headless
//! simulation and scenario-testing tools built on top of it.

// Core modules
pub mod collaborators;
pub mod constants;
pub mod events;
pub mod gameplay;
pub mod helpers;
pub mod leaderboard;
pub mod settings;
pub mod simulation;
pub mod testing;
pub mod tuning;

// Game logic modules
pub mod ball;
pub mod court;
pub mod input;
pub mod modes;
pub mod scoring;
pub mod shooting;
pub mod ui;

// Re-export commonly used types for convenience
pub use ball::{Ball, BallBody, BallMode, BallTrail, HoopContact, StepReport, step_ball};
pub use collaborators::{
    AudioCue, AudioSink, Collaborators, FeedbackSink, Leaderboard, LogAudioSink, LogFeedbackSink,
    ScoreRecord,
};
pub use constants::*;
pub use court::{CourtBounds, CourtGeometry, GeometryError, Hoop, HoopSide, PartRole};
pub use events::{BusEvent, EventBus, GameEvent, SqliteEventLogger};
pub use gameplay::{GameplayPlugin, TickOutcome};
pub use input::{BallCommands, ControlIntent, ModeCommand, ModeCommands};
pub use leaderboard::{LeaderboardEntry, SqliteLeaderboard};
pub use modes::{GameModeKind, GamePhase, GameSummary, ModeController, ModeRules};
pub use scoring::{FeedbackCategory, GameStats, ShotFeedback, ShotTracker};
pub use settings::{CurrentSettings, InitSettings, save_settings_system};
pub use shooting::{AimIndicator, AimState, aimed_direction, launch_velocity};
pub use tuning::PhysicsTweaks;
