//! Event type definitions for the logging system

use serde::{Deserialize, Serialize};

use crate::ball::HoopContact;
use crate::court::HoopSide;
use crate::modes::GameModeKind;
use crate::scoring::ShotFeedback;

/// All game events that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Session Events ===
    /// Session started (generated once per game launch)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // ISO 8601
    },

    // === Mode Events ===
    /// Mode selected and a fresh game started
    ModeStarted { mode: GameModeKind },
    /// Two-player turn handed over after the ball stopped
    TurnSwitch { to_player: u8 },
    /// Win/loss condition reached
    GameEnded {
        mode: GameModeKind,
        won: bool,
        score: u32,
        attempts: u32,
        made: u32,
    },

    // === Ball Events ===
    /// Ball launched
    ShotLaunched {
        pos: (f32, f32, f32),
        velocity: (f32, f32, f32),
        pitch: f32,
    },
    /// Floor bounce
    FloorBounce { bounces: u32 },
    /// Touched a hoop part
    HoopContact { contact: HoopContact },
    /// Ball came to rest after a throw
    BallSettled { pos: (f32, f32, f32) },
    /// Ball put back at center court
    BallReset { forced: bool },

    // === Scoring Events ===
    /// Basket scored
    BasketMade { side: HoopSide, score: u32 },
    /// Verdict shown for the current throw
    Feedback { feedback: ShotFeedback },
}

impl GameEvent {
    /// Get the event type code for compact storage
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SE",
            GameEvent::ModeStarted { .. } => "MS",
            GameEvent::TurnSwitch { .. } => "TS",
            GameEvent::GameEnded { .. } => "GE",
            GameEvent::ShotLaunched { .. } => "SL",
            GameEvent::FloorBounce { .. } => "FB",
            GameEvent::HoopContact { .. } => "HC",
            GameEvent::BallSettled { .. } => "BS",
            GameEvent::BallReset { .. } => "BR",
            GameEvent::BasketMade { .. } => "G",
            GameEvent::Feedback { .. } => "FD",
        }
    }

    /// Variant name, as used in scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SessionStart",
            GameEvent::ModeStarted { .. } => "ModeStarted",
            GameEvent::TurnSwitch { .. } => "TurnSwitch",
            GameEvent::GameEnded { .. } => "GameEnded",
            GameEvent::ShotLaunched { .. } => "ShotLaunched",
            GameEvent::FloorBounce { .. } => "FloorBounce",
            GameEvent::HoopContact { .. } => "HoopContact",
            GameEvent::BallSettled { .. } => "BallSettled",
            GameEvent::BallReset { .. } => "BallReset",
            GameEvent::BasketMade { .. } => "BasketMade",
            GameEvent::Feedback { .. } => "Feedback",
        }
    }

    /// Optional detail for scenario matching (feedback verdict, hoop part, player)
    pub fn detail(&self) -> Option<String> {
        match self {
            GameEvent::Feedback { feedback } => Some(format!("{:?}", feedback)),
            GameEvent::HoopContact { contact } => Some(format!("{:?}", contact.role())),
            GameEvent::TurnSwitch { to_player } => Some(to_player.to_string()),
            GameEvent::ModeStarted { mode } => Some(format!("{:?}", mode)),
            GameEvent::GameEnded { won, .. } => Some(if *won { "won" } else { "lost" }.to_string()),
            _ => None,
        }
    }
}

/// Convert a vector to a serializable tuple
pub fn vec_tuple(v: bevy::math::Vec3) -> (f32, f32, f32) {
    (v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_roundtrip() {
        let event = GameEvent::Feedback { feedback: ShotFeedback::Close };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(event.detail().as_deref(), Some("Close"));
    }
}
