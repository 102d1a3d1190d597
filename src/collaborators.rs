//! Outbound interfaces the game core calls into
//!
//! Audio, on-screen feedback and the leaderboard are owned by the host. The
//! core only sees these traits through the [`Collaborators`] resource; every
//! call is a no-op when the slot is empty.

use bevy::prelude::*;

use crate::modes::GameSummary;
use crate::scoring::FeedbackCategory;

/// Fire-and-forget sound cues
pub trait AudioSink: Send + Sync {
    fn play_bounce(&self);
    fn play_net_swish(&self);
    fn play_backboard_hit(&self);
    fn play_score(&self);
}

/// On-screen messages. The sink owns timing and removal.
pub trait FeedbackSink: Send + Sync {
    fn show_feedback(&self, message: &str, category: FeedbackCategory);

    fn show_summary(&self, _summary: &GameSummary) {}
}

/// A finished game eligible for the leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub mode_name: String,
    pub player_name: String,
    pub score: u32,
    pub attempts: u32,
    pub made: u32,
    /// Percentage, rounded
    pub accuracy: u32,
}

/// High-score table keyed by mode name
pub trait Leaderboard: Send + Sync {
    fn is_high_score(&self, mode_name: &str, score: u32) -> bool;
    fn record_score(&mut self, record: ScoreRecord);

    /// Printable standings for a mode, if the board can show them
    fn standings(&self, _mode_name: &str) -> Option<String> {
        None
    }
}

/// Injected collaborators. Empty slots silently drop calls.
#[derive(Resource, Default)]
pub struct Collaborators {
    pub audio: Option<Box<dyn AudioSink>>,
    pub feedback: Option<Box<dyn FeedbackSink>>,
    pub leaderboard: Option<Box<dyn Leaderboard>>,
}

impl Collaborators {
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_feedback(mut self, feedback: impl FeedbackSink + 'static) -> Self {
        self.feedback = Some(Box::new(feedback));
        self
    }

    pub fn with_leaderboard(mut self, leaderboard: impl Leaderboard + 'static) -> Self {
        self.leaderboard = Some(Box::new(leaderboard));
        self
    }

    pub fn audio(&self, cue: AudioCue) {
        let Some(audio) = &self.audio else {
            return;
        };
        match cue {
            AudioCue::Bounce => audio.play_bounce(),
            AudioCue::NetSwish => audio.play_net_swish(),
            AudioCue::BackboardHit => audio.play_backboard_hit(),
            AudioCue::Score => audio.play_score(),
        }
    }

    pub fn feedback(&self, message: &str, category: FeedbackCategory) {
        if let Some(sink) = &self.feedback {
            sink.show_feedback(message, category);
        }
    }

    pub fn summary(&self, summary: &GameSummary) {
        if let Some(sink) = &self.feedback {
            sink.show_summary(summary);
        }
    }

    pub fn is_high_score(&self, mode_name: &str, score: u32) -> bool {
        self.leaderboard
            .as_ref()
            .is_some_and(|lb| lb.is_high_score(mode_name, score))
    }

    pub fn record_score(&mut self, record: ScoreRecord) {
        if let Some(lb) = &mut self.leaderboard {
            lb.record_score(record);
        }
    }

    pub fn standings(&self, mode_name: &str) -> Option<String> {
        self.leaderboard.as_ref().and_then(|lb| lb.standings(mode_name))
    }
}

/// Sound cue requested by a physics or scoring step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Bounce,
    NetSwish,
    BackboardHit,
    Score,
}

/// Audio sink that only logs cues (used when no audio device is wired up)
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play_bounce(&self) {
        debug!("audio: bounce");
    }
    fn play_net_swish(&self) {
        debug!("audio: net swish");
    }
    fn play_backboard_hit(&self) {
        debug!("audio: backboard hit");
    }
    fn play_score(&self) {
        debug!("audio: score");
    }
}

/// Feedback sink that writes messages to the log
pub struct LogFeedbackSink;

impl FeedbackSink for LogFeedbackSink {
    fn show_feedback(&self, message: &str, category: FeedbackCategory) {
        info!("feedback [{:?}]: {}", category, message);
    }

    fn show_summary(&self, summary: &GameSummary) {
        info!(
            "{} - score {}, {}/{} made ({}%)",
            summary.message, summary.score, summary.made, summary.attempts, summary.accuracy
        );
    }
}
