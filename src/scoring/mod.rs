//! Scoring module - shared stats and the shot classification system

use bevy::prelude::*;

use crate::ball::{Ball, BallBody, HoopContact, LastBallStep};
use crate::collaborators::Collaborators;
use crate::court::CourtGeometry;
use crate::events::{EventBus, GameEvent, vec_tuple};
use crate::gameplay::TickOutcome;
use crate::modes::{ModeController, accuracy_percent};

mod feedback;

pub use feedback::*;

/// Cumulative counters shown by the HUD.
/// Attempts are written by the throw system, makes and score by `classify_shot`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub score: u32,
    pub shot_attempts: u32,
    pub shots_made: u32,
}

impl GameStats {
    pub fn record_attempt(&mut self) {
        self.shot_attempts += 1;
    }

    pub fn record_make(&mut self, points: u32) {
        self.shots_made += 1;
        self.score += points;
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.shots_made, self.shot_attempts)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Turn this tick's physics report into makes and feedback
pub fn classify_shot(
    court: Res<CourtGeometry>,
    mode: Res<ModeController>,
    last_step: Res<LastBallStep>,
    collaborators: Res<Collaborators>,
    mut outcome: ResMut<TickOutcome>,
    mut tracker: ResMut<ShotTracker>,
    mut stats: ResMut<GameStats>,
    mut bus: ResMut<EventBus>,
    ball_query: Query<&BallBody, With<Ball>>,
) {
    let step = last_step.0;
    let Ok(body) = ball_query.single() else {
        return;
    };

    let mut verdicts = Vec::new();

    if body.is_airborne() {
        let rim = court.hoop_for(body.position).rim_center();
        tracker.observe_flight(body.position, rim);
    }

    if let Some(contact) = step.contact {
        debug!("Hoop contact: {:?}", contact);
        bus.emit(GameEvent::HoopContact { contact });
        if let HoopContact::Made { side } = contact {
            stats.record_make(mode.rules.points_per_basket);
            outcome.made = true;
            info!("Basket! ({} hoop) score {}", side, stats.score);
            bus.emit(GameEvent::BasketMade { side, score: stats.score });
        }
        verdicts.extend(tracker.on_contact(&contact));
    }

    if step.forced_reset() {
        bus.emit(GameEvent::BallReset { forced: true });
        verdicts.extend(tracker.on_forced_reset());
    } else if step.settled {
        info!("Ball settled at ({:.1}, {:.1})", body.position.x, body.position.z);
        bus.emit(GameEvent::BallSettled { pos: vec_tuple(body.position) });
        verdicts.extend(tracker.on_settle());
    }

    for feedback in verdicts {
        outcome.feedback = Some(feedback);
        collaborators.feedback(feedback.message(), feedback.category());
        bus.emit(GameEvent::Feedback { feedback });
    }
}
