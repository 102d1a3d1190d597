//! Gameplay plugin - the fixed-tick system chain shared by the game and headless runs
//!
//! Order per tick: mode commands, ball commands, aim, physics, classification,
//! audio, mode bookkeeping, trail, transform sync, event flush. Later systems
//! read what earlier ones wrote through `TickOutcome` and `LastBallStep`; audio
//! is driven off the events already on the bus.

use bevy::prelude::*;

use crate::ball::{
    Ball, BallBody, BallTrail, HoopContact, LastBallStep, step_ball_physics, sync_ball_transform,
};
use crate::collaborators::{AudioCue, Collaborators};
use crate::constants::FIXED_HZ;
use crate::court::CourtGeometry;
use crate::events::{EventBus, GameEvent, flush_events_to_sqlite};
use crate::input::{BallCommands, ControlIntent, ModeCommands};
use crate::modes::{ModeController, ModeRules, apply_mode_commands, update_game_mode};
use crate::scoring::{GameStats, ShotFeedback, ShotTracker, classify_shot};
use crate::shooting::{AimIndicator, AimState, apply_ball_commands, update_aim};
use crate::tuning::PhysicsTweaks;

/// Throw lifecycle facts produced during the current tick
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub launched: bool,
    pub reset: bool,
    /// The reset interrupted a throw in flight
    pub reset_in_flight: bool,
    pub made: bool,
    pub feedback: Option<ShotFeedback>,
}

/// Registers core resources and the FixedUpdate chain.
///
/// `CourtGeometry` must be inserted by the caller (its construction can fail).
/// Existing resources are left untouched, so callers can pre-insert tuned values.
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<EventBus>() {
            app.insert_resource(EventBus::new());
        }
        if !app.world().contains_resource::<ModeController>() {
            let rules = app
                .world()
                .get_resource::<ModeRules>()
                .cloned()
                .unwrap_or_default();
            app.insert_resource(ModeController::new(rules));
        }

        app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .init_resource::<PhysicsTweaks>()
            .init_resource::<Collaborators>()
            .init_resource::<ControlIntent>()
            .init_resource::<BallCommands>()
            .init_resource::<ModeCommands>()
            .init_resource::<AimState>()
            .init_resource::<AimIndicator>()
            .init_resource::<ShotTracker>()
            .init_resource::<GameStats>()
            .init_resource::<TickOutcome>()
            .init_resource::<LastBallStep>()
            .add_systems(Startup, spawn_ball)
            .add_systems(
                FixedUpdate,
                (
                    begin_tick,
                    apply_mode_commands,
                    apply_ball_commands,
                    update_aim,
                    step_ball_physics,
                    classify_shot,
                    report_floor_bounce,
                    play_audio_cues,
                    update_game_mode,
                    update_trail,
                    sync_ball_transform,
                    flush_events_to_sqlite,
                )
                    .chain(),
            );
    }
}

/// Spawn the single ball at center court, at rest
pub fn spawn_ball(mut commands: Commands, court: Res<CourtGeometry>) {
    let body = BallBody::at_rest(crate::constants::BALL_SPAWN, court.ball_radius);
    commands.spawn((
        Ball,
        Transform::from_translation(body.position),
        body,
        BallTrail::default(),
    ));
}

/// Clear per-tick facts and stamp the bus clock
pub fn begin_tick(mut outcome: ResMut<TickOutcome>, mut bus: ResMut<EventBus>, time: Res<Time>) {
    *outcome = TickOutcome::default();
    bus.update_time(time.elapsed_secs());
}

/// Log this tick's floor bounce
pub fn report_floor_bounce(
    last_step: Res<LastBallStep>,
    mut bus: ResMut<EventBus>,
    ball_query: Query<&BallBody, With<Ball>>,
) {
    if !last_step.0.floor_bounce {
        return;
    }
    if let Ok(body) = ball_query.single() {
        bus.emit(GameEvent::FloorBounce { bounces: body.bounces });
    }
}

/// Play the cues for everything emitted so far this tick
pub fn play_audio_cues(bus: Res<EventBus>, collaborators: Res<Collaborators>) {
    for emitted in bus.peek() {
        for cue in event_cues(&emitted.event) {
            collaborators.audio(*cue);
        }
    }
}

/// Audio for one event; a make plays the swish and the score sting
pub fn event_cues(event: &GameEvent) -> &'static [AudioCue] {
    match event {
        GameEvent::BasketMade { .. } => &[AudioCue::NetSwish, AudioCue::Score],
        GameEvent::FloorBounce { .. } | GameEvent::BallReset { .. } => &[AudioCue::Bounce],
        GameEvent::HoopContact { contact } => match contact {
            HoopContact::RimDeflect { .. } => &[AudioCue::Bounce],
            HoopContact::Backboard { .. } | HoopContact::Structure { .. } => &[AudioCue::BackboardHit],
            HoopContact::Made { .. } | HoopContact::RimGraze { .. } => &[],
        },
        _ => &[],
    }
}

/// Record flight positions; stop the trail once the ball rolls or rests
pub fn update_trail(
    last_step: Res<LastBallStep>,
    mut query: Query<(&BallBody, &mut BallTrail), With<Ball>>,
) {
    let step = last_step.0;
    for (body, mut trail) in &mut query {
        if step.rolling || step.settled || !body.is_airborne() {
            trail.stop();
            continue;
        }
        trail.record(body.position);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::collaborators::AudioSink;
    use crate::court::HoopSide;

    #[derive(Clone, Default)]
    struct RecordingAudio(Arc<Mutex<Vec<AudioCue>>>);

    impl RecordingAudio {
        fn played(&self) -> Vec<AudioCue> {
            self.0.lock().unwrap().clone()
        }
    }

    impl AudioSink for RecordingAudio {
        fn play_bounce(&self) {
            self.0.lock().unwrap().push(AudioCue::Bounce);
        }
        fn play_net_swish(&self) {
            self.0.lock().unwrap().push(AudioCue::NetSwish);
        }
        fn play_backboard_hit(&self) {
            self.0.lock().unwrap().push(AudioCue::BackboardHit);
        }
        fn play_score(&self) {
            self.0.lock().unwrap().push(AudioCue::Score);
        }
    }

    #[test]
    fn test_event_cues() {
        let made = GameEvent::BasketMade { side: HoopSide::Right, score: 2 };
        assert_eq!(event_cues(&made), &[AudioCue::NetSwish, AudioCue::Score]);

        let board = GameEvent::HoopContact { contact: HoopContact::Backboard { side: HoopSide::Left } };
        assert_eq!(event_cues(&board), &[AudioCue::BackboardHit]);

        // The make is voiced by BasketMade, not by the contact itself
        let through = GameEvent::HoopContact { contact: HoopContact::Made { side: HoopSide::Left } };
        assert!(event_cues(&through).is_empty());
        assert!(event_cues(&GameEvent::TurnSwitch { to_player: 2 }).is_empty());
    }

    #[test]
    fn test_cues_follow_the_bus() {
        let log = RecordingAudio::default();
        let mut app = App::new();
        app.insert_resource(Collaborators::default().with_audio(log.clone()));
        app.insert_resource(EventBus::new());
        app.add_systems(Update, play_audio_cues);
        {
            let mut bus = app.world_mut().resource_mut::<EventBus>();
            bus.emit(GameEvent::FloorBounce { bounces: 1 });
            bus.emit(GameEvent::BasketMade { side: HoopSide::Right, score: 2 });
        }
        app.update();
        assert_eq!(log.played(), vec![AudioCue::Bounce, AudioCue::NetSwish, AudioCue::Score]);
    }
}
