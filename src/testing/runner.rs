//! Test execution engine

use bevy::prelude::*;

use crate::ball::{Ball, BallBody, BallTrail};
use crate::court::CourtGeometry;
use crate::events::EventBus;
use crate::input::{BallCommands, ControlIntent, ModeCommands};
use crate::modes::{GameModeKind, ModeController, ModeState};
use crate::scoring::{GameStats, ShotTracker};
use crate::shooting::AimState;
use crate::simulation::{HeadlessAppBuilder, court_spot, step_fixed};

use super::assertions::{
    AssertionError, CapturedEvent, WorldState, check_absent, check_sequence, check_state,
};
use super::input::{FrameActions, ScriptedInputs};
use super::parser::{TestDefinition, TestSetup};

/// Frames run when nothing in the test asks for more
const DEFAULT_FRAMES: u64 = 60;

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

/// Run a single test and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let mut scripted = match ScriptedInputs::from_inputs(&test.input) {
        Ok(scripted) => scripted,
        Err(message) => return TestResult::Error { message },
    };

    let mut builder = HeadlessAppBuilder::new().with_minimal_threads().with_event_history();
    if let Some(rules) = &test.setup.rules {
        builder = builder.with_rules(rules.clone());
    }
    let mut app = match builder.build() {
        Ok(app) => app,
        Err(e) => return TestResult::Error { message: format!("Court setup failed: {}", e) },
    };

    if let Err(message) = apply_setup(&mut app, &test.setup) {
        return TestResult::Error { message };
    }

    // Run through the last frame anything refers to
    let last_state_frame = test.expect.state.iter().map(|s| s.after_frame).max().unwrap_or(0);
    let mut last_frame = scripted.max_frame.max(last_state_frame);
    if test.input.is_empty() && test.expect.state.is_empty() {
        last_frame = test.setup.frames.unwrap_or(DEFAULT_FRAMES);
    } else if let Some(frames) = test.setup.frames {
        last_frame = last_frame.max(frames);
    }

    let mut captured: Vec<CapturedEvent> = Vec::new();
    let mut seen = 0usize;

    for frame in 0..=last_frame {
        let actions = scripted.advance_frame();
        inject_actions(&mut app, actions);
        step_fixed(&mut app);

        {
            let bus = app.world().resource::<EventBus>();
            let processed = bus.processed();
            captured.extend(
                processed[seen.min(processed.len())..]
                    .iter()
                    .map(|e| CapturedEvent::from_game_event(frame, &e.event)),
            );
            seen = processed.len();
        }

        let due: Vec<_> = test.expect.state.iter().filter(|s| s.after_frame == frame).collect();
        if !due.is_empty() {
            let state = extract_world_state(&mut app);
            for assertion in due {
                if let Err(error) = check_state(assertion, &state) {
                    return TestResult::Fail { error };
                }
            }
        }
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }
    if let Err(error) = check_absent(&test.expect.absent, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass { frames: last_frame + 1 }
}

/// Start the requested mode, then place the ball and set the pitch
fn apply_setup(app: &mut App, setup: &TestSetup) -> Result<(), String> {
    let world = app.world_mut();

    if let Some(name) = &setup.mode {
        let kind = GameModeKind::from_name(name).ok_or_else(|| format!("Unknown mode '{}'", name))?;
        world.resource_mut::<ModeController>().start(kind);
        world.resource_mut::<GameStats>().reset();
    }

    if let Some([x, z]) = setup.ball {
        let court = world.resource::<CourtGeometry>().clone();
        let spot = court.bounds.clamp_inner(court_spot(&court, x, z), court.ball_radius);
        let mut query = world.query_filtered::<&mut BallBody, With<Ball>>();
        let mut body = query.single_mut(world).map_err(|e| format!("No ball: {}", e))?;
        body.position = spot;
        body.velocity = Vec3::ZERO;
    }

    if let Some(pitch) = setup.pitch {
        world.resource_mut::<AimState>().set_pitch(pitch);
    }
    Ok(())
}

/// Write this frame's scripted inputs where the capture stage would
fn inject_actions(app: &mut App, actions: FrameActions) {
    let world = app.world_mut();
    *world.resource_mut::<ControlIntent>() = actions.intent;
    {
        let mut commands = world.resource_mut::<BallCommands>();
        commands.launch |= actions.commands.launch;
        commands.reset |= actions.commands.reset;
    }
    if let Some(command) = actions.mode_command {
        world.resource_mut::<ModeCommands>().0 = Some(command);
    }
    if let Some(pitch) = actions.pitch {
        world.resource_mut::<AimState>().set_pitch(pitch);
    }
}

/// Snapshot everything checks can refer to
fn extract_world_state(app: &mut App) -> WorldState {
    let mut state = WorldState::default();
    let world = app.world_mut();

    let mut query = world.query_filtered::<(&BallBody, &BallTrail), With<Ball>>();
    if let Ok((body, trail)) = query.single(world) {
        state.set("ball.x", body.position.x);
        state.set("ball.y", body.position.y);
        state.set("ball.z", body.position.z);
        state.set("ball.speed", body.velocity.length());
        state.set("ball.mode", format!("{:?}", body.mode));
        state.set("ball.airborne", body.is_airborne());
        state.set("ball.bounces", body.bounces);
        state.set("trail.len", trail.points.len() as u32);
        state.set("trail.active", trail.active);
    }

    let stats = world.resource::<GameStats>();
    state.set("stats.score", stats.score);
    state.set("stats.attempts", stats.shot_attempts);
    state.set("stats.made", stats.shots_made);
    state.set("stats.accuracy", stats.accuracy());

    let mode = world.resource::<ModeController>();
    state.set("mode.kind", format!("{:?}", mode.kind()));
    state.set("mode.phase", format!("{:?}", mode.phase()));
    state.set("mode.streak", mode.streak());
    state.set("mode.best_streak", mode.best_streak());
    if let Some(remaining) = mode.shots_remaining() {
        state.set("mode.shots_remaining", remaining);
    }
    if let Some(remaining) = mode.time_remaining() {
        state.set("mode.time_remaining", remaining);
    }
    if let ModeState::TwoPlayer(two) = mode.state() {
        state.set("player.current", u32::from(two.current_player));
        for id in 1..=2u8 {
            let tally = two.player(id);
            state.set(&format!("player{}.score", id), tally.score);
            state.set(&format!("player{}.attempts", id), tally.attempts);
            state.set(&format!("player{}.made", id), tally.made);
        }
    }
    if let Some(summary) = mode.last_summary() {
        state.set("summary.won", summary.won);
        state.set("summary.score", summary.score);
    }

    let feedback = world.resource::<ShotTracker>().feedback;
    state.set(
        "feedback",
        feedback.map(|f| format!("{:?}", f)).unwrap_or_else(|| "None".to_string()),
    );
    state.set("aim.pitch", world.resource::<AimState>().pitch);

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> TestDefinition {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_flat_throw_scenario_passes() {
        let test = parse(
            r#"
name = "flat"
[[input]]
frame = 0
launch = true

[[expect.sequence]]
event = "ShotLaunched"

[[expect.state]]
after_frame = 0
checks = ["stats.attempts = 1", "ball.mode = Airborne"]
"#,
        );
        match run_test(&test) {
            TestResult::Pass { frames } => assert_eq!(frames, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_failed_check_reports_fail() {
        let test = parse(
            r#"
name = "wrong"
[[expect.state]]
after_frame = 2
checks = ["stats.score = 5"]
"#,
        );
        assert!(matches!(run_test(&test), TestResult::Fail { .. }));
    }

    #[test]
    fn test_unknown_mode_is_error() {
        let test = parse(
            r#"
name = "bad mode"
[setup]
mode = "dodgeball"
"#,
        );
        assert!(matches!(run_test(&test), TestResult::Error { .. }));
    }
}
