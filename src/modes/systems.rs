//! Mode systems: menu commands and per-tick lifecycle notifications

use bevy::prelude::*;

use super::{GameModeKind, GameSummary, ModeController};
use crate::ball::LastBallStep;
use crate::collaborators::{Collaborators, ScoreRecord};
use crate::constants::MIN_TICK_DT;
use crate::events::{EventBus, GameEvent};
use crate::gameplay::TickOutcome;
use crate::input::{BallCommands, ModeCommand, ModeCommands};
use crate::scoring::{FeedbackCategory, GameStats};
use crate::settings::CurrentSettings;

/// Fallback leaderboard name when no settings resource is present
const DEFAULT_PLAYER_NAME: &str = "Player";

/// Apply a pending mode command. Starting a game zeroes the stats and forces a ball reset.
pub fn apply_mode_commands(
    mut pending: ResMut<ModeCommands>,
    mut mode: ResMut<ModeController>,
    mut stats: ResMut<GameStats>,
    mut ball_commands: ResMut<BallCommands>,
    mut bus: ResMut<EventBus>,
) {
    let Some(command) = pending.0.take() else {
        return;
    };

    match command {
        ModeCommand::Start(kind) => mode.start(kind),
        ModeCommand::Restart => mode.restart(),
        ModeCommand::ShowSelector => {
            info!("Mode selector opened");
            mode.show_selector();
            return;
        }
    }

    stats.reset();
    ball_commands.forced_reset = true;
    bus.emit(GameEvent::ModeStarted { mode: mode.kind() });
}

/// Feed the tick's throw lifecycle into the mode controller and handle game end
pub fn update_game_mode(
    time: Res<Time>,
    outcome: Res<TickOutcome>,
    last_step: Res<LastBallStep>,
    stats: Res<GameStats>,
    settings: Option<Res<CurrentSettings>>,
    mut mode: ResMut<ModeController>,
    mut collaborators: ResMut<Collaborators>,
    mut ball_commands: ResMut<BallCommands>,
    mut bus: ResMut<EventBus>,
) {
    // Use minimum dt for headless mode compatibility
    let dt = time.delta_secs().max(MIN_TICK_DT);
    let step = last_step.0;

    if outcome.launched {
        mode.on_shot_attempted();
    }
    if outcome.made {
        mode.on_shot_made();
    }

    let stopped = step.settled || step.forced_reset() || (outcome.reset && outcome.reset_in_flight);
    if stopped && let Some(switch) = mode.on_ball_stopped() {
        ball_commands.forced_reset = true;
        collaborators.feedback(
            &format!("Player {}'s Turn", switch.to_player),
            FeedbackCategory::Notice,
        );
        bus.emit(GameEvent::TurnSwitch { to_player: switch.to_player });
    }

    let Some(summary) = mode.update(dt, &stats) else {
        return;
    };

    let player_name = settings
        .as_ref()
        .map(|s| s.settings.player_name.clone())
        .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
    submit_score(&mut collaborators, &summary, player_name);
    if summary.eligible_for_leaderboard()
        && let Some(table) = collaborators.standings(summary.mode.name())
    {
        info!("{}", table);
    }
    collaborators.summary(&summary);
    bus.emit(GameEvent::GameEnded {
        mode: summary.mode,
        won: summary.won,
        score: summary.score,
        attempts: summary.attempts,
        made: summary.made,
    });
}

/// Offer a finished game to the leaderboard
fn submit_score(collaborators: &mut Collaborators, summary: &GameSummary, player_name: String) {
    if !summary.eligible_for_leaderboard() {
        return;
    }
    let record = score_record(summary, player_name);
    if collaborators.is_high_score(&record.mode_name, record.score) {
        collaborators.record_score(record);
    }
}

/// Two-player games record the winner's own tally under their seat name
fn score_record(summary: &GameSummary, player_name: String) -> ScoreRecord {
    let winner = match (summary.mode, summary.players) {
        (GameModeKind::TwoPlayer, Some(players)) if summary.won => players
            .iter()
            .enumerate()
            .max_by_key(|(_, tally)| tally.made)
            .map(|(i, tally)| (format!("Player {}", i + 1), *tally)),
        _ => None,
    };

    match winner {
        Some((name, tally)) => ScoreRecord {
            mode_name: summary.mode.name().to_string(),
            player_name: name,
            score: tally.score,
            attempts: tally.attempts,
            made: tally.made,
            accuracy: tally.accuracy(),
        },
        None => ScoreRecord {
            mode_name: summary.mode.name().to_string(),
            player_name,
            score: summary.score,
            attempts: summary.attempts,
            made: summary.made,
            accuracy: summary.accuracy,
        },
    }
}
