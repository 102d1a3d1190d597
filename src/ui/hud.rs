//! HUD text: stats line, mode status, feedback toast and the selector/game-over overlay

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::collaborators::FeedbackSink;
use crate::constants::*;
use crate::modes::{GameModeKind, GamePhase, GameSummary, ModeController, ModeState};
use crate::scoring::{FeedbackCategory, GameStats};

/// Seconds a feedback message stays on screen
pub const TOAST_SECS: f32 = 2.0;

/// Stats line (score, attempts, accuracy)
#[derive(Component)]
pub struct StatsText;

/// Mode name plus timer, shots left, current player and streak
#[derive(Component)]
pub struct ModeStatusText;

/// Latest feedback message
#[derive(Component)]
pub struct ToastText;

/// Mode selector or end-of-game summary
#[derive(Component)]
pub struct OverlayText;

type Inbox = Arc<Mutex<Vec<(String, FeedbackCategory)>>>;

/// Feedback sink that queues messages for the HUD to pick up
#[derive(Clone, Default)]
pub struct HudFeedbackSink {
    inbox: Inbox,
}

impl HudFeedbackSink {
    /// Resource side of the queue
    pub fn toasts(&self) -> ToastQueue {
        ToastQueue {
            inbox: self.inbox.clone(),
            remaining_secs: 0.0,
        }
    }

    fn push(&self, message: String, category: FeedbackCategory) {
        if let Ok(mut inbox) = self.inbox.lock() {
            inbox.push((message, category));
        }
    }
}

impl FeedbackSink for HudFeedbackSink {
    fn show_feedback(&self, message: &str, category: FeedbackCategory) {
        info!("feedback [{:?}]: {}", category, message);
        self.push(message.to_string(), category);
    }

    fn show_summary(&self, summary: &GameSummary) {
        self.push(summary.message.clone(), FeedbackCategory::Notice);
    }
}

/// Pending feedback plus the visible toast's remaining time
#[derive(Resource)]
pub struct ToastQueue {
    inbox: Inbox,
    remaining_secs: f32,
}

impl ToastQueue {
    /// Most recent queued message, discarding older ones
    fn take_latest(&self) -> Option<(String, FeedbackCategory)> {
        self.inbox.lock().ok().and_then(|mut inbox| {
            let latest = inbox.pop();
            inbox.clear();
            latest
        })
    }
}

pub fn category_color(category: FeedbackCategory) -> Color {
    match category {
        FeedbackCategory::Success => Color::srgb(0.3, 0.9, 0.4),
        FeedbackCategory::Overshot => Color::srgb(0.95, 0.4, 0.3),
        FeedbackCategory::Undershot => Color::srgb(0.4, 0.6, 0.95),
        FeedbackCategory::Near => Color::srgb(0.95, 0.8, 0.3),
        FeedbackCategory::Notice => TEXT_PRIMARY,
    }
}

/// Spawn all HUD text nodes
pub fn spawn_hud(mut commands: Commands) {
    let anchored = |top: f32, left: f32| Node {
        position_type: PositionType::Absolute,
        top: Val::Px(top),
        left: Val::Px(left),
        ..default()
    };

    commands.spawn((
        StatsText,
        Text::new(""),
        TextFont { font_size: 22.0, ..default() },
        TextColor(TEXT_PRIMARY),
        anchored(12.0, 16.0),
    ));
    commands.spawn((
        ModeStatusText,
        Text::new(""),
        TextFont { font_size: 18.0, ..default() },
        TextColor(TEXT_PRIMARY),
        anchored(42.0, 16.0),
    ));
    commands.spawn((
        ToastText,
        Text::new(""),
        TextFont { font_size: 34.0, ..default() },
        TextColor(TEXT_PRIMARY),
        anchored(120.0, 16.0),
    ));
    commands.spawn((
        OverlayText,
        Text::new(""),
        TextFont { font_size: 24.0, ..default() },
        TextColor(TEXT_PRIMARY),
        anchored(200.0, 16.0),
    ));
}

pub fn update_stats_text(stats: Res<GameStats>, mut text_query: Query<&mut Text, With<StatsText>>) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };
    text.0 = format!(
        "Score {}  |  {}/{} made  |  {}%",
        stats.score,
        stats.shots_made,
        stats.shot_attempts,
        stats.accuracy()
    );
}

pub fn update_mode_status_text(
    mode: Res<ModeController>,
    mut text_query: Query<&mut Text, With<ModeStatusText>>,
) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };

    let detail = match mode.state() {
        ModeState::FreeShoot => String::new(),
        ModeState::TimedChallenge { remaining_secs } => format!("  |  {:.0}s left", remaining_secs.ceil()),
        ModeState::ShotLimit { remaining } => format!("  |  {} shots left", remaining),
        ModeState::TwoPlayer(tp) => format!(
            "  |  Player {}'s turn  |  P1 {}  P2 {}",
            tp.current_player,
            tp.player(1).made,
            tp.player(2).made
        ),
    };
    let streak = if mode.streak() > 1 {
        format!("  |  streak {}", mode.streak())
    } else {
        String::new()
    };
    text.0 = format!("{}{}{}", mode.kind(), detail, streak);
}

/// Show the newest feedback message and fade it out
pub fn update_toast_text(
    time: Res<Time>,
    mut toasts: ResMut<ToastQueue>,
    mut text_query: Query<(&mut Text, &mut TextColor), With<ToastText>>,
) {
    let Ok((mut text, mut color)) = text_query.single_mut() else {
        return;
    };

    if let Some((message, category)) = toasts.take_latest() {
        text.0 = message;
        color.0 = category_color(category);
        toasts.remaining_secs = TOAST_SECS;
        return;
    }

    if toasts.remaining_secs > 0.0 {
        toasts.remaining_secs -= time.delta_secs();
        color.0.set_alpha((toasts.remaining_secs / TOAST_SECS).clamp(0.0, 1.0));
        if toasts.remaining_secs <= 0.0 {
            text.0.clear();
        }
    }
}

pub fn update_overlay_text(
    mode: Res<ModeController>,
    mut text_query: Query<&mut Text, With<OverlayText>>,
) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };

    text.0 = match mode.phase() {
        GamePhase::Selecting => selector_lines(),
        GamePhase::Ended => mode.last_summary().map(summary_lines).unwrap_or_default(),
        GamePhase::Active => String::new(),
    };
}

fn selector_lines() -> String {
    let mut lines = String::from("Select a mode\n");
    for (i, kind) in GameModeKind::ALL.iter().enumerate() {
        lines.push_str(&format!("  {}  {}\n", i + 1, kind));
    }
    lines
}

fn summary_lines(summary: &GameSummary) -> String {
    let mut lines = format!(
        "{}\n{} points  |  {}/{} made ({}%)  |  best streak {}\n",
        summary.message, summary.score, summary.made, summary.attempts, summary.accuracy, summary.best_streak
    );
    if let Some(players) = &summary.players {
        for (i, tally) in players.iter().enumerate() {
            lines.push_str(&format!("  Player {}: {} made, {} points\n", i + 1, tally.made, tally.score));
        }
    }
    lines.push_str("Enter: play again   M: modes");
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_keeps_only_latest_toast() {
        let sink = HudFeedbackSink::default();
        let queue = sink.toasts();
        sink.show_feedback("Too weak!", FeedbackCategory::Undershot);
        sink.show_feedback("Nice shot!", FeedbackCategory::Success);
        assert_eq!(
            queue.take_latest(),
            Some(("Nice shot!".to_string(), FeedbackCategory::Success))
        );
        assert!(queue.take_latest().is_none());
    }

    #[test]
    fn test_selector_lists_every_mode() {
        let lines = selector_lines();
        for kind in GameModeKind::ALL {
            assert!(lines.contains(kind.name()));
        }
    }
}
