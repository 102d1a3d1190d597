//! Game modes - free play, timed, shot-limit and two-player turn rules
//!
//! `ModeController` owns the mode state machine. It observes throw lifecycle
//! notifications (attempted, made, stopped) and the shared `GameStats`, and
//! decides when a game ends. It never touches the ball directly; turn resets
//! are returned to the caller as requests.

use bevy::prelude::*;
use std::fmt;

use crate::constants::*;
use crate::scoring::GameStats;

mod systems;

pub use systems::*;

/// Selectable modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum GameModeKind {
    #[default]
    FreeShoot,
    TimedChallenge,
    ShotLimit,
    TwoPlayer,
}

impl GameModeKind {
    pub const ALL: [GameModeKind; 4] = [
        GameModeKind::FreeShoot,
        GameModeKind::TimedChallenge,
        GameModeKind::ShotLimit,
        GameModeKind::TwoPlayer,
    ];

    /// Display name, also the leaderboard key
    pub fn name(self) -> &'static str {
        match self {
            GameModeKind::FreeShoot => "Free Shoot",
            GameModeKind::TimedChallenge => "Timed Challenge",
            GameModeKind::ShotLimit => "Shot Limit",
            GameModeKind::TwoPlayer => "2 Player Mode",
        }
    }

    /// Accepts display names as well as snake/kebab-case identifiers
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.to_ascii_lowercase().replace(['_', '-', ' '], "");
        Self::ALL.into_iter().find(|kind| {
            let display = kind.name().to_ascii_lowercase().replace(' ', "");
            let ident = format!("{:?}", kind).to_ascii_lowercase();
            key == display || key == ident
        })
    }
}

impl fmt::Display for GameModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mode parameters
#[derive(Resource, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModeRules {
    pub timed_duration_secs: f32,
    /// Makes needed to win the timed challenge; `None` means time-out is always a loss
    pub timed_target_made: Option<u32>,
    pub shot_limit: u32,
    pub shot_limit_target: u32,
    pub two_player_target: u32,
    pub points_per_basket: u32,
}

impl Default for ModeRules {
    fn default() -> Self {
        Self {
            timed_duration_secs: TIMED_CHALLENGE_SECS,
            timed_target_made: None,
            shot_limit: SHOT_LIMIT_ATTEMPTS,
            shot_limit_target: SHOT_LIMIT_TARGET,
            two_player_target: TWO_PLAYER_TARGET,
            points_per_basket: POINTS_PER_BASKET,
        }
    }
}

/// One player's record in two-player mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTally {
    pub score: u32,
    pub attempts: u32,
    pub made: u32,
}

impl PlayerTally {
    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.made, self.attempts)
    }
}

/// Turn state for two-player mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoPlayerState {
    /// 1 or 2
    pub current_player: u8,
    /// A throw is in the air; switch turns when it stops
    pub waiting_for_turn: bool,
    pub players: [PlayerTally; 2],
}

impl Default for TwoPlayerState {
    fn default() -> Self {
        Self {
            current_player: 1,
            waiting_for_turn: false,
            players: [PlayerTally::default(); 2],
        }
    }
}

impl TwoPlayerState {
    pub fn current_mut(&mut self) -> &mut PlayerTally {
        &mut self.players[usize::from(self.current_player - 1)]
    }

    pub fn player(&self, id: u8) -> &PlayerTally {
        &self.players[usize::from(id.clamp(1, 2) - 1)]
    }

    fn switch_turn(&mut self) -> u8 {
        self.current_player = if self.current_player == 1 { 2 } else { 1 };
        self.waiting_for_turn = false;
        self.current_player
    }
}

/// Mode-specific state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeState {
    FreeShoot,
    TimedChallenge { remaining_secs: f32 },
    ShotLimit { remaining: u32 },
    TwoPlayer(TwoPlayerState),
}

impl ModeState {
    pub fn fresh(kind: GameModeKind, rules: &ModeRules) -> Self {
        match kind {
            GameModeKind::FreeShoot => ModeState::FreeShoot,
            GameModeKind::TimedChallenge => ModeState::TimedChallenge {
                remaining_secs: rules.timed_duration_secs,
            },
            GameModeKind::ShotLimit => ModeState::ShotLimit { remaining: rules.shot_limit },
            GameModeKind::TwoPlayer => ModeState::TwoPlayer(TwoPlayerState::default()),
        }
    }

    pub fn kind(&self) -> GameModeKind {
        match self {
            ModeState::FreeShoot => GameModeKind::FreeShoot,
            ModeState::TimedChallenge { .. } => GameModeKind::TimedChallenge,
            ModeState::ShotLimit { .. } => GameModeKind::ShotLimit,
            ModeState::TwoPlayer(_) => GameModeKind::TwoPlayer,
        }
    }
}

/// Lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Mode selector open, no game running
    #[default]
    Selecting,
    Active,
    Ended,
}

/// End-of-game report
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub mode: GameModeKind,
    pub won: bool,
    pub message: String,
    pub score: u32,
    pub attempts: u32,
    pub made: u32,
    pub accuracy: u32,
    pub best_streak: u32,
    /// Final tallies in two-player mode
    pub players: Option<[PlayerTally; 2]>,
}

impl GameSummary {
    /// Whether the leaderboard should be consulted for this game
    pub fn eligible_for_leaderboard(&self) -> bool {
        self.won || matches!(self.mode, GameModeKind::TimedChallenge | GameModeKind::ShotLimit)
    }
}

/// Rounded percentage, zero when nothing was attempted
pub fn accuracy_percent(made: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    ((made as f32 / attempts as f32) * 100.0).round() as u32
}

/// Turn change requested after a throw stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSwitch {
    pub to_player: u8,
}

/// Mode state machine
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ModeController {
    pub rules: ModeRules,
    state: ModeState,
    phase: GamePhase,
    elapsed_secs: f32,
    streak: u32,
    best_streak: u32,
    throw_in_flight: bool,
    made_this_throw: bool,
    last_summary: Option<GameSummary>,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(ModeRules::default())
    }
}

impl ModeController {
    /// Starts in free play
    pub fn new(rules: ModeRules) -> Self {
        let mut controller = Self {
            state: ModeState::FreeShoot,
            rules,
            phase: GamePhase::Active,
            elapsed_secs: 0.0,
            streak: 0,
            best_streak: 0,
            throw_in_flight: false,
            made_this_throw: false,
            last_summary: None,
        };
        controller.start(GameModeKind::FreeShoot);
        controller
    }

    pub fn kind(&self) -> GameModeKind {
        self.state.kind()
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn last_summary(&self) -> Option<&GameSummary> {
        self.last_summary.as_ref()
    }

    pub fn two_player(&self) -> Option<&TwoPlayerState> {
        match &self.state {
            ModeState::TwoPlayer(tp) => Some(tp),
            _ => None,
        }
    }

    /// Select a mode and start a fresh game in it
    pub fn start(&mut self, kind: GameModeKind) {
        self.state = ModeState::fresh(kind, &self.rules);
        self.phase = GamePhase::Active;
        self.elapsed_secs = 0.0;
        self.streak = 0;
        self.best_streak = 0;
        self.throw_in_flight = false;
        self.made_this_throw = false;
        self.last_summary = None;
        info!("Mode started: {}", kind);
    }

    pub fn restart(&mut self) {
        self.start(self.kind());
    }

    /// Open the selector; the running game is abandoned
    pub fn show_selector(&mut self) {
        self.phase = GamePhase::Selecting;
        self.throw_in_flight = false;
    }

    /// Move, pitch and launch are allowed
    pub fn accepts_play_input(&self) -> bool {
        self.kind() == GameModeKind::FreeShoot || self.is_active()
    }

    /// Manual ball reset is allowed (never mid two-player game)
    pub fn allows_manual_reset(&self) -> bool {
        !(self.kind() == GameModeKind::TwoPlayer && self.is_active())
    }

    pub fn on_shot_attempted(&mut self) {
        if !self.is_active() {
            return;
        }
        self.throw_in_flight = true;
        self.made_this_throw = false;
        if let ModeState::TwoPlayer(tp) = &mut self.state {
            tp.current_mut().attempts += 1;
            tp.waiting_for_turn = true;
        }
    }

    pub fn on_shot_made(&mut self) {
        if !self.is_active() {
            return;
        }
        self.made_this_throw = true;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
        let points = self.rules.points_per_basket;
        if let ModeState::TwoPlayer(tp) = &mut self.state {
            let tally = tp.current_mut();
            tally.made += 1;
            tally.score += points;
        }
    }

    /// The ball settled (or was reset). Returns a turn switch in two-player mode.
    pub fn on_ball_stopped(&mut self) -> Option<TurnSwitch> {
        let was_in_flight = std::mem::take(&mut self.throw_in_flight);
        if was_in_flight && !self.made_this_throw {
            self.streak = 0;
        }
        self.made_this_throw = false;
        if !self.is_active() {
            return None;
        }
        match &mut self.state {
            ModeState::TwoPlayer(tp) if tp.waiting_for_turn => {
                let to_player = tp.switch_turn();
                info!("Turn switch: Player {}", to_player);
                Some(TurnSwitch { to_player })
            }
            _ => None,
        }
    }

    /// Advance timers and check win conditions
    pub fn update(&mut self, dt: f32, stats: &GameStats) -> Option<GameSummary> {
        if !self.is_active() || !dt.is_finite() {
            return None;
        }
        self.elapsed_secs += dt.max(0.0);

        let outcome = match &mut self.state {
            ModeState::FreeShoot => None,
            ModeState::TimedChallenge { remaining_secs } => {
                *remaining_secs = (*remaining_secs - dt.max(0.0)).max(0.0);
                if *remaining_secs <= 0.0 {
                    let won = self
                        .rules
                        .timed_target_made
                        .is_some_and(|target| stats.shots_made >= target);
                    Some((won, None))
                } else {
                    None
                }
            }
            ModeState::ShotLimit { remaining } => {
                *remaining = self.rules.shot_limit.saturating_sub(stats.shot_attempts);
                // The final throw still counts if it drops, so wait for it to settle
                if *remaining == 0 && !self.throw_in_flight {
                    Some((stats.shots_made >= self.rules.shot_limit_target, None))
                } else {
                    None
                }
            }
            ModeState::TwoPlayer(tp) => {
                let target = self.rules.two_player_target;
                [1u8, 2]
                    .into_iter()
                    .find(|&id| tp.player(id).made >= target)
                    .map(|id| (true, Some(format!("Player {} Wins!", id))))
            }
        };

        let (won, message) = outcome?;
        Some(self.end_game(won, message, stats))
    }

    fn end_game(&mut self, won: bool, message: Option<String>, stats: &GameStats) -> GameSummary {
        self.phase = GamePhase::Ended;
        self.throw_in_flight = false;
        let players = self.two_player().map(|tp| tp.players);
        let summary = GameSummary {
            mode: self.kind(),
            won,
            message: message
                .unwrap_or_else(|| (if won { "VICTORY!" } else { "GAME OVER" }).to_string()),
            score: stats.score,
            attempts: stats.shot_attempts,
            made: stats.shots_made,
            accuracy: accuracy_percent(stats.shots_made, stats.shot_attempts),
            best_streak: self.best_streak,
            players,
        };
        info!(
            "Game ended ({}): {} - {}/{} made, score {}",
            summary.mode, summary.message, summary.made, summary.attempts, summary.score
        );
        self.last_summary = Some(summary.clone());
        summary
    }

    /// Shots left in shot-limit mode
    pub fn shots_remaining(&self) -> Option<u32> {
        match self.state {
            ModeState::ShotLimit { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Seconds left in the timed challenge
    pub fn time_remaining(&self) -> Option<f32> {
        match self.state {
            ModeState::TimedChallenge { remaining_secs } => Some(remaining_secs),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive one full throw through the controller and stats
    fn throw(mode: &mut ModeController, stats: &mut GameStats, made: bool) -> Option<TurnSwitch> {
        stats.shot_attempts += 1;
        mode.on_shot_attempted();
        if made {
            stats.shots_made += 1;
            stats.score += POINTS_PER_BASKET;
            mode.on_shot_made();
        }
        mode.on_ball_stopped()
    }

    #[test]
    fn test_free_shoot_never_ends() {
        let mut mode = ModeController::default();
        let mut stats = GameStats::default();
        for _ in 0..50 {
            throw(&mut mode, &mut stats, true);
            assert!(mode.update(100.0, &stats).is_none());
        }
        assert!(mode.accepts_play_input());
        assert!(mode.allows_manual_reset());
        assert_eq!(mode.best_streak(), 50);
    }

    #[test]
    fn test_shot_limit_nine_made_loses() {
        let mut mode = ModeController::default();
        mode.start(GameModeKind::ShotLimit);
        let mut stats = GameStats::default();
        for i in 0..SHOT_LIMIT_ATTEMPTS {
            throw(&mut mode, &mut stats, i < 9);
            let summary = mode.update(1.0 / 60.0, &stats);
            if i + 1 < SHOT_LIMIT_ATTEMPTS {
                assert!(summary.is_none());
            } else {
                let summary = summary.unwrap();
                assert!(!summary.won);
                assert_eq!(summary.made, 9);
                assert_eq!(summary.accuracy, 60);
            }
        }
        assert_eq!(mode.phase(), GamePhase::Ended);
        assert!(!mode.accepts_play_input());
    }

    #[test]
    fn test_shot_limit_ten_made_wins() {
        let mut mode = ModeController::default();
        mode.start(GameModeKind::ShotLimit);
        let mut stats = GameStats::default();
        let mut summary = None;
        for i in 0..SHOT_LIMIT_ATTEMPTS {
            throw(&mut mode, &mut stats, i < 10);
            summary = mode.update(1.0 / 60.0, &stats).or(summary);
        }
        let summary = summary.unwrap();
        assert!(summary.won);
        assert!(summary.eligible_for_leaderboard());
    }

    #[test]
    fn test_shot_limit_waits_for_last_throw() {
        let mut mode = ModeController::default();
        mode.start(GameModeKind::ShotLimit);
        let mut stats = GameStats { shot_attempts: SHOT_LIMIT_ATTEMPTS - 1, ..default() };
        stats.shot_attempts += 1;
        mode.on_shot_attempted();
        assert!(mode.update(1.0 / 60.0, &stats).is_none());
        assert_eq!(mode.shots_remaining(), Some(0));
        mode.on_ball_stopped();
        assert!(mode.update(1.0 / 60.0, &stats).is_some());
    }

    #[test]
    fn test_timed_challenge_expires_as_loss() {
        let mut mode = ModeController::default();
        mode.start(GameModeKind::TimedChallenge);
        let stats = GameStats { score: 40, shot_attempts: 25, shots_made: 20 };
        assert!(mode.update(59.0, &stats).is_none());
        assert!((mode.time_remaining().unwrap() - 1.0).abs() < 1e-4);
        let summary = mode.update(1.5, &stats).unwrap();
        assert!(!summary.won);
        assert_eq!(summary.message, "GAME OVER");
        assert!(summary.eligible_for_leaderboard());
        assert_eq!(mode.time_remaining(), Some(0.0));
    }

    #[test]
    fn test_timed_challenge_with_target() {
        let rules = ModeRules { timed_target_made: Some(5), ..default() };
        let mut mode = ModeController::new(rules);
        mode.start(GameModeKind::TimedChallenge);
        let stats = GameStats { score: 10, shot_attempts: 8, shots_made: 5 };
        let summary = mode.update(61.0, &stats).unwrap();
        assert!(summary.won);
    }

    #[test]
    fn test_two_player_switches_only_after_stop() {
        let mut mode = ModeController::default();
        mode.start(GameModeKind::TwoPlayer);
        assert!(!mode.allows_manual_reset());
        let mut stats = GameStats::default();

        stats.shot_attempts += 1;
        mode.on_shot_attempted();
        stats.shots_made += 1;
        stats.score += POINTS_PER_BASKET;
        mode.on_shot_made();

        let tp = mode.two_player().unwrap();
        assert_eq!(tp.player(1).made, 1);
        assert_eq!(tp.player(1).score, POINTS_PER_BASKET);
        assert_eq!(tp.current_player, 1);
        assert!(tp.waiting_for_turn);
        assert!(mode.update(1.0 / 60.0, &stats).is_none());

        assert_eq!(mode.on_ball_stopped(), Some(TurnSwitch { to_player: 2 }));
        let tp = mode.two_player().unwrap();
        assert_eq!(tp.current_player, 2);
        assert!(!tp.waiting_for_turn);

        // Settling again without a throw does not switch back
        assert_eq!(mode.on_ball_stopped(), None);
    }

    #[test]
    fn test_two_player_win_message() {
        let mut mode = ModeController::default();
        mode.start(GameModeKind::TwoPlayer);
        let mut stats = GameStats::default();
        let mut summary = None;
        // Player 1 makes every shot, player 2 misses every shot
        for turn in 0..(TWO_PLAYER_TARGET * 2) {
            let made = turn % 2 == 0;
            stats.shot_attempts += 1;
            mode.on_shot_attempted();
            if made {
                stats.shots_made += 1;
                mode.on_shot_made();
            }
            if let Some(s) = mode.update(1.0 / 60.0, &stats) {
                summary = Some(s);
                break;
            }
            mode.on_ball_stopped();
        }
        let summary = summary.unwrap();
        assert!(summary.won);
        assert_eq!(summary.message, "Player 1 Wins!");
        let players = summary.players.unwrap();
        assert_eq!(players[0].made, TWO_PLAYER_TARGET);
        assert_eq!(players[1].made, 0);
    }

    #[test]
    fn test_selector_gates_input() {
        let mut mode = ModeController::default();
        mode.start(GameModeKind::TimedChallenge);
        mode.show_selector();
        assert!(!mode.accepts_play_input());
        assert!(mode.allows_manual_reset());
        assert!(mode.update(100.0, &GameStats::default()).is_none());
        mode.restart();
        assert!(mode.is_active());
        assert_eq!(mode.time_remaining(), Some(TIMED_CHALLENGE_SECS));
    }

    #[test]
    fn test_streak_resets_on_miss() {
        let mut mode = ModeController::default();
        let mut stats = GameStats::default();
        throw(&mut mode, &mut stats, true);
        throw(&mut mode, &mut stats, true);
        assert_eq!(mode.streak(), 2);
        throw(&mut mode, &mut stats, false);
        assert_eq!(mode.streak(), 0);
        assert_eq!(mode.best_streak(), 2);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(GameModeKind::from_name("timed_challenge"), Some(GameModeKind::TimedChallenge));
        assert_eq!(GameModeKind::from_name("2 Player Mode"), Some(GameModeKind::TwoPlayer));
        assert_eq!(GameModeKind::from_name("shot-limit"), Some(GameModeKind::ShotLimit));
        assert_eq!(GameModeKind::from_name("bogus"), None);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(0, 0), 0);
    }
}
