//! Per-tick event queue
//!
//! Systems in the fixed chain `emit` as things happen. Later systems in the
//! same tick read the queue with `peek` (audio cues), and the final system
//! moves it out with `export_events` for the SQLite log. A bus built with
//! `with_history` keeps exported events so headless runs can read them back.

use bevy::prelude::*;

use super::types::GameEvent;

/// Event stamped with the game clock
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Milliseconds since startup
    pub time_ms: u32,
    pub event: GameEvent,
}

#[derive(Resource, Debug, Default)]
pub struct EventBus {
    /// Emitted this tick, not yet exported
    pending: Vec<BusEvent>,
    /// Exported events, kept only with history on
    processed: Vec<BusEvent>,
    now_ms: u32,
    keep_history: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus that retains every exported event
    pub fn with_history() -> Self {
        Self {
            keep_history: true,
            ..Self::default()
        }
    }

    /// Stamp subsequent events with this clock reading
    pub fn update_time(&mut self, elapsed_secs: f32) {
        if elapsed_secs.is_finite() && elapsed_secs >= 0.0 {
            self.now_ms = (elapsed_secs * 1000.0) as u32;
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.pending.push(BusEvent {
            time_ms: self.now_ms,
            event,
        });
    }

    /// Events emitted so far this tick
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    pub fn processed(&self) -> &[BusEvent] {
        &self.processed
    }

    /// Take this tick's events as (time_ms, event) pairs, in emission order
    pub fn export_events(&mut self) -> Vec<(u32, GameEvent)> {
        let events = std::mem::take(&mut self.pending);
        if self.keep_history {
            self.processed.extend(events.iter().cloned());
        }
        events.into_iter().map(|e| (e.time_ms, e.event)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::GameModeKind;

    #[test]
    fn test_peek_then_export() {
        let mut bus = EventBus::new();
        bus.update_time(1.5);
        bus.emit(GameEvent::ModeStarted { mode: GameModeKind::ShotLimit });
        bus.emit(GameEvent::TurnSwitch { to_player: 2 });

        assert_eq!(bus.peek().len(), 2);
        assert_eq!(bus.peek()[0].time_ms, 1500);

        let events = bus.export_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1.name(), "ModeStarted");
        assert_eq!(events[1].1, GameEvent::TurnSwitch { to_player: 2 });
        assert!(bus.peek().is_empty());
        assert!(bus.processed().is_empty());
    }

    #[test]
    fn test_history_survives_export() {
        let mut bus = EventBus::with_history();
        bus.emit(GameEvent::FloorBounce { bounces: 1 });
        bus.export_events();
        bus.emit(GameEvent::BallReset { forced: false });
        bus.export_events();

        let names: Vec<_> = bus.processed().iter().map(|e| e.event.name()).collect();
        assert_eq!(names, ["FloorBounce", "BallReset"]);
    }

    #[test]
    fn test_bad_clock_keeps_last_stamp() {
        let mut bus = EventBus::new();
        bus.update_time(2.0);
        bus.update_time(f32::NAN);
        bus.emit(GameEvent::FloorBounce { bounces: 1 });
        assert_eq!(bus.peek()[0].time_ms, 2000);
    }
}
