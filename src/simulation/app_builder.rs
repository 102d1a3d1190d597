//! Headless App Builder
//!
//! Builds a windowless Bevy app running the full gameplay chain. Used by the
//! scenario runner and integration tests. Ticks are driven explicitly with
//! [`step_fixed`] so runs are deterministic.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::collaborators::Collaborators;
use crate::constants::FIXED_HZ;
use crate::court::{CourtGeometry, GeometryError};
use crate::events::{EventBus, SqliteEventLogger};
use crate::gameplay::GameplayPlugin;
use crate::modes::{ModeController, ModeRules};
use crate::tuning::{self, PhysicsTweaks};

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    tweaks: Option<PhysicsTweaks>,
    rules: ModeRules,
    collaborators: Option<Collaborators>,
    event_logger: Option<SqliteEventLogger>,
    keep_event_history: bool,
    global_tuning: bool,
    minimal_threads: bool,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    pub fn new() -> Self {
        Self {
            tweaks: None,
            rules: ModeRules::default(),
            collaborators: None,
            event_logger: None,
            keep_event_history: false,
            global_tuning: false,
            minimal_threads: false,
        }
    }

    /// Use these physics values instead of the defaults
    pub fn with_tweaks(mut self, tweaks: PhysicsTweaks) -> Self {
        self.tweaks = Some(tweaks);
        self
    }

    pub fn with_rules(mut self, rules: ModeRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = Some(collaborators);
        self
    }

    pub fn with_event_logger(mut self, logger: SqliteEventLogger) -> Self {
        self.event_logger = Some(logger);
        self
    }

    /// Keep flushed events on the bus so callers can read them back
    pub fn with_event_history(mut self) -> Self {
        self.keep_event_history = true;
        self
    }

    /// Layer `config/gameplay_tuning.json` over the tweaks
    pub fn with_global_tuning(mut self) -> Self {
        self.global_tuning = true;
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps in parallel to avoid hitting OS thread limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Build the app and run its Startup schedule. The ball is spawned on return.
    pub fn build(self) -> Result<App, GeometryError> {
        let court = CourtGeometry::standard()?;
        let mut app = App::new();

        let runner = ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / FIXED_HZ));
        if self.minimal_threads {
            app.add_plugins(MinimalPlugins.set(runner).set(TaskPoolPlugin {
                task_pool_options: TaskPoolOptions::with_num_threads(1),
            }));
        } else {
            app.add_plugins(MinimalPlugins.set(runner));
        }

        let mut tweaks = self.tweaks.unwrap_or_default();
        if self.global_tuning
            && let Err(e) = tuning::apply_global_tuning(&mut tweaks)
        {
            warn!("{}", e);
        }

        app.insert_resource(court)
            .insert_resource(tweaks)
            .insert_resource(ModeController::new(self.rules.clone()))
            .insert_resource(self.rules)
            .insert_resource(self.collaborators.unwrap_or_default())
            .insert_resource(if self.keep_event_history {
                EventBus::with_history()
            } else {
                EventBus::new()
            });
        if let Some(logger) = self.event_logger {
            app.insert_resource(logger);
        }
        app.add_plugins(GameplayPlugin);

        app.finish();
        app.cleanup();
        app.world_mut().run_schedule(Startup);
        Ok(app)
    }
}

/// Advance the clock by one fixed period and run the gameplay chain once
pub fn step_fixed(app: &mut App) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f64(1.0 / FIXED_HZ));
    app.world_mut().run_schedule(FixedUpdate);
}
