//! SQLite Event Logger - persistent store for bus events
//!
//! Every game (one run of a mode) gets a row in `games`; bus events are stored
//! as JSON payloads in `events`, keyed by game.

use bevy::prelude::*;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;

use super::bus::EventBus;
use super::types::GameEvent;
use crate::modes::GameModeKind;

/// Resource for logging events to SQLite
///
/// The database connection is wrapped in a Mutex for thread safety.
#[derive(Resource)]
pub struct SqliteEventLogger {
    /// `None` for a disabled logger
    conn: Option<Mutex<Connection>>,
    session_id: String,
    current_game_id: Mutex<Option<i64>>,
    /// Whether logging is enabled
    enabled: bool,
}

impl SqliteEventLogger {
    /// Open (or create) the event database and start a session
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `session_type` - Type of session (e.g., "game", "scenario", "simulation")
    pub fn new(db_path: &Path, session_type: &str) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = db_path.parent() {
            // Connection::open reports the real failure if this does not work
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = Connection::open(db_path)?;

        // Enable WAL mode for concurrent reads during writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        Self::from_connection(conn, session_type)
    }

    /// In-memory database (scenario runs and tests)
    pub fn in_memory(session_type: &str) -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open_in_memory()?, session_type)
    }

    fn from_connection(conn: Connection, session_type: &str) -> Result<Self, rusqlite::Error> {
        init_schema(&conn)?;
        let session_id = create_session(&conn, session_type)?;
        info!("Event log session {} ({})", session_id, session_type);
        Ok(Self {
            conn: Some(Mutex::new(conn)),
            session_id,
            current_game_id: Mutex::new(None),
            enabled: true,
        })
    }

    /// Create a disabled logger (no-op)
    pub fn disabled() -> Self {
        Self {
            conn: None,
            session_id: String::new(),
            current_game_id: Mutex::new(None),
            enabled: false,
        }
    }

    fn connection(&self) -> Option<std::sync::MutexGuard<'_, Connection>> {
        if !self.enabled {
            return None;
        }
        self.conn.as_ref()?.lock().ok()
    }

    /// Start a new game row and return its ID. An unfinished game is closed first.
    pub fn start_game(&self, mode: GameModeKind) -> Option<i64> {
        if self.current_game_id().is_some() {
            self.finish_game(None);
        }
        let conn = self.connection()?;

        let result = conn.execute(
            r#"INSERT INTO games (session_id, mode, started_at, score, attempts, made, won)
               VALUES (?1, ?2, ?3, 0, 0, 0, NULL)"#,
            params![self.session_id, mode.name(), chrono::Utc::now().to_rfc3339()],
        );

        match result {
            Ok(_) => {
                let game_id = conn.last_insert_rowid();
                *self.current_game_id.lock().ok()? = Some(game_id);
                info!("Started game {} ({})", game_id, mode);
                Some(game_id)
            }
            Err(e) => {
                warn!("Failed to start game: {}", e);
                None
            }
        }
    }

    /// Log a single event against the current game
    pub fn log_event(&self, time_ms: u32, event: &GameEvent) {
        self.log_events(std::slice::from_ref(&(time_ms, event.clone())));
    }

    /// Log multiple events at once (one transaction)
    pub fn log_events(&self, events: &[(u32, GameEvent)]) {
        if events.is_empty() {
            return;
        }
        let game_id = self.current_game_id();
        let Some(mut conn) = self.connection() else {
            return;
        };

        let tx = match conn.transaction() {
            Ok(tx) => tx,
            Err(e) => {
                warn!("Failed to open event transaction: {}", e);
                return;
            }
        };

        for (time_ms, event) in events {
            let data = match serde_json::to_string(event) {
                Ok(data) => data,
                Err(e) => {
                    warn!("Failed to serialize {} event: {}", event.name(), e);
                    continue;
                }
            };
            if let Err(e) = tx.execute(
                "INSERT INTO events (game_id, time_ms, event_type, data) VALUES (?1, ?2, ?3, ?4)",
                params![game_id, time_ms, event.type_code(), data],
            ) {
                warn!("Failed to log event: {}", e);
                return;
            }
        }

        if let Err(e) = tx.commit() {
            warn!("Failed to commit events: {}", e);
        }
    }

    /// Record final stats for the current game
    pub fn end_game(&self, score: u32, attempts: u32, made: u32, won: bool) {
        let Some(game_id) = self.current_game_id() else {
            return;
        };
        if let Some(conn) = self.connection() {
            let result = conn.execute(
                "UPDATE games SET score = ?1, attempts = ?2, made = ?3, won = ?4 WHERE id = ?5",
                params![score, attempts, made, won, game_id],
            );
            match result {
                Ok(_) => info!(
                    "Ended game {} (score: {}, {}/{} made, {})",
                    game_id,
                    score,
                    made,
                    attempts,
                    if won { "won" } else { "lost" }
                ),
                Err(e) => warn!("Failed to end game: {}", e),
            }
        }
        self.clear_current();
    }

    /// Close the current game without a result
    fn finish_game(&self, won: Option<bool>) {
        if let (Some(game_id), Some(conn)) = (self.current_game_id(), self.connection()) {
            if let Err(e) = conn.execute(
                "UPDATE games SET won = ?1 WHERE id = ?2",
                params![won, game_id],
            ) {
                warn!("Failed to close game: {}", e);
            }
        }
        self.clear_current();
    }

    fn clear_current(&self) {
        if let Ok(mut guard) = self.current_game_id.lock() {
            *guard = None;
        }
    }

    /// Get the current game ID (if a game is in progress)
    pub fn current_game_id(&self) -> Option<i64> {
        self.current_game_id.lock().ok().and_then(|g| *g)
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable logging
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled && self.conn.is_some();
    }

    /// Get event count for the current game
    pub fn event_count(&self) -> Option<u64> {
        let game_id = self.current_game_id()?;
        let conn = self.connection()?;
        conn.query_row(
            "SELECT COUNT(*) FROM events WHERE game_id = ?1",
            params![game_id],
            |row| row.get(0),
        )
        .ok()
    }

    /// Final (score, attempts, made, won) of a game
    pub fn game_result(&self, game_id: i64) -> Option<(u32, u32, u32, Option<bool>)> {
        let conn = self.connection()?;
        conn.query_row(
            "SELECT score, attempts, made, won FROM games WHERE id = ?1",
            params![game_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .ok()
    }
}

/// Initialize the database schema
fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            session_type TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY,
            session_id TEXT REFERENCES sessions(id),
            mode TEXT NOT NULL,
            started_at TEXT NOT NULL,
            score INTEGER NOT NULL,
            attempts INTEGER NOT NULL,
            made INTEGER NOT NULL,
            won INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_games_session ON games(session_id);
        CREATE INDEX IF NOT EXISTS idx_games_mode ON games(mode);

        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY,
            game_id INTEGER REFERENCES games(id),
            time_ms INTEGER NOT NULL,
            event_type TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_events_game ON events(game_id);
        CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);
        "#,
    )?;
    Ok(())
}

/// Create a new session and return its ID
fn create_session(conn: &Connection, session_type: &str) -> Result<String, rusqlite::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO sessions (id, created_at, session_type) VALUES (?1, ?2, ?3)",
        params![id, created_at, session_type],
    )?;

    Ok(id)
}

/// System to flush EventBus events to SQLite
///
/// Runs last in the tick. Game rows are opened and closed as ModeStarted and
/// GameEnded events pass through. The bus is drained even without a logger.
pub fn flush_events_to_sqlite(
    mut event_bus: ResMut<EventBus>,
    logger: Option<Res<SqliteEventLogger>>,
) {
    let events = event_bus.export_events();

    let Some(logger) = logger else {
        return;
    };
    if !logger.is_enabled() || events.is_empty() {
        return;
    }

    let mut batch: Vec<(u32, GameEvent)> = Vec::new();
    for (time_ms, event) in events {
        match &event {
            GameEvent::ModeStarted { mode } => {
                logger.log_events(&batch);
                batch.clear();
                logger.start_game(*mode);
                batch.push((time_ms, event));
            }
            GameEvent::GameEnded { score, attempts, made, won, .. } => {
                let (score, attempts, made, won) = (*score, *attempts, *made, *won);
                batch.push((time_ms, event));
                logger.log_events(&batch);
                batch.clear();
                logger.end_game(score, attempts, made, won);
            }
            _ => batch.push((time_ms, event)),
        }
    }
    logger.log_events(&batch);
}
