//! High-score table backed by SQLite
//!
//! Keeps the best `LEADERBOARD_SIZE` scores per mode. A score qualifies when
//! the table for its mode has free slots or it beats the current lowest entry.

use bevy::prelude::*;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;

use crate::collaborators::{Leaderboard, ScoreRecord};
use crate::constants::LEADERBOARD_SIZE;

/// One row of the high-score table
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_name: String,
    pub score: u32,
    pub attempts: u32,
    pub made: u32,
    pub accuracy: u32,
    /// YYYY-MM-DD
    pub date: String,
}

/// SQLite implementation of the leaderboard collaborator
pub struct SqliteLeaderboard {
    conn: Mutex<Connection>,
    capacity: usize,
}

impl SqliteLeaderboard {
    pub fn open(db_path: &Path) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = db_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        Self::from_connection(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY,
                mode TEXT NOT NULL,
                player_name TEXT NOT NULL,
                score INTEGER NOT NULL,
                attempts INTEGER NOT NULL,
                made INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_scores_mode ON scores(mode, score DESC);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            capacity: LEADERBOARD_SIZE,
        })
    }

    /// Best scores for a mode, highest first (ties keep insertion order)
    pub fn top_scores(&self, mode_name: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, rusqlite::Error> {
        let Ok(conn) = self.conn.lock() else {
            return Ok(Vec::new());
        };
        let mut stmt = conn.prepare(
            "SELECT player_name, score, attempts, made, accuracy, date FROM scores
             WHERE mode = ?1 ORDER BY score DESC, id ASC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![mode_name, limit as i64], |row| {
            Ok(LeaderboardEntry {
                rank: 0,
                player_name: row.get(0)?,
                score: row.get(1)?,
                attempts: row.get(2)?,
                made: row.get(3)?,
                accuracy: row.get(4)?,
                date: row.get(5)?,
            })
        })?;
        let mut entries = rows.collect::<Result<Vec<_>, _>>()?;
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
        Ok(entries)
    }

    fn qualifies(&self, mode_name: &str, score: u32) -> Result<bool, rusqlite::Error> {
        let Ok(conn) = self.conn.lock() else {
            return Ok(false);
        };
        let (count, lowest): (i64, Option<i64>) = conn.query_row(
            "SELECT COUNT(*), MIN(score) FROM
               (SELECT score FROM scores WHERE mode = ?1 ORDER BY score DESC, id ASC LIMIT ?2)",
            params![mode_name, self.capacity as i64],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((count as usize) < self.capacity || lowest.is_some_and(|low| i64::from(score) > low))
    }

    fn insert(&self, record: &ScoreRecord) -> Result<(), rusqlite::Error> {
        let Ok(mut conn) = self.conn.lock() else {
            return Ok(());
        };
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO scores (mode, player_name, score, attempts, made, accuracy, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.mode_name,
                record.player_name,
                record.score,
                record.attempts,
                record.made,
                record.accuracy,
                date
            ],
        )?;
        // Trim the mode's table back to capacity
        tx.execute(
            "DELETE FROM scores WHERE mode = ?1 AND id NOT IN
               (SELECT id FROM scores WHERE mode = ?1 ORDER BY score DESC, id ASC LIMIT ?2)",
            params![record.mode_name, self.capacity as i64],
        )?;
        tx.commit()
    }

    /// Standings for one mode as a fixed-width text table
    pub fn format_table(&self, mode_name: &str) -> String {
        let entries = match self.top_scores(mode_name, self.capacity) {
            Ok(entries) => entries,
            Err(e) => return format!("Failed to read leaderboard: {}\n", e),
        };
        let mut output = format!("\n{} LEADERBOARD:\n", mode_name.to_uppercase());
        output.push_str("  Rank  Player          Score  Made/Att  Accuracy  Date\n");
        output.push_str("  ───────────────────────────────────────────────────────────\n");
        for e in &entries {
            output.push_str(&format!(
                "  {:>2}.   {:<14}  {:>5}   {:>3}/{:<3}    {:>3}%    {}\n",
                e.rank,
                e.player_name.chars().take(14).collect::<String>(),
                e.score,
                e.made,
                e.attempts,
                e.accuracy,
                e.date,
            ));
        }
        output
    }
}

impl Leaderboard for SqliteLeaderboard {
    fn is_high_score(&self, mode_name: &str, score: u32) -> bool {
        self.qualifies(mode_name, score).unwrap_or_else(|e| {
            warn!("Leaderboard lookup failed: {}", e);
            false
        })
    }

    fn record_score(&mut self, record: ScoreRecord) {
        match self.insert(&record) {
            Ok(()) => info!(
                "High score recorded: {} {} in {}",
                record.player_name, record.score, record.mode_name
            ),
            Err(e) => warn!("Failed to record high score: {}", e),
        }
    }

    fn standings(&self, mode_name: &str) -> Option<String> {
        Some(self.format_table(mode_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Collaborators;

    fn record(mode: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            mode_name: mode.to_string(),
            player_name: format!("p{}", score),
            score,
            attempts: 10,
            made: score / 2,
            accuracy: score * 5,
        }
    }

    #[test]
    fn test_empty_board_accepts_anything() {
        let board = SqliteLeaderboard::in_memory().unwrap();
        assert!(board.is_high_score("Shot Limit", 0));
    }

    #[test]
    fn test_full_board_requires_beating_lowest() {
        let mut board = SqliteLeaderboard::in_memory().unwrap();
        for score in 1..=LEADERBOARD_SIZE as u32 {
            board.record_score(record("Timed Challenge", score * 2));
        }
        // Lowest is 2
        assert!(!board.is_high_score("Timed Challenge", 2));
        assert!(board.is_high_score("Timed Challenge", 3));
        // Other modes are independent
        assert!(board.is_high_score("Shot Limit", 0));

        board.record_score(record("Timed Challenge", 3));
        let top = board.top_scores("Timed Challenge", 100).unwrap();
        assert_eq!(top.len(), LEADERBOARD_SIZE);
        assert_eq!(top[0].score, LEADERBOARD_SIZE as u32 * 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top.last().map(|e| e.score), Some(3));
        assert_eq!(top[0].date.len(), 10);
    }

    #[test]
    fn test_format_table_lists_entries() {
        let mut board = SqliteLeaderboard::in_memory().unwrap();
        board.record_score(record("Shot Limit", 20));
        let table = board.format_table("Shot Limit");
        assert!(table.contains("SHOT LIMIT LEADERBOARD"));
        assert!(table.contains("p20"));
    }

    #[test]
    fn test_standings_through_collaborators() {
        let mut collaborators = Collaborators::default()
            .with_leaderboard(SqliteLeaderboard::in_memory().unwrap());
        assert!(collaborators.is_high_score("Shot Limit", 12));
        collaborators.record_score(ScoreRecord {
            player_name: "Zoë Ångström-Larsen".to_string(),
            ..record("Shot Limit", 12)
        });

        let table = collaborators.standings("Shot Limit").unwrap();
        assert!(table.contains("Zoë Ångström-L"));
        assert!(table.contains("   12"));
        assert!(Collaborators::default().standings("Shot Limit").is_none());
    }
}
