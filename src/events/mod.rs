//! Game event bus and persistent event log
//!
//! Core systems emit timestamped events to the EventBus; the final system in
//! each tick drains it into SQLite.

mod bus;
mod sqlite_logger;
mod types;

pub use bus::{BusEvent, EventBus};
pub use sqlite_logger::{SqliteEventLogger, flush_events_to_sqlite};
pub use types::{GameEvent, vec_tuple};
