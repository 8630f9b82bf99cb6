pub mod sqlite;

use chrono::{DateTime, Utc};

use crate::app::Result;

pub use sqlite::SqliteStore;

/// Backing store for the database health check.
pub trait Store {
    fn record_tick(&self, at: DateTime<Utc>) -> Result<()>;
    fn get_all_ticks(&self) -> Result<Vec<DateTime<Utc>>>;

    /// Records a tick for now and returns every tick recorded so far.
    fn ping(&self) -> Result<Vec<DateTime<Utc>>> {
        self.record_tick(Utc::now())?;
        self.get_all_ticks()
    }
}
