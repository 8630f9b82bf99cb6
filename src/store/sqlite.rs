use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, TweetstatsError};
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            TweetstatsError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-ticks/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| TweetstatsError::Other(format!("Migration failed: {e}")))?;

        Ok(())
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }
}

impl Store for SqliteStore {
    fn record_tick(&self, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO ticks (tick) VALUES (?1)",
            params![at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn get_all_ticks(&self) -> Result<Vec<DateTime<Utc>>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT tick FROM ticks ORDER BY id")?;

        let ticks = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ticks
            .iter()
            .filter_map(|s| {
                let parsed = Self::parse_datetime(s);
                if parsed.is_none() {
                    tracing::warn!("Skipping unparseable tick {:?}", s);
                }
                parsed
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_and_list_ticks() {
        let store = SqliteStore::in_memory().unwrap();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 2, 12, 30, 0).unwrap();

        store.record_tick(first).unwrap();
        store.record_tick(second).unwrap();

        assert_eq!(store.get_all_ticks().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_empty_store_has_no_ticks() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_all_ticks().unwrap().is_empty());
    }

    #[test]
    fn test_ping_appends() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.ping().unwrap().len(), 1);
        assert_eq!(store.ping().unwrap().len(), 2);
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.db");

        SqliteStore::new(&path).unwrap().ping().unwrap();
        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(reopened.get_all_ticks().unwrap().len(), 1);
    }
}
