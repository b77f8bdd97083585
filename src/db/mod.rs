mod lifecycle;
pub mod rules;
mod schema;
pub mod store;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::{Connection, TransactionBehavior};

use crate::error::LedgerResult;
use store::Store;

/// How long a writer waits for another connection's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the ledger database.
///
/// Cloning is cheap and shares the same connection. Every lifecycle operation
/// locks the connection and runs inside a single transaction, so operations
/// through one handle are serialized and never partially applied.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::from_connection(conn)
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Run `work` as one unit of work: an immediate transaction that commits
    /// only if `work` succeeds and is rolled back otherwise.
    fn unit_of_work<T>(
        &self,
        work: impl FnOnce(&Store<'_>) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = work(&Store::new(&tx))?;
        tx.commit()?;
        Ok(value)
    }

    fn read<T>(&self, query: impl FnOnce(&Store<'_>) -> LedgerResult<T>) -> LedgerResult<T> {
        let conn = self.conn.lock().expect("database lock poisoned");
        query(&Store::new(&conn))
    }
}

/// Default database location inside the platform data directory.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "staffing-ledger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("staffing.db"))
}
