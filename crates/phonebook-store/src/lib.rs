pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod query;
pub mod repo;

use crate::error::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Handle on the phonebook database.
///
/// The store only remembers where the database lives. Every operation opens
/// its own connection and drops it before returning.
pub struct Store {
    target: Target,
}

enum Target {
    File(PathBuf),
    // The anchor connection keeps the shared in-memory database alive.
    Memory { uri: String, _anchor: Connection },
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        db::open(path)?;
        Ok(Self {
            target: Target::File(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let uri = db::memory_uri();
        let anchor = db::open_memory(&uri)?;
        Ok(Self {
            target: Target::Memory {
                uri,
                _anchor: anchor,
            },
        })
    }

    /// Creates or upgrades the schema. Safe to call on every startup.
    pub fn migrate(&self) -> Result<()> {
        let mut conn = self.connect()?;
        migrate::run_migrations(&mut conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.connect()?)
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::File(path) => Some(path),
            Target::Memory { .. } => None,
        }
    }

    pub fn connect(&self) -> Result<Connection> {
        match &self.target {
            Target::File(path) => db::open(path),
            Target::Memory { uri, .. } => db::open_memory(uri),
        }
    }

    pub fn contacts(&self) -> repo::ContactsRepo<'_> {
        repo::ContactsRepo::new(self)
    }
}
