//! Redb-backed durable token store.
//!
//! Uses Redb's ACID transactions, so a token written before a crash is still
//! there on the next bootstrap. Database calls are blocking and run on the
//! Tokio blocking pool.

use std::{path::Path, sync::Arc};

use barrio_core::{StorageError, env::TokenStore};
use redb::{Database, TableDefinition};

/// Table: tokens
/// Key: logical key (e.g. `userToken`)
/// Value: token string as UTF-8 bytes
const TOKENS: TableDefinition<&str, &[u8]> = TableDefinition::new("tokens");

/// Durable token store backed by Redb.
///
/// Thread-safe through Redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbTokenStore {
    db: Arc<Database>,
}

impl RedbTokenStore {
    /// Open or create a Redb database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path.as_ref()).map_err(|e| StorageError::Io(e.to_string()))?;

        let txn = db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        {
            let _ = txn.open_table(TOKENS).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Run a blocking database operation off the async executor.
    async fn blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::Io(format!("blocking task failed: {e}")))?
    }
}

fn read_value(db: &Database, key: &str) -> Result<Option<String>, StorageError> {
    let txn = db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
    let table = txn.open_table(TOKENS).map_err(|e| StorageError::Io(e.to_string()))?;

    let value = table.get(key).map_err(|e| StorageError::Io(e.to_string()))?;
    value.map(|v| decode(key, v.value())).transpose()
}

fn decode(key: &str, bytes: &[u8]) -> Result<String, StorageError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| StorageError::Corrupt(format!("value under '{key}' is not UTF-8: {e}")))
}

fn write_value(db: &Database, key: &str, value: Option<&str>) -> Result<(), StorageError> {
    let txn = db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
    {
        let mut table = txn.open_table(TOKENS).map_err(|e| StorageError::Io(e.to_string()))?;
        match value {
            Some(value) => {
                table.insert(key, value.as_bytes()).map_err(|e| StorageError::Io(e.to_string()))?;
            },
            None => {
                table.remove(key).map_err(|e| StorageError::Io(e.to_string()))?;
            },
        }
    }
    txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;
    Ok(())
}

impl TokenStore for RedbTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.blocking(move |db| read_value(db, &key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.blocking(move |db| write_value(db, &key, Some(&value))).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.blocking(move |db| write_value(db, &key, None)).await
    }
}
