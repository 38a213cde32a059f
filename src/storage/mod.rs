//! Key-value persistence standing in for browser local storage.
//!
//! The session store depends only on [`KeyValueStore`], so the SQLite file
//! backend can be swapped for a real credential service later.

mod sqlite;

pub use sqlite::*;

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use tokio::sync::RwLock;

use crate::errors::AppError;

/// String-keyed text storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Process-local storage, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// The backend selected by configuration.
pub enum LocalStorage {
    Sqlite(SqliteStorage),
    Memory(MemoryStorage),
}

impl LocalStorage {
    /// SQLite at `path`, or memory when no path is configured.
    pub async fn open(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Ok(LocalStorage::Sqlite(SqliteStorage::open(path).await?)),
            None => Ok(LocalStorage::Memory(MemoryStorage::new())),
        }
    }
}

impl KeyValueStore for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match self {
            LocalStorage::Sqlite(inner) => inner.get(key).await,
            LocalStorage::Memory(inner) => inner.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        match self {
            LocalStorage::Sqlite(inner) => inner.set(key, value).await,
            LocalStorage::Memory(inner) => inner.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        match self {
            LocalStorage::Sqlite(inner) => inner.remove(key).await,
            LocalStorage::Memory(inner) => inner.remove(key).await,
        }
    }
}
