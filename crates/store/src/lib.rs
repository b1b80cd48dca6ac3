//! Persistence boundary for bot configurations.
//!
//! Stores read and write the whole list at once; `find`, `upsert` and `delete` are built on top
//! of that and are last-write-wins.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chatdock_core::domain::{BotConfiguration, BotId};
use chatdock_core::errors::{ApplicationError, DomainError};
use chatdock_core::validator;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryConfigurationStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not access `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("could not decode `{path}`: {source}")]
    Decode { path: PathBuf, source: serde_json::Error },
    #[error("could not encode configurations: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("bot id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("stored bot `{id}` is invalid: {source}")]
    Invalid { id: String, source: DomainError },
}

impl From<StoreError> for ApplicationError {
    fn from(error: StoreError) -> Self {
        Self::Persistence(error.to_string())
    }
}

/// On-disk shape: `{ "bots": [ ... ] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub bots: Vec<BotConfiguration>,
}

#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<BotConfiguration>, StoreError>;
    async fn save_all(&self, bots: Vec<BotConfiguration>) -> Result<(), StoreError>;

    async fn find(&self, id: &BotId) -> Result<Option<BotConfiguration>, StoreError> {
        let bots = self.load_all().await?;
        Ok(bots.into_iter().find(|bot| &bot.id == id))
    }

    /// Replaces the bot with the same id in place, or appends it.
    async fn upsert(&self, bot: BotConfiguration) -> Result<(), StoreError> {
        let mut bots = self.load_all().await?;
        match bots.iter_mut().find(|existing| existing.id == bot.id) {
            Some(existing) => *existing = bot,
            None => bots.push(bot),
        }
        self.save_all(bots).await
    }

    /// Returns `false` when no bot had that id.
    async fn delete(&self, id: &BotId) -> Result<bool, StoreError> {
        let mut bots = self.load_all().await?;
        let before = bots.len();
        bots.retain(|bot| &bot.id != id);
        if bots.len() == before {
            return Ok(false);
        }
        self.save_all(bots).await?;
        Ok(true)
    }
}

pub(crate) fn ensure_unique_ids(bots: &[BotConfiguration]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(bots.len());
    for bot in bots {
        if !seen.insert(bot.id.0.as_str()) {
            return Err(StoreError::DuplicateId(bot.id.0.clone()));
        }
    }
    Ok(())
}

/// Applies the structural invariants to documents that may predate them.
pub(crate) fn normalize_loaded(
    mut bots: Vec<BotConfiguration>,
) -> Result<Vec<BotConfiguration>, StoreError> {
    ensure_unique_ids(&bots)?;
    for bot in &mut bots {
        validator::normalize(bot)
            .map_err(|source| StoreError::Invalid { id: bot.id.0.clone(), source })?;
    }
    Ok(bots)
}
