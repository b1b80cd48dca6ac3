use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use chatdock_core::domain::BotConfiguration;

use crate::{ensure_unique_ids, normalize_loaded, ConfigurationStore, StoreDocument, StoreError};

/// Keeps every configuration in one JSON document. A missing file reads as an empty list.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io { path: path.to_path_buf(), source }
    }
}

#[async_trait::async_trait]
impl ConfigurationStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<BotConfiguration>, StoreError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(
                    event_name = "store.missing",
                    path = %self.path.display(),
                    "store file not found, starting empty"
                );
                return Ok(Vec::new());
            }
            Err(error) => return Err(self.io_error(&self.path, error)),
        };

        let document: StoreDocument = serde_json::from_slice(&raw)
            .map_err(|source| StoreError::Decode { path: self.path.clone(), source })?;
        let bots = normalize_loaded(document.bots)?;

        debug!(
            event_name = "store.loaded",
            path = %self.path.display(),
            count = bots.len(),
            "configurations loaded"
        );
        Ok(bots)
    }

    async fn save_all(&self, bots: Vec<BotConfiguration>) -> Result<(), StoreError> {
        ensure_unique_ids(&bots)?;
        let count = bots.len();
        let mut encoded = serde_json::to_vec_pretty(&StoreDocument { bots })?;
        encoded.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|error| self.io_error(parent, error))?;
        }

        // Readers never observe a half-written document.
        let temp = self.temp_path();
        fs::write(&temp, &encoded).await.map_err(|error| self.io_error(&temp, error))?;
        fs::rename(&temp, &self.path).await.map_err(|error| self.io_error(&self.path, error))?;

        info!(
            event_name = "store.saved",
            path = %self.path.display(),
            count,
            "configurations saved"
        );
        Ok(())
    }
}
