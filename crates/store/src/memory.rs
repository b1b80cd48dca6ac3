use tokio::sync::RwLock;

use chatdock_core::domain::BotConfiguration;

use crate::{ensure_unique_ids, normalize_loaded, ConfigurationStore, StoreError};

#[derive(Default)]
pub struct InMemoryConfigurationStore {
    bots: RwLock<Vec<BotConfiguration>>,
}

impl InMemoryConfigurationStore {
    pub fn with_bots(bots: Vec<BotConfiguration>) -> Result<Self, StoreError> {
        let bots = normalize_loaded(bots)?;
        Ok(Self { bots: RwLock::new(bots) })
    }
}

#[async_trait::async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn load_all(&self) -> Result<Vec<BotConfiguration>, StoreError> {
        let bots = self.bots.read().await;
        Ok(bots.clone())
    }

    async fn save_all(&self, bots: Vec<BotConfiguration>) -> Result<(), StoreError> {
        ensure_unique_ids(&bots)?;
        let mut stored = self.bots.write().await;
        *stored = bots;
        Ok(())
    }
}
