//! In-memory `CoinSetting` table (part of C2).

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::CoinSettingsRepository;
use crate::domain::entities::CoinSetting;
use crate::domain::value_objects::Timestamp;

pub struct InMemoryCoinSettingsRepository {
    settings: DashMap<String, CoinSetting>,
}

impl InMemoryCoinSettingsRepository {
    pub fn new() -> Self {
        Self {
            settings: DashMap::new(),
        }
    }

    pub fn seed(settings: Vec<CoinSetting>) -> Self {
        let repo = Self::new();
        for setting in settings {
            repo.settings.insert(setting.coin_name.clone(), setting);
        }
        repo
    }
}

impl Default for InMemoryCoinSettingsRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoinSettingsRepository for InMemoryCoinSettingsRepository {
    async fn get(&self, coin_name: &str) -> Option<CoinSetting> {
        self.settings.get(coin_name).map(|e| e.value().clone())
    }

    async fn all(&self) -> Vec<CoinSetting> {
        self.settings.iter().map(|e| e.value().clone()).collect()
    }

    async fn reload(&self, settings: Vec<CoinSetting>) {
        self.settings.clear();
        for setting in settings {
            self.settings.insert(setting.coin_name.clone(), setting);
        }
    }

    async fn record_tip(&self, coin_name: &str, height: i64, now: Timestamp) {
        if let Some(mut entry) = self.settings.get_mut(coin_name) {
            entry.record_tip(height, now);
        }
    }
}
