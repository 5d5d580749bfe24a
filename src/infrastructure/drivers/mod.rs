mod btc_family;
mod cn_family;
mod json_rpc;
mod xmr_family;

pub use btc_family::BtcFamilyDriver;
pub use cn_family::{CnRestDriver, CnServiceDriver};
pub use xmr_family::XmrFamilyDriver;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::DriverLookup;
use crate::domain::entities::CoinSetting;
use crate::domain::services::Driver;
use crate::domain::value_objects::CoinType;

/// Builds one concrete [`Driver`] per configured coin and dispatches
/// lookups by `coin_name`. Constructed once at startup; immutable afterward
/// (coin backends don't change without a restart, unlike the settings
/// themselves which `reload_coin_settings` refreshes in place).
pub struct StaticDriverLookup {
    drivers: DashMap<String, Arc<dyn Driver>>,
}

impl StaticDriverLookup {
    pub fn from_settings(settings: &[CoinSetting]) -> Self {
        let drivers = DashMap::new();
        for setting in settings {
            let driver: Arc<dyn Driver> = match setting.coin_type {
                CoinType::Btc => Arc::new(BtcFamilyDriver::new(
                    setting.daemon_address.clone(),
                    setting.use_getinfo_btc,
                )),
                CoinType::Xmr => Arc::new(XmrFamilyDriver::new(
                    setting.wallet_address.clone(),
                    setting.decimal,
                )),
                CoinType::TrtlApi => Arc::new(CnRestDriver::new(
                    setting.daemon_address.clone(),
                    setting.main_address.clone(),
                    setting.wallet_header.clone(),
                    setting.decimal,
                )),
                CoinType::TrtlService | CoinType::Bcn => Arc::new(CnServiceDriver::new(
                    setting.wallet_address.clone(),
                    setting.decimal,
                )),
            };
            drivers.insert(setting.coin_name.clone(), driver);
        }
        Self { drivers }
    }
}

#[async_trait]
impl DriverLookup for StaticDriverLookup {
    async fn driver_for(&self, coin_name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(coin_name).map(|entry| entry.value().clone())
    }
}
