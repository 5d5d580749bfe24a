//! Administrative configuration for one supported coin.
//!
//! Loaded from the ledger store at startup and on every `reload_coin_settings`
//! tick; held in-process as part of the [`crate::infrastructure::registry`]
//! snapshot so request handlers never block on a store read to check a flag.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CoinName, CoinType, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSetting {
    pub coin_name: CoinName,
    pub coin_type: CoinType,
    pub enabled: bool,
    pub enable_create: bool,
    pub enable_deposit: bool,
    pub enable_withdraw: bool,
    pub daemon_address: String,
    pub wallet_address: String,
    pub wallet_header: String,
    pub main_address: String,
    /// Atomic-unit exponent, e.g. 8 for BTC (1 coin = 10^8 atomic units).
    pub decimal: u32,
    pub confirmation_depth: i64,
    pub min_deposit: Decimal,
    pub min_transfer: Decimal,
    pub max_transfer: Decimal,
    pub min_withdraw: Decimal,
    pub max_withdraw: Decimal,
    pub fee_withdraw: Decimal,
    pub mixin: u32,
    pub is_fee_per_byte: bool,
    pub has_pos: bool,
    pub round_places: u32,
    pub chain_height: i64,
    pub chain_height_set_time: Option<Timestamp>,
    pub use_getinfo_btc: bool,
}

impl CoinSetting {
    /// Record a freshly observed tip. Called by the reconciler on every
    /// successful `top_block()` so `promote_confirmed` always has an
    /// authoritative height to compare against, independent of the cache.
    pub fn record_tip(&mut self, height: i64, now: Timestamp) {
        self.chain_height = height;
        self.chain_height_set_time = Some(now);
    }

    pub fn min_deposit_atomic(&self) -> Decimal {
        self.min_deposit * Decimal::from(10u64.pow(self.decimal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make(decimal: u32) -> CoinSetting {
        CoinSetting {
            coin_name: "BTC".to_string(),
            coin_type: CoinType::Btc,
            enabled: true,
            enable_create: true,
            enable_deposit: true,
            enable_withdraw: true,
            daemon_address: "http://127.0.0.1:8332".to_string(),
            wallet_address: String::new(),
            wallet_header: String::new(),
            main_address: String::new(),
            decimal,
            confirmation_depth: 6,
            min_deposit: dec!(0.001),
            min_transfer: dec!(0.0001),
            max_transfer: dec!(100),
            min_withdraw: dec!(0.001),
            max_withdraw: dec!(10),
            fee_withdraw: dec!(0.0001),
            mixin: 0,
            is_fee_per_byte: false,
            has_pos: false,
            round_places: 8,
            chain_height: 0,
            chain_height_set_time: None,
            use_getinfo_btc: false,
        }
    }

    #[test]
    fn record_tip_updates_height_and_timestamp() {
        let mut coin = make(8);
        let now = chrono::Utc::now();
        coin.record_tip(123, now);
        assert_eq!(coin.chain_height, 123);
        assert_eq!(coin.chain_height_set_time, Some(now));
    }

    #[test]
    fn min_deposit_atomic_scales_by_decimal() {
        let coin = make(8);
        assert_eq!(coin.min_deposit_atomic(), dec!(100000));
    }
}
