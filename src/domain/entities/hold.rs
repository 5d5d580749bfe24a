//! A time-bounded reservation against an address's spendable balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deposit_address::AddressId;
use crate::domain::value_objects::{CoinName, HoldId, Timestamp};

/// `expiring` seconds are clamped to this range by the `/hold_alance` handler.
pub const MIN_EXPIRING_SECS: i64 = 30;
pub const MAX_EXPIRING_SECS: i64 = 30 * 24 * 3600;
pub const MAX_PURPOSE_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    pub id: HoldId,
    pub coin_name: CoinName,
    pub api_id: uuid::Uuid,
    pub address_id: AddressId,
    pub address: String,
    pub hold_amount: Decimal,
    pub time_insert: Timestamp,
    pub time_expiring: Timestamp,
    pub purpose: String,
}

impl Hold {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        coin_name: impl Into<String>,
        api_id: uuid::Uuid,
        address_id: AddressId,
        address: impl Into<String>,
        hold_amount: Decimal,
        expiring_secs: i64,
        purpose: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        let clamped = expiring_secs.clamp(MIN_EXPIRING_SECS, MAX_EXPIRING_SECS);
        let mut purpose = purpose.into();
        if purpose.len() > MAX_PURPOSE_LEN {
            purpose.truncate(MAX_PURPOSE_LEN);
        }
        Self {
            id: HoldId::new(),
            coin_name: coin_name.into(),
            api_id,
            address_id,
            address: address.into(),
            hold_amount,
            time_insert: now,
            time_expiring: now + chrono::Duration::seconds(clamped),
            purpose,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.time_expiring < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn clamps_expiring_to_bounds() {
        let now = chrono::Utc::now();
        let too_short = Hold::new("BTC", uuid::Uuid::new_v4(), AddressId::new(), "a", dec!(1), 1, "p", now);
        assert_eq!((too_short.time_expiring - now).num_seconds(), MIN_EXPIRING_SECS);

        let too_long = Hold::new("BTC", uuid::Uuid::new_v4(), AddressId::new(), "a", dec!(1), i64::MAX, "p", now);
        assert_eq!((too_long.time_expiring - now).num_seconds(), MAX_EXPIRING_SECS);
    }

    #[test]
    fn truncates_oversize_purpose() {
        let now = chrono::Utc::now();
        let long = "x".repeat(400);
        let hold = Hold::new("BTC", uuid::Uuid::new_v4(), AddressId::new(), "a", dec!(1), 60, long, now);
        assert_eq!(hold.purpose.len(), MAX_PURPOSE_LEN);
    }

    #[test]
    fn is_expired_reflects_clock() {
        let now = chrono::Utc::now();
        let hold = Hold::new("BTC", uuid::Uuid::new_v4(), AddressId::new(), "a", dec!(1), 30, "p", now);
        assert!(!hold.is_expired(now));
        assert!(hold.is_expired(now + chrono::Duration::seconds(31)));
    }
}
