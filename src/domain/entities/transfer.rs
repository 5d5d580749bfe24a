//! An internal book transfer between two addresses owned by the same or
//! different API identities but the same coin.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deposit_address::AddressId;
use crate::domain::value_objects::{CoinName, RefUuid, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub api_id: uuid::Uuid,
    pub from_address: String,
    pub from_address_id: AddressId,
    pub to_address: String,
    pub to_address_id: AddressId,
    pub amount: Decimal,
    pub coin_name: CoinName,
    pub purpose: String,
    pub timestamp: Timestamp,
    pub ref_uuid: RefUuid,
}

impl Transfer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_id: uuid::Uuid,
        from_address: impl Into<String>,
        from_address_id: AddressId,
        to_address: impl Into<String>,
        to_address_id: AddressId,
        amount: Decimal,
        coin_name: impl Into<String>,
        purpose: impl Into<String>,
        ref_uuid: RefUuid,
        now: Timestamp,
    ) -> Self {
        Self {
            api_id,
            from_address: from_address.into(),
            from_address_id,
            to_address: to_address.into(),
            to_address_id,
            amount,
            coin_name: coin_name.into(),
            purpose: purpose.into(),
            timestamp: now,
            ref_uuid,
        }
    }

    /// Unordered pair key used by the `/transfer` batch loop-detection guard:
    /// the same key for `(A, B)` and `(B, A)` on the same coin.
    pub fn unordered_pair_key(coin: &str, a: &str, b: &str) -> String {
        if a <= b {
            format!("{coin}:{a}:{b}")
        } else {
            format!("{coin}:{b}:{a}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_pair_key_is_direction_independent() {
        assert_eq!(
            Transfer::unordered_pair_key("BTC", "A", "B"),
            Transfer::unordered_pair_key("BTC", "B", "A"),
        );
    }

    #[test]
    fn unordered_pair_key_differs_by_coin() {
        assert_ne!(
            Transfer::unordered_pair_key("BTC", "A", "B"),
            Transfer::unordered_pair_key("XMR", "A", "B"),
        );
    }
}
