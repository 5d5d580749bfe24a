//! An on-chain credit observed by a reconciler tick.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deposit_address::AddressId;
use crate::domain::value_objects::{CoinName, CreditState, DepositId, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub coin_name: CoinName,
    pub api_id: uuid::Uuid,
    pub deposit_id: AddressId,
    pub txid: String,
    pub blockhash: Option<String>,
    pub address: String,
    pub extra: Option<String>,
    pub height: i64,
    pub amount: Decimal,
    pub confirmations: i64,
    pub time_insert: Timestamp,
    pub can_credit: CreditState,
    pub already_noted: bool,
    pub noted_time: Option<Timestamp>,
}

impl Deposit {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        coin_name: impl Into<String>,
        api_id: uuid::Uuid,
        deposit_id: AddressId,
        txid: impl Into<String>,
        address: impl Into<String>,
        extra: Option<String>,
        height: i64,
        amount: Decimal,
        confirmations: i64,
        now: Timestamp,
    ) -> Self {
        Self {
            id: DepositId::new(),
            coin_name: coin_name.into(),
            api_id,
            deposit_id,
            txid: txid.into(),
            blockhash: None,
            address: address.into(),
            extra,
            height,
            amount,
            confirmations,
            time_insert: now,
            can_credit: CreditState::No,
            already_noted: false,
            noted_time: None,
        }
    }

    /// Unique key used for idempotent `upsert_deposit`.
    pub fn natural_key(&self) -> (String, String, String) {
        (self.coin_name.clone(), self.txid.clone(), self.address.clone())
    }

    /// `promote_confirmed` admission test: depth met either by the driver's
    /// own confirmation count or by `tip - height`.
    pub fn is_eligible_for_promotion(&self, tip: i64, confirmation_depth: i64) -> bool {
        self.can_credit == CreditState::No
            && (self.confirmations >= confirmation_depth || tip - self.height >= confirmation_depth)
    }

    pub fn promote(&mut self) {
        self.can_credit = CreditState::Yes;
    }

    pub fn mark_noted(&mut self, now: Timestamp) {
        self.already_noted = true;
        self.noted_time = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make(height: i64, confirmations: i64) -> Deposit {
        Deposit::new(
            "BTC",
            uuid::Uuid::new_v4(),
            AddressId::new(),
            "txid1",
            "addr1",
            None,
            height,
            dec!(1),
            confirmations,
            chrono::Utc::now(),
        )
    }

    #[test]
    fn promotes_on_confirmation_count() {
        let d = make(100, 6);
        assert!(d.is_eligible_for_promotion(100, 6));
    }

    #[test]
    fn promotes_on_tip_depth_even_if_confirmations_stale() {
        let d = make(100, 0);
        assert!(d.is_eligible_for_promotion(106, 6));
        assert!(!d.is_eligible_for_promotion(105, 6));
    }

    #[test]
    fn never_re_eligible_once_promoted() {
        let mut d = make(100, 6);
        d.promote();
        assert!(!d.is_eligible_for_promotion(200, 6));
    }
}
