//! A completed on-chain withdrawal, recorded only after the driver confirms
//! broadcast.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deposit_address::AddressId;
use crate::domain::value_objects::{CoinName, RefUuid, Timestamp, WithdrawId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdraw {
    pub id: WithdrawId,
    pub api_id: uuid::Uuid,
    pub coin_name: CoinName,
    pub from_address: String,
    /// Amount sent to the recipient, excluding fee.
    pub amount: Decimal,
    /// Fee charged separately from `amount` — see the balance invariant in §3.
    pub fee_and_tax: Decimal,
    pub from_address_id: AddressId,
    pub to_address: String,
    pub txid: String,
    pub tx_key: Option<String>,
    pub timestamp: Timestamp,
    pub remark: String,
    pub ref_uuid: RefUuid,
}

impl Withdraw {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_id: uuid::Uuid,
        coin_name: impl Into<String>,
        from_address: impl Into<String>,
        amount: Decimal,
        fee_and_tax: Decimal,
        from_address_id: AddressId,
        to_address: impl Into<String>,
        txid: impl Into<String>,
        tx_key: Option<String>,
        remark: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: WithdrawId::new(),
            api_id,
            coin_name: coin_name.into(),
            from_address: from_address.into(),
            amount,
            fee_and_tax,
            from_address_id,
            to_address: to_address.into(),
            txid: txid.into(),
            tx_key,
            timestamp: now,
            remark: remark.into(),
            ref_uuid: RefUuid::new(),
        }
    }

    /// Total debited from the sender's ledger counters.
    pub fn total_debited(&self) -> Decimal {
        self.amount + self.fee_and_tax
    }
}
