//! A deposit address bound to one API identity, plus the running counters
//! that the balance invariant is defined over.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{CoinName, Timestamp, round_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressId(Uuid);

impl AddressId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AddressId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AddressId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositAddress {
    pub id: AddressId,
    pub api_id: Uuid,
    pub coin_name: CoinName,
    pub created_date: Timestamp,
    pub address: String,
    /// Payment id for integrated-address chains (XMR/CN families); unused for BTC-family.
    pub address_extra: Option<String>,
    /// BTC-family only: the exported private key for the generated address.
    pub private_key: Option<String>,
    /// Owner-facing label, unique per `(api_id, coin_name)`.
    pub tag: String,
    pub second_tag: Option<String>,

    pub total_deposited: Decimal,
    pub numb_deposit: u64,
    pub total_received: Decimal,
    pub numb_received: u64,
    pub total_sent: Decimal,
    pub numb_sent: u64,
    pub total_withdrew: Decimal,
    pub numb_withdrew: u64,
    pub amount_hold: Decimal,
}

/// Snapshot returned by `/balance`, rounded to the coin's configured `round_places`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BalanceView {
    pub balance: Decimal,
    pub amount_hold: Decimal,
    pub deposit: Decimal,
    pub withdrew: Decimal,
    pub received: Decimal,
    pub sent: Decimal,
}

impl DepositAddress {
    pub fn new(
        api_id: Uuid,
        coin_name: impl Into<String>,
        address: impl Into<String>,
        tag: impl Into<String>,
        created_date: Timestamp,
    ) -> Self {
        Self {
            id: AddressId::new(),
            api_id,
            coin_name: coin_name.into(),
            created_date,
            address: address.into(),
            address_extra: None,
            private_key: None,
            tag: tag.into(),
            second_tag: None,
            total_deposited: Decimal::ZERO,
            numb_deposit: 0,
            total_received: Decimal::ZERO,
            numb_received: 0,
            total_sent: Decimal::ZERO,
            numb_sent: 0,
            total_withdrew: Decimal::ZERO,
            numb_withdrew: 0,
            amount_hold: Decimal::ZERO,
        }
    }

    /// Balance per the invariant of §3 of the specification:
    /// `deposited + received − sent − withdrew − hold`.
    pub fn raw_balance(&self) -> Decimal {
        self.total_deposited + self.total_received
            - self.total_sent
            - self.total_withdrew
            - self.amount_hold
    }

    pub fn balance_view(&self, round_places: u32) -> BalanceView {
        BalanceView {
            balance: round_amount(self.raw_balance(), round_places),
            amount_hold: round_amount(self.amount_hold, round_places),
            deposit: round_amount(self.total_deposited, round_places),
            withdrew: round_amount(self.total_withdrew, round_places),
            received: round_amount(self.total_received, round_places),
            sent: round_amount(self.total_sent, round_places),
        }
    }

    /// Apply a newly-promoted deposit (`can_credit` flipping No -> Yes).
    pub fn credit_deposit(&mut self, amount: Decimal) {
        self.total_deposited += amount;
        self.numb_deposit += 1;
    }

    pub fn credit_transfer_in(&mut self, amount: Decimal) {
        self.total_received += amount;
        self.numb_received += 1;
    }

    pub fn debit_transfer_out(&mut self, amount: Decimal) {
        self.total_sent += amount;
        self.numb_sent += 1;
    }

    /// `amount` and `fee` are recorded together in `total_withdrew`, matching
    /// the balance invariant; the caller persists them as distinct fields on
    /// the `Withdraw` row.
    pub fn debit_withdraw(&mut self, amount: Decimal, fee: Decimal) {
        self.total_withdrew += amount + fee;
        self.numb_withdrew += 1;
    }

    pub fn place_hold(&mut self, amount: Decimal) {
        self.amount_hold += amount;
    }

    pub fn release_hold(&mut self, amount: Decimal) {
        self.amount_hold -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make() -> DepositAddress {
        DepositAddress::new(Uuid::new_v4(), "BTC", "addr1", "tag1", chrono::Utc::now())
    }

    #[test]
    fn balance_follows_invariant() {
        let mut addr = make();
        addr.credit_deposit(dec!(10));
        addr.credit_transfer_in(dec!(2));
        addr.debit_transfer_out(dec!(1));
        addr.debit_withdraw(dec!(3), dec!(0.1));
        addr.place_hold(dec!(0.5));

        // 10 + 2 - 1 - 3.1 - 0.5 = 7.4
        assert_eq!(addr.raw_balance(), dec!(7.4));
        assert_eq!(addr.total_withdrew, dec!(3.1));
    }

    #[test]
    fn balance_view_rounds_down() {
        let mut addr = make();
        addr.credit_deposit(dec!(1.123456789));
        let view = addr.balance_view(4);
        assert_eq!(view.balance, dec!(1.1234));
    }

    #[test]
    fn hold_reduces_balance_without_moving_counters() {
        let mut addr = make();
        addr.credit_deposit(dec!(5));
        addr.place_hold(dec!(2));
        assert_eq!(addr.raw_balance(), dec!(3));
        addr.release_hold(dec!(2));
        assert_eq!(addr.raw_balance(), dec!(5));
    }
}
