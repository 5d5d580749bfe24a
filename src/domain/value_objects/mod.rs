//! Primitive value types shared across the domain.

mod ids;

pub use ids::{ApiId, DepositId, HoldId, RefUuid, WithdrawId};

use serde::{Deserialize, Serialize};

/// Wall-clock timestamp. Entities store these as `chrono::DateTime<Utc>`;
/// the API envelope serializes them as epoch seconds.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Coin identifier as configured in `CoinSetting` (e.g. `"BTC"`, `"XMR"`, `"TRTL"`).
pub type CoinName = String;

/// The wire family a `CoinSetting` dispatches to. Selects the `Driver` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoinType {
    Btc,
    Xmr,
    TrtlApi,
    TrtlService,
    Bcn,
}

impl std::fmt::Display for CoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CoinType::Btc => "BTC",
            CoinType::Xmr => "XMR",
            CoinType::TrtlApi => "TRTL-API",
            CoinType::TrtlService => "TRTL-SERVICE",
            CoinType::Bcn => "BCN",
        };
        write!(f, "{}", s)
    }
}

/// Whether a deposit has cleared enough confirmations to be spendable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditState {
    No,
    Yes,
}

/// Build the `by_key` lookup key used by the address registry: `"<coin>_<address>"`.
pub fn address_key(coin: &str, address: &str) -> String {
    format!("{coin}_{address}")
}

/// Round down to `places` decimal digits: `floor(amount * 10^places) / 10^places`.
pub fn round_amount(amount: rust_decimal::Decimal, places: u32) -> rust_decimal::Decimal {
    amount.trunc_with_scale(places)
}
