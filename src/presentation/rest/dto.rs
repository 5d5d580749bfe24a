//! Wire-facing request/response shapes for the REST surface (C6).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::CoinStatus;
use crate::domain::entities::{BalanceView, Deposit, DepositAddress, Withdraw};

/// Envelope shared by every endpoint: status code is always 200, `success`
/// is the authoritative indicator.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub time: i64,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T, now: i64) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            time: now,
        }
    }

    pub fn ok_with_message(data: Option<T>, message: impl Into<String>, now: i64) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            time: now,
        }
    }

    pub fn error(message: impl Into<String>, now: i64) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            time: now,
        }
    }

    /// Error envelope carrying a payload alongside the message — used by
    /// batch transfer, whose `data` is the per-line error list.
    pub fn error_with_data(data: T, message: impl Into<String>, now: i64) -> Self {
        Self {
            success: false,
            data: Some(data),
            message: Some(message.into()),
            time: now,
        }
    }
}

/// `/newaddress` replies with `second_tag` as a sibling of `data`, not
/// nested inside it.
#[derive(Debug, Serialize)]
pub struct NewAddressEnvelope {
    pub success: bool,
    pub data: Option<String>,
    pub second_tag: Option<String>,
    pub message: Option<String>,
    pub time: i64,
}

impl NewAddressEnvelope {
    pub fn ok(address: &DepositAddress, message: impl Into<String>, now: i64) -> Self {
        Self {
            success: true,
            data: Some(address.address.clone()),
            second_tag: address.second_tag.clone(),
            message: Some(message.into()),
            time: now,
        }
    }

    pub fn error(message: impl Into<String>, now: i64) -> Self {
        Self {
            success: false,
            data: None,
            second_tag: None,
            message: Some(message.into()),
            time: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewAddressRequest {
    pub coin: String,
    pub tag: String,
    pub second_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    pub coin: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
    pub amount_hold: Decimal,
    pub deposit: Decimal,
    pub withdrew: Decimal,
    pub received: Decimal,
    pub sent: Decimal,
}

impl From<BalanceView> for BalanceResponse {
    fn from(view: BalanceView) -> Self {
        Self {
            balance: view.balance,
            amount_hold: view.amount_hold,
            deposit: view.deposit,
            withdrew: view.withdrew,
            received: view.received,
            sent: view.sent,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub coin: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub remark: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferLineRequest {
    pub coin: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub remark: String,
}

#[derive(Debug, Deserialize)]
pub struct HoldRequest {
    pub coin: String,
    pub address: String,
    pub amount: Decimal,
    pub expiring: i64,
    pub purpose: String,
}

pub type DepositListResponse = Vec<Deposit>;
pub type WithdrawListResponse = Vec<Withdraw>;
pub type AddressListResponse = Vec<DepositAddress>;
pub type StatusResponse = CoinStatus;
