//! CryptoNote-family drivers: CN-REST (`TRTL-API`) speaks a plain REST
//! dialect; CN-SERVICE (`TRTL-SERVICE`, `BCN`) speaks JSON-RPC 2.0.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::json_rpc::{call_jsonrpc_2_0, field};
use crate::domain::entities::CoinSetting;
use crate::domain::services::{BackendError, Driver, DriverTransfer, MadeAddress, SendResult, TopBlock};

const STATUS_TIMEOUT: Duration = Duration::from_secs(30);
const SEND_TIMEOUT: Duration = Duration::from_secs(200);

/// `TRTL-API`: REST endpoints authenticated with `X-API-KEY`.
pub struct CnRestDriver {
    client: reqwest::Client,
    base_url: String,
    master_address: String,
    api_key: String,
    decimal: u32,
}

impl CnRestDriver {
    pub fn new(
        base_url: impl Into<String>,
        master_address: impl Into<String>,
        api_key: impl Into<String>,
        decimal: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            master_address: master_address.into(),
            api_key: api_key.into(),
            decimal,
        }
    }

    fn random_payment_id() -> String {
        let bytes: [u8; 32] = rand_bytes();
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

fn rand_bytes() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    let seed = uuid::Uuid::new_v4();
    let seed_bytes = seed.as_bytes();
    for (i, slot) in bytes.iter_mut().enumerate() {
        *slot = seed_bytes[i % seed_bytes.len()];
    }
    bytes
}

#[async_trait]
impl Driver for CnRestDriver {
    async fn top_block(&self) -> Result<TopBlock, BackendError> {
        let url = format!("{}/transactions/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BackendError::Unreachable(format!("http status {}", response.status())));
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        let height: i64 = field(&body, "height")?;
        Ok(TopBlock { height })
    }

    async fn make_address(
        &self,
        main_address: &str,
        extra: Option<&str>,
    ) -> Result<MadeAddress, BackendError> {
        let payment_id = extra.map(str::to_string).unwrap_or_else(Self::random_payment_id);
        let url = format!("{}/addresses/{}/{}", self.base_url, main_address, payment_id);
        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BackendError::Rejected(format!("http status {}", response.status())));
        }

        Ok(MadeAddress {
            address: self.master_address.clone(),
            extra: Some(payment_id),
            private_key: None,
        })
    }

    async fn list_transfers(
        &self,
        from_height: i64,
        to_height: i64,
    ) -> Result<Vec<DriverTransfer>, BackendError> {
        let url = format!("{}/transactions/{}/{}", self.base_url, from_height, to_height);
        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BackendError::Unreachable(format!("http status {}", response.status())));
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        let entries = body.as_array().cloned().unwrap_or_default();
        let mut transfers = Vec::new();
        for entry in entries {
            let txid: String = field(&entry, "hash")?;
            let height: i64 = field(&entry, "height")?;
            let amount_atomic: i64 = field(&entry, "amount")?;
            let payment_id: String = field(&entry, "paymentId").unwrap_or_default();
            transfers.push(DriverTransfer {
                txid,
                height,
                amount: Decimal::from(amount_atomic) / Decimal::from(10u64.pow(self.decimal)),
                payment_id_or_address: payment_id,
                block_hash: None,
            });
        }
        Ok(transfers)
    }

    async fn send_external(
        &self,
        _from: &str,
        to: &str,
        amount: Decimal,
        settings: &CoinSetting,
    ) -> Result<SendResult, BackendError> {
        let atomic_amount = (amount * Decimal::from(10u64.pow(settings.decimal)))
            .to_string()
            .parse::<i64>()
            .unwrap_or(0);

        let url = format!("{}/transactions/send/advanced", self.base_url);
        let body = serde_json::json!({
            "transfers": [{ "address": to, "amount": atomic_amount }],
            "anonymity": settings.mixin,
        });
        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BackendError::Rejected(format!("http status {}", response.status())));
        }
        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        let hash: String = field(&parsed, "transactionHash")?;
        Ok(SendResult { hash, key: None })
    }
}

/// `TRTL-SERVICE` and `BCN`: JSON-RPC 2.0 over a local wallet/daemon service.
pub struct CnServiceDriver {
    client: reqwest::Client,
    service_address: String,
    decimal: u32,
}

impl CnServiceDriver {
    pub fn new(service_address: impl Into<String>, decimal: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            service_address: service_address.into(),
            decimal,
        }
    }
}

#[async_trait]
impl Driver for CnServiceDriver {
    async fn top_block(&self) -> Result<TopBlock, BackendError> {
        let result = call_jsonrpc_2_0(
            &self.client,
            &self.service_address,
            "getblockcount",
            serde_json::json!({}),
            STATUS_TIMEOUT,
            None,
        )
        .await?;
        let height: i64 = field(&result, "count")?;
        Ok(TopBlock { height })
    }

    async fn make_address(
        &self,
        _main_address: &str,
        _extra: Option<&str>,
    ) -> Result<MadeAddress, BackendError> {
        let result = call_jsonrpc_2_0(
            &self.client,
            &self.service_address,
            "createAddress",
            serde_json::json!({}),
            STATUS_TIMEOUT,
            None,
        )
        .await?;
        let address: String = field(&result, "address")?;
        Ok(MadeAddress {
            address,
            extra: None,
            private_key: None,
        })
    }

    async fn list_transfers(
        &self,
        from_height: i64,
        to_height: i64,
    ) -> Result<Vec<DriverTransfer>, BackendError> {
        let result = call_jsonrpc_2_0(
            &self.client,
            &self.service_address,
            "get_transfers",
            serde_json::json!({ "firstBlockIndex": from_height, "blockCount": to_height - from_height }),
            STATUS_TIMEOUT,
            None,
        )
        .await?;

        let entries = result
            .get("transfers")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let mut transfers = Vec::new();
        for entry in entries {
            let txid: String = field(&entry, "transactionHash")?;
            let height: i64 = field(&entry, "blockIndex")?;
            let amount_atomic: i64 = field(&entry, "amount")?;
            let address: String = field(&entry, "address").unwrap_or_default();
            transfers.push(DriverTransfer {
                txid,
                height,
                amount: Decimal::from(amount_atomic) / Decimal::from(10u64.pow(self.decimal)),
                payment_id_or_address: address,
                block_hash: None,
            });
        }
        Ok(transfers)
    }

    async fn send_external(
        &self,
        _from: &str,
        to: &str,
        amount: Decimal,
        settings: &CoinSetting,
    ) -> Result<SendResult, BackendError> {
        let atomic_amount = (amount * Decimal::from(10u64.pow(settings.decimal)))
            .to_string()
            .parse::<i64>()
            .unwrap_or(0);

        let mut params = serde_json::json!({
            "transfers": [{ "address": to, "amount": atomic_amount }],
        });
        if settings.is_fee_per_byte {
            params["fee"] = serde_json::json!(0);
        } else {
            params["fee"] = serde_json::json!(settings.fee_withdraw);
            params["anonymity"] = serde_json::json!(settings.mixin);
        }

        let result = call_jsonrpc_2_0(
            &self.client,
            &self.service_address,
            "sendTransaction",
            params,
            SEND_TIMEOUT,
            None,
        )
        .await?;
        let hash: String = field(&result, "transactionHash")?;
        Ok(SendResult { hash, key: None })
    }
}
