//! Shared JSON-RPC plumbing used by the BTC-family and XMR-family drivers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::services::BackendError;

pub async fn call_jsonrpc_1_0(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Value,
    timeout: Duration,
) -> Result<Value, BackendError> {
    call_jsonrpc(client, url, "1.0", method, params, timeout, None).await
}

pub async fn call_jsonrpc_2_0(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Value,
    timeout: Duration,
    header: Option<(&str, &str)>,
) -> Result<Value, BackendError> {
    call_jsonrpc(client, url, "2.0", method, params, timeout, header).await
}

async fn call_jsonrpc(
    client: &reqwest::Client,
    url: &str,
    version: &str,
    method: &str,
    params: Value,
    timeout: Duration,
    header: Option<(&str, &str)>,
) -> Result<Value, BackendError> {
    let body = serde_json::json!({
        "jsonrpc": version,
        "id": uuid::Uuid::new_v4().to_string(),
        "method": method,
        "params": params,
    });

    let mut request = client.post(url).json(&body).timeout(timeout);
    if let Some((key, value)) = header {
        request = request.header(key, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| BackendError::Unreachable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(BackendError::Unreachable(format!(
            "http status {}",
            response.status()
        )));
    }

    let envelope: Value = response
        .json()
        .await
        .map_err(|e| BackendError::Unreachable(e.to_string()))?;

    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(BackendError::Rejected(error.to_string()));
    }

    envelope
        .get("result")
        .cloned()
        .ok_or_else(|| BackendError::Rejected("missing result field".into()))
}

pub fn field<T: DeserializeOwned>(value: &Value, field: &str) -> Result<T, BackendError> {
    value
        .get(field)
        .cloned()
        .ok_or_else(|| BackendError::Rejected(format!("missing field {field}")))
        .and_then(|v| serde_json::from_value(v).map_err(|e| BackendError::Rejected(e.to_string())))
}
