//! One handler per endpoint of C6. Each builds the use case it needs from
//! `AppState` fields, runs the shared resolution steps, and records an
//! audit entry before returning.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::application::use_cases::{
    GetBalanceQuery, GetBalanceUseCase, HoldBalanceCommand, HoldBalanceUseCase,
    IssueAddressCommand, IssueAddressUseCase, ListQueriesUseCase, NoteDepositUseCase,
    StatusUseCase, TransferCommand, TransferLine, TransferUseCase, WithdrawCommand,
    WithdrawUseCase,
};
use crate::domain::entities::{ApiFailedLog, ApiLog, ApiUser};
use crate::domain::services::Clock;

use super::dto::{
    AddressListResponse, BalanceRequest, BalanceResponse, DepositListResponse, Envelope,
    HoldRequest, NewAddressEnvelope, NewAddressRequest, StatusResponse, TransferLineRequest,
    WithdrawListResponse, WithdrawRequest,
};
use super::error::GatewayError;
use super::router::AppState;

/// Steps 1-3 shared by every coin-scoped, API-key-authorized endpoint:
/// cold-start check, unsupported-coin check, credential lookup.
async fn authorize<C: Clock>(
    state: &AppState<C>,
    headers: &HeaderMap,
    coin_name: &str,
) -> Result<ApiUser, GatewayError> {
    let coin_list = state.coin_settings.all().await;
    if coin_list.is_empty() {
        return Err(GatewayError::ColdStart);
    }
    if !coin_list.iter().any(|c| c.coin_name == coin_name) {
        return Err(GatewayError::UnsupportedCoin(coin_name.to_string()));
    }

    let api_key = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(GatewayError::MissingAuth)?;
    let user = state
        .api_users
        .get_by_api_key(api_key)
        .await
        .ok_or(GatewayError::WrongKey)?;
    if user.is_suspended {
        return Err(GatewayError::Suspended);
    }
    if !user.allows(coin_name) {
        return Err(GatewayError::CoinNotAllowed);
    }
    Ok(user)
}

async fn log_success<C: Clock>(state: &AppState<C>, api_id: Option<uuid::Uuid>, method: &str, data: String, result: &str) {
    state
        .audit
        .record_success(ApiLog {
            api_id,
            method: method.to_string(),
            data,
            result: result.to_string(),
            time: state.clock.now(),
        })
        .await;
}

async fn log_failure<C: Clock>(state: &AppState<C>, api_id: Option<uuid::Uuid>, method: &str, data: String, result: &str) {
    state
        .audit
        .record_failure(ApiFailedLog {
            api_id,
            method: method.to_string(),
            data,
            result: result.to_string(),
            time: state.clock.now(),
        })
        .await;
}

pub async fn new_address<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Json(req): Json<NewAddressRequest>,
) -> Json<NewAddressEnvelope> {
    let now = state.clock.now_epoch_secs();
    let user = match authorize(&state, &headers, &req.coin).await {
        Ok(user) => user,
        Err(err) => {
            log_failure(&state, None, "newaddress", req.coin.clone(), &err.to_string()).await;
            return Json(NewAddressEnvelope::error(err.to_string(), now));
        }
    };

    let use_case = IssueAddressUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.addresses),
        Arc::clone(&state.coin_settings),
        Arc::clone(&state.registry),
        Arc::clone(&state.drivers),
    );
    let cmd = IssueAddressCommand {
        api_id: user.id.as_uuid(),
        coin_name: req.coin.clone(),
        tag: req.tag.clone(),
        second_tag: req.second_tag.clone(),
    };

    match use_case.execute(cmd).await {
        Ok(result) => {
            let message = if result.reused { "address already issued." } else { "address issued." };
            log_success(&state, Some(user.id.as_uuid()), "newaddress", req.coin.clone(), message).await;
            Json(NewAddressEnvelope::ok(&result.address, message, now))
        }
        Err(err) => {
            log_failure(&state, Some(user.id.as_uuid()), "newaddress", req.coin.clone(), &err.to_string()).await;
            Json(NewAddressEnvelope::error(err.to_string(), now))
        }
    }
}

pub async fn balance<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Json(req): Json<BalanceRequest>,
) -> Json<Envelope<BalanceResponse>> {
    let now = state.clock.now_epoch_secs();
    let user = match authorize(&state, &headers, &req.coin).await {
        Ok(user) => user,
        Err(err) => {
            log_failure(&state, None, "balance", req.coin.clone(), &err.to_string()).await;
            return Json(Envelope::error(err.to_string(), now));
        }
    };

    let use_case = GetBalanceUseCase::new(Arc::clone(&state.registry), Arc::clone(&state.coin_settings));
    let query = GetBalanceQuery {
        api_id: user.id.as_uuid(),
        coin_name: req.coin.clone(),
        address: req.address.clone(),
    };

    match use_case.execute(query).await {
        Ok(view) => {
            log_success(&state, Some(user.id.as_uuid()), "balance", req.address.clone(), "ok").await;
            Json(Envelope::ok(BalanceResponse::from(view), now))
        }
        Err(err) => {
            log_failure(&state, Some(user.id.as_uuid()), "balance", req.address.clone(), &err.to_string()).await;
            Json(Envelope::error(err.to_string(), now))
        }
    }
}

pub async fn withdraw<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Json(req): Json<WithdrawRequest>,
) -> Json<Envelope<serde_json::Value>> {
    let now = state.clock.now_epoch_secs();
    let user = match authorize(&state, &headers, &req.coin).await {
        Ok(user) => user,
        Err(err) => {
            log_failure(&state, None, "withdraw", req.coin.clone(), &err.to_string()).await;
            return Json(Envelope::error(err.to_string(), now));
        }
    };

    let use_case = WithdrawUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.addresses),
        Arc::clone(&state.withdraws),
        Arc::clone(&state.coin_settings),
        Arc::clone(&state.registry),
        Arc::clone(&state.drivers),
        Arc::clone(&state.webhook),
    );
    let cmd = WithdrawCommand {
        api_id: user.id.as_uuid(),
        coin_name: req.coin.clone(),
        from_address: req.from_address.clone(),
        to_address: req.to_address.clone(),
        amount: req.amount,
        remark: req.remark.clone(),
    };

    match use_case.execute(cmd).await {
        Ok(result) => {
            log_success(&state, Some(user.id.as_uuid()), "withdraw", req.from_address.clone(), &result.txid).await;
            Json(Envelope::ok(
                serde_json::json!({ "txid": result.txid, "ref_uuid": result.ref_uuid }),
                now,
            ))
        }
        Err(err) => {
            log_failure(&state, Some(user.id.as_uuid()), "withdraw", req.from_address.clone(), &err.to_string()).await;
            Json(Envelope::error(err.to_string(), now))
        }
    }
}

pub async fn transfer<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Json(lines): Json<Vec<TransferLineRequest>>,
) -> Json<Envelope<serde_json::Value>> {
    let now = state.clock.now_epoch_secs();
    let coin = lines.first().map(|l| l.coin.clone()).unwrap_or_default();
    let user = match authorize(&state, &headers, &coin).await {
        Ok(user) => user,
        Err(err) => {
            log_failure(&state, None, "transfer", coin.clone(), &err.to_string()).await;
            return Json(Envelope::error(err.to_string(), now));
        }
    };

    let use_case = TransferUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.addresses),
        Arc::clone(&state.transfers),
        Arc::clone(&state.coin_settings),
        Arc::clone(&state.registry),
    );
    let cmd = TransferCommand {
        api_id: user.id.as_uuid(),
        lines: lines
            .into_iter()
            .map(|l| TransferLine {
                coin_name: l.coin,
                from_address: l.from_address,
                to_address: l.to_address,
                amount: l.amount,
                remark: l.remark,
            })
            .collect(),
    };

    match use_case.execute(cmd).await {
        Ok(result) => {
            log_success(&state, Some(user.id.as_uuid()), "transfer", coin.clone(), &result.ref_uuid).await;
            Json(Envelope::ok(
                serde_json::json!({ "ref_uuid": result.ref_uuid, "processed": result.processed }),
                now,
            ))
        }
        Err(errors) => {
            let error_list: Vec<String> = errors.iter().map(|e| e.display()).collect();
            log_failure(&state, Some(user.id.as_uuid()), "transfer", coin.clone(), &error_list.join("; ")).await;
            Json(Envelope::error_with_data(
                serde_json::json!(error_list),
                "there is one or more error(s)!",
                now,
            ))
        }
    }
}

pub async fn hold_balance<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Json(req): Json<HoldRequest>,
) -> Json<Envelope<serde_json::Value>> {
    let now = state.clock.now_epoch_secs();
    let user = match authorize(&state, &headers, &req.coin).await {
        Ok(user) => user,
        Err(err) => {
            log_failure(&state, None, "hold_alance", req.coin.clone(), &err.to_string()).await;
            return Json(Envelope::error(err.to_string(), now));
        }
    };

    let use_case = HoldBalanceUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.addresses),
        Arc::clone(&state.holds),
        Arc::clone(&state.coin_settings),
        Arc::clone(&state.registry),
        Arc::clone(&state.webhook),
    );
    let cmd = HoldBalanceCommand {
        api_id: user.id.as_uuid(),
        coin_name: req.coin.clone(),
        address: req.address.clone(),
        amount: req.amount,
        expiring_secs: req.expiring,
        purpose: req.purpose.clone(),
    };

    match use_case.execute(cmd).await {
        Ok(hold) => {
            log_success(&state, Some(user.id.as_uuid()), "hold_alance", req.address.clone(), "held").await;
            Json(Envelope::ok(serde_json::json!({ "hold_id": hold.id.as_uuid() }), now))
        }
        Err(err) => {
            log_failure(&state, Some(user.id.as_uuid()), "hold_alance", req.address.clone(), &err.to_string()).await;
            Json(Envelope::error(err.to_string(), now))
        }
    }
}

fn list_use_case<C: Clock>(state: &AppState<C>) -> ListQueriesUseCase {
    ListQueriesUseCase::new(
        Arc::clone(&state.address_reader),
        Arc::clone(&state.deposit_reader),
        Arc::clone(&state.withdraw_reader),
        Arc::clone(&state.registry),
    )
}

pub async fn list_transactions<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(coin): Path<String>,
) -> Json<Envelope<DepositListResponse>> {
    list_transactions_inner(state, headers, coin, None).await
}

pub async fn list_transactions_for_address<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path((coin, address)): Path<(String, String)>,
) -> Json<Envelope<DepositListResponse>> {
    list_transactions_inner(state, headers, coin, Some(address)).await
}

async fn list_transactions_inner<C: Clock + 'static>(
    state: Arc<AppState<C>>,
    headers: HeaderMap,
    coin: String,
    address: Option<String>,
) -> Json<Envelope<DepositListResponse>> {
    let now = state.clock.now_epoch_secs();
    let user = match authorize(&state, &headers, &coin).await {
        Ok(user) => user,
        Err(err) => return Json(Envelope::error(err.to_string(), now)),
    };

    let use_case = list_use_case(&state);
    match use_case.list_transactions(user.id.as_uuid(), &coin, address.as_deref()).await {
        Ok(deposits) => Json(Envelope::ok(deposits, now)),
        Err(err) => Json(Envelope::error(err.to_string(), now)),
    }
}

pub async fn list_withdraws<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(coin): Path<String>,
) -> Json<Envelope<WithdrawListResponse>> {
    list_withdraws_inner(state, headers, coin, None).await
}

pub async fn list_withdraws_for_address<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path((coin, address)): Path<(String, String)>,
) -> Json<Envelope<WithdrawListResponse>> {
    list_withdraws_inner(state, headers, coin, Some(address)).await
}

async fn list_withdraws_inner<C: Clock + 'static>(
    state: Arc<AppState<C>>,
    headers: HeaderMap,
    coin: String,
    address: Option<String>,
) -> Json<Envelope<WithdrawListResponse>> {
    let now = state.clock.now_epoch_secs();
    let user = match authorize(&state, &headers, &coin).await {
        Ok(user) => user,
        Err(err) => return Json(Envelope::error(err.to_string(), now)),
    };

    let use_case = list_use_case(&state);
    match use_case.list_withdraws(user.id.as_uuid(), &coin, address.as_deref()).await {
        Ok(withdraws) => Json(Envelope::ok(withdraws, now)),
        Err(err) => Json(Envelope::error(err.to_string(), now)),
    }
}

pub async fn list_address<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    Path(coin): Path<String>,
) -> Json<Envelope<AddressListResponse>> {
    let now = state.clock.now_epoch_secs();
    let user = match authorize(&state, &headers, &coin).await {
        Ok(user) => user,
        Err(err) => return Json(Envelope::error(err.to_string(), now)),
    };

    let use_case = list_use_case(&state);
    let addresses = use_case.list_address(user.id.as_uuid(), &coin).await;
    Json(Envelope::ok(addresses, now))
}

pub async fn noted<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path((coin, tx)): Path<(String, String)>,
) -> Json<Envelope<bool>> {
    let now = state.clock.now_epoch_secs();
    let use_case = NoteDepositUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.deposit_reader),
        Arc::clone(&state.deposit_writer),
    );
    let found = use_case.execute(&coin, &tx).await;
    if found {
        Json(Envelope::ok(true, now))
    } else {
        Json(Envelope::ok_with_message(Some(false), "no such transaction.", now))
    }
}

pub async fn status_one<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(coin): Path<String>,
) -> Json<Envelope<StatusResponse>> {
    let now = state.clock.now_epoch_secs();
    let use_case = StatusUseCase::new(Arc::clone(&state.coin_settings), Arc::clone(&state.cache));
    match use_case.status_one(&coin).await {
        Some(status) => Json(Envelope::ok(status, now)),
        None => Json(Envelope::error("coin not in the supported list!", now)),
    }
}

pub async fn status_all<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<Envelope<Vec<StatusResponse>>> {
    let now = state.clock.now_epoch_secs();
    let use_case = StatusUseCase::new(Arc::clone(&state.coin_settings), Arc::clone(&state.cache));
    Json(Envelope::ok(use_case.status_all().await, now))
}

pub async fn reload<C: Clock + 'static>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
) -> Json<Envelope<()>> {
    let now = state.clock.now_epoch_secs();
    let provided = headers.get("Authorization").and_then(|v| v.to_str().ok());
    if provided != Some(state.master_key.as_str()) {
        return Json(Envelope::error("wrong API key!", now));
    }

    let settings = state.coin_settings.all().await;
    state.coin_settings.reload(settings).await;
    state.registry.refresh().await;
    Json(Envelope::ok_with_message(None, "reloaded.", now))
}
