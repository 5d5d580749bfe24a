//! End-to-end tests against the REST surface (C6), driven through the
//! router directly with `tower::ServiceExt::oneshot` rather than a bound
//! socket.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use coin_gateway::application::ports::{AddressWriter, DriverLookup};
use coin_gateway::domain::entities::{ApiUser, CoinSetting, DepositAddress};
use coin_gateway::domain::services::{
    BackendError, Driver, FixedClock, MadeAddress, SendResult, TopBlock,
};
use coin_gateway::domain::value_objects::CoinType;
use coin_gateway::infrastructure::cache::TtlCache;
use coin_gateway::infrastructure::ledger::{
    InMemoryApiUserRepository, InMemoryCoinSettingsRepository, InMemoryLedgerStore,
};
use coin_gateway::infrastructure::reconciler::Reconciler;
use coin_gateway::infrastructure::registry::ArcSwapAddressRegistry;
use coin_gateway::infrastructure::webhook::{DiscordWebhookNotifier, InMemoryAuditLog};
use coin_gateway::presentation::rest::{create_router, AppState};

/// A driver double that never touches the network: `make_address` hands
/// back a deterministic address, `send_external` a deterministic hash.
struct FakeDriver;

#[async_trait]
impl Driver for FakeDriver {
    async fn top_block(&self) -> Result<TopBlock, BackendError> {
        Ok(TopBlock { height: 106 })
    }

    async fn make_address(
        &self,
        _main_address: &str,
        _extra: Option<&str>,
    ) -> Result<MadeAddress, BackendError> {
        Ok(MadeAddress {
            address: format!("fake-addr-{}", uuid::Uuid::new_v4()),
            extra: None,
            private_key: None,
        })
    }

    async fn list_transfers(
        &self,
        _from_height: i64,
        _to_height: i64,
    ) -> Result<Vec<coin_gateway::domain::services::DriverTransfer>, BackendError> {
        Ok(Vec::new())
    }

    async fn send_external(
        &self,
        _from: &str,
        _to: &str,
        _amount: Decimal,
        _settings: &CoinSetting,
    ) -> Result<SendResult, BackendError> {
        Ok(SendResult {
            hash: format!("fake-tx-{}", uuid::Uuid::new_v4()),
            key: None,
        })
    }
}

struct FakeDriverLookup;

#[async_trait]
impl DriverLookup for FakeDriverLookup {
    async fn driver_for(&self, coin_name: &str) -> Option<Arc<dyn Driver>> {
        if coin_name.is_empty() {
            None
        } else {
            Some(Arc::new(FakeDriver))
        }
    }
}

fn btc_setting() -> CoinSetting {
    CoinSetting {
        coin_name: "BTC".to_string(),
        coin_type: CoinType::Btc,
        enabled: true,
        enable_create: true,
        enable_deposit: true,
        enable_withdraw: true,
        daemon_address: "http://127.0.0.1:8332".to_string(),
        wallet_address: String::new(),
        wallet_header: String::new(),
        main_address: "btc-main".to_string(),
        decimal: 8,
        confirmation_depth: 6,
        min_deposit: dec!(0.0001),
        min_transfer: dec!(0.0001),
        max_transfer: dec!(100),
        min_withdraw: dec!(0.0001),
        max_withdraw: dec!(10),
        fee_withdraw: dec!(0.0001),
        mixin: 0,
        is_fee_per_byte: false,
        has_pos: false,
        round_places: 8,
        chain_height: 0,
        chain_height_set_time: None,
        use_getinfo_btc: false,
    }
}

/// A harness bundling the concrete stores plus a ready-made router, so
/// individual tests can reach behind the HTTP surface (e.g. to seed an
/// address or run a reconciler pass) without re-wiring everything.
struct Harness {
    ledger: Arc<InMemoryLedgerStore>,
    coin_settings: Arc<InMemoryCoinSettingsRepository>,
    registry: Arc<ArcSwapAddressRegistry>,
    reconciler: Arc<Reconciler<FixedClock>>,
    app: axum::Router,
}

fn build_harness(coins: Vec<CoinSetting>, users: Vec<ApiUser>) -> Harness {
    let clock = Arc::new(FixedClock::new(chrono::Utc::now()));
    let ledger = Arc::new(InMemoryLedgerStore::new());
    let coin_settings = Arc::new(InMemoryCoinSettingsRepository::seed(coins));
    let api_users = Arc::new(InMemoryApiUserRepository::seed(users));
    let cache = Arc::new(TtlCache::new());
    let registry = Arc::new(ArcSwapAddressRegistry::new(
        ledger.clone() as Arc<dyn coin_gateway::application::ports::AddressReader>
    ));
    let drivers: Arc<dyn DriverLookup> = Arc::new(FakeDriverLookup);
    let webhook = Arc::new(DiscordWebhookNotifier::new(None));
    let audit = Arc::new(InMemoryAuditLog::new());

    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&clock),
        coin_settings.clone() as Arc<dyn coin_gateway::application::ports::CoinSettingsRepository>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::AddressRepository>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::DepositRepository>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::HoldRepository>,
        cache.clone() as Arc<dyn coin_gateway::application::ports::Cache>,
        Arc::clone(&drivers),
        webhook.clone() as Arc<dyn coin_gateway::application::ports::WebhookNotifier>,
    ));

    let state = Arc::new(AppState::new(
        clock,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::AddressRepository>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::AddressReader>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::DepositRepository>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::DepositReader>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::DepositWriter>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::WithdrawRepository>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::WithdrawReader>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::TransferRepository>,
        ledger.clone() as Arc<dyn coin_gateway::application::ports::HoldRepository>,
        coin_settings.clone() as Arc<dyn coin_gateway::application::ports::CoinSettingsRepository>,
        api_users as Arc<dyn coin_gateway::application::ports::ApiUserRepository>,
        cache as Arc<dyn coin_gateway::application::ports::Cache>,
        registry.clone() as Arc<dyn coin_gateway::application::ports::AddressRegistry>,
        drivers as Arc<dyn DriverLookup>,
        webhook as Arc<dyn coin_gateway::application::ports::WebhookNotifier>,
        audit as Arc<dyn coin_gateway::application::ports::AuditLog>,
        "master-secret".to_string(),
    ));

    Harness {
        ledger,
        coin_settings,
        registry,
        reconciler,
        app: create_router(state),
    }
}

fn user_for(coins: &[&str]) -> ApiUser {
    ApiUser::new(
        "test-key",
        coins.iter().map(|c| c.to_string()).collect::<HashSet<_>>(),
    )
}

async fn post(app: &axum::Router, uri: &str, key: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri).header("Content-Type", "application/json");
    if let Some(key) = key {
        builder = builder.header("Authorization", key);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &axum::Router, uri: &str, key: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = key {
        builder = builder.header("Authorization", key);
    }
    let response = app.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---------------------------------------------------------------------------
// Scenario 1: unknown coin
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_coin_is_rejected() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let (status, body) = post(
        &harness.app,
        "/balance",
        Some("test-key"),
        json!({ "coin": "ZZZ", "address": "a" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["message"], json!("coin ZZZ not in the supported list!"));
}

// ---------------------------------------------------------------------------
// Scenario 2: missing Authorization header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_auth_header_is_rejected() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let (status, body) = post(
        &harness.app,
        "/newaddress",
        None,
        json!({ "coin": "BTC", "tag": "t" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().to_lowercase().contains("authorization"));
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let (_, body) = post(
        &harness.app,
        "/newaddress",
        Some("not-the-right-key"),
        json!({ "coin": "BTC", "tag": "t" }),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().to_lowercase().contains("key"));
}

#[tokio::test]
async fn suspended_key_is_rejected() {
    let mut user = user_for(&["BTC"]);
    user.is_suspended = true;
    let harness = build_harness(vec![btc_setting()], vec![user]);

    let (_, body) = post(
        &harness.app,
        "/newaddress",
        Some("test-key"),
        json!({ "coin": "BTC", "tag": "t" }),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().to_lowercase().contains("suspend"));
}

#[tokio::test]
async fn coin_not_allowed_for_key_is_rejected() {
    let harness = build_harness(
        vec![btc_setting()],
        vec![user_for(&["XMR"])],
    );

    let (_, body) = post(
        &harness.app,
        "/newaddress",
        Some("test-key"),
        json!({ "coin": "BTC", "tag": "t" }),
    )
    .await;

    assert_eq!(body["success"], json!(false));
}

// ---------------------------------------------------------------------------
// Scenario 3: withdraw to an internal (registry-known) address is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn withdraw_to_internal_address_is_rejected() {
    let user = user_for(&["BTC"]);
    let api_id = user.id.as_uuid();
    let harness = build_harness(vec![btc_setting()], vec![user]);

    let mut from = DepositAddress::new(api_id, "BTC", "addr-a", "tag-a", chrono::Utc::now());
    from.credit_deposit(dec!(5));
    let to = DepositAddress::new(uuid::Uuid::new_v4(), "BTC", "addr-b", "tag-b", chrono::Utc::now());

    AddressWriter::save(&*harness.ledger, from).await;
    AddressWriter::save(&*harness.ledger, to).await;
    harness.registry.refresh().await;

    let (_, body) = post(
        &harness.app,
        "/withdraw",
        Some("test-key"),
        json!({
            "coin": "BTC",
            "from_address": "addr-a",
            "to_address": "addr-b",
            "amount": "1.0",
            "remark": ""
        }),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("BTC, you can not send to address addr-b. You might need to call /transfer instead")
    );
}

#[tokio::test]
async fn withdraw_to_external_address_succeeds() {
    let user = user_for(&["BTC"]);
    let api_id = user.id.as_uuid();
    let harness = build_harness(vec![btc_setting()], vec![user]);

    let mut from = DepositAddress::new(api_id, "BTC", "addr-a", "tag-a", chrono::Utc::now());
    from.credit_deposit(dec!(5));
    AddressWriter::save(&*harness.ledger, from).await;
    harness.registry.refresh().await;

    let (_, body) = post(
        &harness.app,
        "/withdraw",
        Some("test-key"),
        json!({
            "coin": "BTC",
            "from_address": "addr-a",
            "to_address": "external-wallet",
            "amount": "1.0",
            "remark": ""
        }),
    )
    .await;

    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["txid"].as_str().unwrap().starts_with("fake-tx-"));

    let (_, balance) = post(
        &harness.app,
        "/balance",
        Some("test-key"),
        json!({ "coin": "BTC", "address": "addr-a" }),
    )
    .await;
    assert_eq!(balance["data"]["balance"], json!("3.99990000"));
}

// ---------------------------------------------------------------------------
// Scenario 4: a transfer batch containing a loop is rejected wholesale
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transfer_batch_with_a_loop_is_rejected() {
    let user = user_for(&["BTC"]);
    let api_id = user.id.as_uuid();
    let harness = build_harness(vec![btc_setting()], vec![user]);

    let mut a = DepositAddress::new(api_id, "BTC", "addr-a", "tag-a", chrono::Utc::now());
    a.credit_deposit(dec!(10));
    let a_id = a.id;
    let mut b = DepositAddress::new(api_id, "BTC", "addr-b", "tag-b", chrono::Utc::now());
    b.credit_deposit(dec!(10));
    AddressWriter::save(&*harness.ledger, a).await;
    AddressWriter::save(&*harness.ledger, b).await;
    harness.registry.refresh().await;

    let (_, body) = post(
        &harness.app,
        "/transfer",
        Some("test-key"),
        json!([
            { "coin": "BTC", "from_address": "addr-a", "to_address": "addr-b", "amount": "1", "remark": "" },
            { "coin": "BTC", "from_address": "addr-b", "to_address": "addr-a", "amount": "1", "remark": "" },
        ]),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("there is one or more error(s)!"));
    assert_eq!(body["data"], json!(["BTC, loop transfer detected."]));

    // No transfer rows should have been committed for the rejected batch.
    let transfers = coin_gateway::application::ports::TransferReader::list_by_address(
        &*harness.ledger,
        &a_id,
    )
    .await;
    assert!(transfers.is_empty());
}

#[tokio::test]
async fn transfer_batch_without_a_loop_succeeds() {
    let user = user_for(&["BTC"]);
    let api_id = user.id.as_uuid();
    let harness = build_harness(vec![btc_setting()], vec![user]);

    let mut a = DepositAddress::new(api_id, "BTC", "addr-a", "tag-a", chrono::Utc::now());
    a.credit_deposit(dec!(10));
    let b = DepositAddress::new(api_id, "BTC", "addr-b", "tag-b", chrono::Utc::now());
    AddressWriter::save(&*harness.ledger, a).await;
    AddressWriter::save(&*harness.ledger, b).await;
    harness.registry.refresh().await;

    let (_, body) = post(
        &harness.app,
        "/transfer",
        Some("test-key"),
        json!([
            { "coin": "BTC", "from_address": "addr-a", "to_address": "addr-b", "amount": "1", "remark": "" },
        ]),
    )
    .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["processed"], json!(1));
}

// ---------------------------------------------------------------------------
// Scenario 5: idempotent address issuance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn issuing_the_same_tag_twice_reuses_the_address() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let (_, first) = post(
        &harness.app,
        "/newaddress",
        Some("test-key"),
        json!({ "coin": "BTC", "tag": "t1" }),
    )
    .await;
    assert_eq!(first["success"], json!(true));
    let address = first["data"].as_str().unwrap().to_string();

    let (_, second) = post(
        &harness.app,
        "/newaddress",
        Some("test-key"),
        json!({ "coin": "BTC", "tag": "t1" }),
    )
    .await;

    assert_eq!(second["success"], json!(true));
    assert_eq!(second["data"].as_str().unwrap(), address);
    assert!(second["message"].as_str().unwrap().contains("already issued"));
}

#[tokio::test]
async fn second_tag_is_backfilled_on_reuse() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    post(&harness.app, "/newaddress", Some("test-key"), json!({ "coin": "BTC", "tag": "t1" })).await;

    let (_, second) = post(
        &harness.app,
        "/newaddress",
        Some("test-key"),
        json!({ "coin": "BTC", "tag": "t1", "second_tag": "memo-1" }),
    )
    .await;

    assert_eq!(second["second_tag"], json!("memo-1"));
}

// ---------------------------------------------------------------------------
// Scenario 6: deposit promotion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn promote_confirmed_credits_the_owning_address_once_depth_is_met() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let owner = DepositAddress::new(uuid::Uuid::new_v4(), "BTC", "addr-a", "tag-a", chrono::Utc::now());
    let owner_id = owner.id;
    AddressWriter::save(&*harness.ledger, owner).await;
    harness.registry.refresh().await;

    let deposit = coin_gateway::domain::entities::Deposit::new(
        "BTC",
        uuid::Uuid::new_v4(),
        owner_id,
        "txid-1",
        "addr-a",
        None,
        100,
        dec!(2.5),
        0,
        chrono::Utc::now(),
    );
    coin_gateway::application::ports::DepositWriter::save(&*harness.ledger, deposit).await;

    // Not yet at depth: tip 100, confirmation_depth 6.
    harness.reconciler.promote_confirmed("BTC").await;
    let unpromoted = coin_gateway::application::ports::DepositReader::list_unpromoted(
        &*harness.ledger,
        "BTC",
    )
    .await;
    assert_eq!(unpromoted.len(), 1);

    // Advance the tip to 106 and rerun: depth of 6 is now met.
    harness.coin_settings.record_tip("BTC", 106, chrono::Utc::now()).await;
    harness.reconciler.promote_confirmed("BTC").await;

    let unpromoted = coin_gateway::application::ports::DepositReader::list_unpromoted(
        &*harness.ledger,
        "BTC",
    )
    .await;
    assert!(unpromoted.is_empty());

    let address = coin_gateway::application::ports::AddressReader::get(&*harness.ledger, &owner_id)
        .await
        .unwrap();
    assert_eq!(address.total_deposited, dec!(2.5));
}

// ---------------------------------------------------------------------------
// Other coverage: hold, list endpoints, status, reload, noted
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hold_reduces_available_balance() {
    let user = user_for(&["BTC"]);
    let api_id = user.id.as_uuid();
    let harness = build_harness(vec![btc_setting()], vec![user]);

    let mut addr = DepositAddress::new(api_id, "BTC", "addr-a", "tag-a", chrono::Utc::now());
    addr.credit_deposit(dec!(5));
    AddressWriter::save(&*harness.ledger, addr).await;
    harness.registry.refresh().await;

    let (_, body) = post(
        &harness.app,
        "/hold_alance",
        Some("test-key"),
        json!({ "coin": "BTC", "address": "addr-a", "amount": "2", "expiring": 60, "purpose": "kyc review" }),
    )
    .await;
    assert_eq!(body["success"], json!(true));

    let (_, balance) = post(
        &harness.app,
        "/balance",
        Some("test-key"),
        json!({ "coin": "BTC", "address": "addr-a" }),
    )
    .await;
    assert_eq!(balance["data"]["balance"], json!("3.00000000"));
    assert_eq!(balance["data"]["amount_hold"], json!("2.00000000"));
}

#[tokio::test]
async fn hold_on_address_not_owned_is_forbidden() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let other_owner = DepositAddress::new(uuid::Uuid::new_v4(), "BTC", "addr-a", "tag-a", chrono::Utc::now());
    AddressWriter::save(&*harness.ledger, other_owner).await;
    harness.registry.refresh().await;

    let (_, body) = post(
        &harness.app,
        "/hold_alance",
        Some("test-key"),
        json!({ "coin": "BTC", "address": "addr-a", "amount": "1", "expiring": 60, "purpose": "x" }),
    )
    .await;

    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn list_address_only_returns_caller_owned_rows() {
    let mine = user_for(&["BTC"]);
    let mine_id = mine.id.as_uuid();
    let harness = build_harness(vec![btc_setting()], vec![mine]);

    let owned = DepositAddress::new(mine_id, "BTC", "addr-mine", "tag-mine", chrono::Utc::now());
    let not_owned = DepositAddress::new(uuid::Uuid::new_v4(), "BTC", "addr-other", "tag-other", chrono::Utc::now());
    AddressWriter::save(&*harness.ledger, owned).await;
    AddressWriter::save(&*harness.ledger, not_owned).await;
    harness.registry.refresh().await;

    let (_, body) = get(&harness.app, "/list_address/BTC", Some("test-key")).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["address"], json!("addr-mine"));
}

#[tokio::test]
async fn noted_acknowledges_existing_deposit_and_tolerates_unknown_tx() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let owner = DepositAddress::new(uuid::Uuid::new_v4(), "BTC", "addr-a", "tag-a", chrono::Utc::now());
    let owner_id = owner.id;
    AddressWriter::save(&*harness.ledger, owner).await;

    let deposit = coin_gateway::domain::entities::Deposit::new(
        "BTC",
        uuid::Uuid::new_v4(),
        owner_id,
        "txid-1",
        "addr-a",
        None,
        100,
        dec!(1),
        6,
        chrono::Utc::now(),
    );
    coin_gateway::application::ports::DepositWriter::save(&*harness.ledger, deposit).await;

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/noted/BTC/txid-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!(true));

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/noted/BTC/no-such-tx")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!(false));
}

#[tokio::test]
async fn status_endpoints_are_public() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let (status, body) = get(&harness.app, "/status/BTC", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, body) = get(&harness.app, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reload_requires_the_master_key() {
    let harness = build_harness(vec![btc_setting()], vec![user_for(&["BTC"])]);

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reload")
                .header("Authorization", "not-the-master-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(false));

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reload")
                .header("Authorization", "master-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(true));
}
