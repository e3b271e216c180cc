use actix_web::{http::StatusCode, web, web::ServiceConfig};
use markio_engine::{
    db_types::{Cents, NewPayout, PayoutStatusType, Role},
    events::EventProducers,
    traits::{ExternalBalance, GatewayBankAccount, GatewayError, GatewayPayoutStatus, LedgerError},
    WithdrawalApi,
};
use serde_json::Value;

use super::{
    helpers::{gateway_payout, issue_token, payout_transaction, post_request, stored_payout, vendor},
    mocks::{MockGateway, MockPayoutDb},
};
use crate::routes::WithdrawRoute;

const USER_ID: i64 = 7;

fn register(db: MockPayoutDb, gateway: MockGateway, cfg: &mut ServiceConfig) {
    let api = WithdrawalApi::new(db, gateway, 10, EventProducers::default());
    cfg.service(WithdrawRoute::<MockPayoutDb, MockGateway>::new()).app_data(web::Data::new(api));
}

/// A vendor with `ledger` cents of completed earnings and `external` cents at the processor.
fn funded_vendor(ledger: i64, external: i64) -> (MockPayoutDb, MockGateway) {
    let mut db = MockPayoutDb::new();
    db.expect_fetch_vendor_for_user().returning(|user_id| Ok(Some(vendor(1, user_id, Some("acct_1")))));
    db.expect_completed_earnings().returning(move |_| Ok(Some(Cents::from(ledger))));
    let mut gateway = MockGateway::new();
    gateway
        .expect_retrieve_balance()
        .returning(move |_| Ok(Some(ExternalBalance { amount: Cents::from(external), currency: "eur".into() })));
    gateway
        .expect_retrieve_bank_accounts()
        .returning(|_| Ok(vec![GatewayBankAccount { id: "ba_1".into(), currency: "eur".into() }]));
    (db, gateway)
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("Response was not JSON")
}

#[actix_web::test]
async fn withdraw_without_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("", "/withdraw", r#"{"amount": "25.00"}"#, configure_unused).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json(&body)["error"].as_str().unwrap().contains("No bearer token"));
}

#[actix_web::test]
async fn withdraw_as_customer_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Customer]);
    let (status, _) = post_request(&token, "/withdraw", r#"{"amount": "25.00"}"#, configure_unused).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn withdraw_with_tampered_token() {
    let _ = env_logger::try_init().ok();
    let mut token = issue_token(USER_ID, &[Role::Vendor]);
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let (status, _) = post_request(&token, "/withdraw", r#"{"amount": "25.00"}"#, configure_unused).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn configure_unused(cfg: &mut ServiceConfig) {
    register(MockPayoutDb::new(), MockGateway::new(), cfg);
}

#[actix_web::test]
async fn withdraw_success() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amount": "25.00"}"#, configure_success).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["status"], "success");
    assert_eq!(body["payout"]["amount"], 2500);
    assert_eq!(body["payout"]["fee"], 250);
    assert_eq!(body["payout"]["status"], "omw");
    assert_eq!(body["payout"]["stripe_id"], "po_1");
}

fn configure_success(cfg: &mut ServiceConfig) {
    let (mut db, mut gateway) = funded_vendor(10_000, 10_000);
    gateway
        .expect_create_payout()
        .withf(|amount, currency, account| *amount == Cents::from(2500) && currency == "eur" && account == "acct_1")
        .times(1)
        .returning(|amount, _, _| Ok(gateway_payout("po_1", amount.value(), GatewayPayoutStatus::Pending)));
    db.expect_insert_payout().times(1).returning(|new| {
        let payout = stored_payout(1, &new);
        let tx = payout_transaction(&payout);
        Ok((payout, tx))
    });
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn withdraw_more_than_earned() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amount": 50}"#, configure_unapproved).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["status"], "unapproved");
    assert!(body.get("payout").is_none());
}

fn configure_unapproved(cfg: &mut ServiceConfig) {
    let (db, mut gateway) = funded_vendor(1_000, 10_000);
    gateway.expect_create_payout().never();
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn withdraw_invalid_amount() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    for amount in [r#"{"amount": "12.345"}"#, r#"{"amount": "-5"}"#, r#"{"amount": "0"}"#] {
        let (status, body) = post_request(&token, "/withdraw", amount, configure_unused).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{amount}");
        assert_eq!(json(&body)["status"], "invalid_amount");
    }
}

#[actix_web::test]
async fn withdraw_malformed_body() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amt": 5}"#, configure_unused).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
}

#[actix_web::test]
async fn withdraw_by_non_vendor() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amount": "1.00"}"#, configure_no_vendor).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "vendor_not_found");
}

fn configure_no_vendor(cfg: &mut ServiceConfig) {
    let mut db = MockPayoutDb::new();
    db.expect_fetch_vendor_for_user().returning(|_| Ok(None));
    register(db, MockGateway::new(), cfg);
}

#[actix_web::test]
async fn withdraw_without_bank_account() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amount": "10.00"}"#, configure_no_bank).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "no_bank_account");
}

fn configure_no_bank(cfg: &mut ServiceConfig) {
    let mut db = MockPayoutDb::new();
    db.expect_fetch_vendor_for_user().returning(|user_id| Ok(Some(vendor(1, user_id, Some("acct_1")))));
    db.expect_completed_earnings().returning(|_| Ok(Some(Cents::from(5000))));
    let mut gateway = MockGateway::new();
    gateway
        .expect_retrieve_balance()
        .returning(|_| Ok(Some(ExternalBalance { amount: Cents::from(5000), currency: "eur".into() })));
    gateway.expect_retrieve_bank_accounts().returning(|_| Ok(vec![]));
    gateway.expect_create_payout().never();
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn withdraw_mismatched_payout_is_cancelled() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amount": "25.00"}"#, configure_mismatch).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["status"], "mismatch");
    assert_eq!(body["payout"]["amount"], 2000);
    assert_eq!(body["payout"]["status"], "cancelled");
}

fn configure_mismatch(cfg: &mut ServiceConfig) {
    let (mut db, mut gateway) = funded_vendor(10_000, 10_000);
    gateway
        .expect_create_payout()
        .returning(|_, _, _| Ok(gateway_payout("po_9", 2000, GatewayPayoutStatus::Pending)));
    gateway
        .expect_cancel_payout()
        .withf(|id, account| id == "po_9" && account == "acct_1")
        .times(1)
        .returning(|_, _| Ok(()));
    db.expect_insert_payout().returning(|new| {
        let payout = stored_payout(3, &new);
        let tx = payout_transaction(&payout);
        Ok((payout, tx))
    });
    db.expect_update_payout_status()
        .withf(|id, status| *id == 3 && *status == PayoutStatusType::Cancelled)
        .returning(|id, status| {
            let cancelled = NewPayout {
                vendor_id: 1,
                amount: Cents::from(2000),
                currency: "eur".into(),
                fee: Cents::from(250),
                stripe_id: "po_9".into(),
                status,
                data: Value::Null,
            };
            Ok(stored_payout(id, &cancelled))
        });
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn withdraw_processor_failure_is_reported() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amount": "25.00"}"#, configure_gateway_down).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "error");
}

fn configure_gateway_down(cfg: &mut ServiceConfig) {
    let mut db = MockPayoutDb::new();
    db.expect_fetch_vendor_for_user().returning(|user_id| Ok(Some(vendor(1, user_id, Some("acct_1")))));
    db.expect_completed_earnings().returning(|_| Ok(Some(Cents::from(10_000))));
    db.expect_insert_payout().never();
    let mut gateway = MockGateway::new();
    gateway.expect_retrieve_balance().returning(|_| Err(GatewayError::Communication("timed out".into())));
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn withdraw_unrecorded_payout_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, body) = post_request(&token, "/withdraw", r#"{"amount": "25.00"}"#, configure_db_failure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json(&body)["error"].as_str().unwrap().contains("disk I/O error"));
}

fn configure_db_failure(cfg: &mut ServiceConfig) {
    let (mut db, mut gateway) = funded_vendor(10_000, 10_000);
    gateway
        .expect_create_payout()
        .returning(|amount, _, _| Ok(gateway_payout("po_2", amount.value(), GatewayPayoutStatus::Pending)));
    gateway.expect_cancel_payout().times(1).returning(|_, _| Ok(()));
    db.expect_insert_payout().returning(|_| Err(LedgerError::DatabaseError("disk I/O error".into())));
    register(db, gateway, cfg);
}
