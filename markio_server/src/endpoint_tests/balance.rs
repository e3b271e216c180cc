use actix_web::{http::StatusCode, web, web::ServiceConfig};
use markio_engine::{
    db_types::{Cents, NewPayout, Payout, PayoutStatusType, Role},
    BalanceApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, issue_token, stored_payout, vendor},
    mocks::MockLedger,
};
use crate::routes::MyBalanceRoute;

fn register(db: MockLedger, cfg: &mut ServiceConfig) {
    cfg.service(MyBalanceRoute::<MockLedger>::new()).app_data(web::Data::new(BalanceApi::new(db)));
}

#[actix_web::test]
async fn fetch_my_balance() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, &[Role::Vendor]);
    let (status, body) = get_request(&token, "/balance", configure).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["vendor_id"], 1);
    assert_eq!(body["available_payout"], 12_000);
    assert_eq!(body["pending"], 3_000);
    assert_eq!(body["last_payout"], 2_500);
    assert_eq!(body["payouts"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn fetch_balance_as_customer() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, &[Role::Customer]);
    let (status, _) = get_request(&token, "/balance", configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn fetch_balance_without_vendor_profile() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(8, &[Role::Vendor]);
    let (status, body) = get_request(&token, "/balance", configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("User #8 is not a vendor"));
}

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockLedger::new();
    db.expect_fetch_vendor_for_user()
        .returning(|user_id| Ok((user_id == 7).then(|| vendor(1, user_id, Some("acct_1")))));
    db.expect_completed_earnings().returning(|_| Ok(Some(Cents::from(12_000))));
    db.expect_pending_earnings().returning(|_| Ok(Cents::from(3_000)));
    db.expect_fetch_last_payout().returning(|vendor_id| Ok(Some(last_payout(vendor_id))));
    db.expect_fetch_payouts_for_vendor()
        .withf(|_, limit| *limit > 0)
        .returning(|vendor_id, _| Ok(vec![last_payout(vendor_id)]));
    register(db, cfg);
}

fn last_payout(vendor_id: i64) -> Payout {
    let new = NewPayout {
        vendor_id,
        amount: Cents::from(2_500),
        currency: "eur".into(),
        fee: Cents::from(250),
        stripe_id: "po_1".into(),
        status: PayoutStatusType::Omw,
        data: json!({"id": "po_1"}),
    };
    stored_payout(1, &new)
}
