use actix_web::{http::StatusCode, web, web::ServiceConfig};
use markio_engine::{
    db_types::{Cents, Line, Role},
    traits::{CheckoutSessionRef, GatewayError},
    CheckoutFlowApi,
};
use serde_json::Value;

use super::{
    helpers::{basket, issue_token, post_request, product, user, vendor},
    mocks::{MockGateway, MockMarketDb},
};
use crate::routes::AddToBasketRoute;

const USER_ID: i64 = 21;
const ADD_ONE: &str = r#"{"vendor_id": 1, "product_id": 5, "quantity": 1, "amount": "45.00"}"#;

fn register(db: MockMarketDb, gateway: MockGateway, cfg: &mut ServiceConfig) {
    let api = CheckoutFlowApi::new(db, gateway, 10);
    cfg.service(AddToBasketRoute::<MockMarketDb, MockGateway>::new()).app_data(web::Data::new(api));
}

/// Vendor 1 (onboarded as `acct_1`) sells product 5. Product 6 belongs to vendor 2.
fn catalogue() -> MockMarketDb {
    let mut db = MockMarketDb::new();
    db.expect_fetch_vendor().returning(|id| Ok(Some(vendor(id, 100 + id, (id == 1).then_some("acct_1")))));
    db.expect_fetch_product().returning(|id| Ok(Some(product(id, if id == 5 { 1 } else { 2 }, 4500))));
    db.expect_fetch_user().returning(|id| Ok(Some(user(id))));
    db
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("Response was not JSON")
}

fn configure_unused(cfg: &mut ServiceConfig) {
    register(MockMarketDb::new(), MockGateway::new(), cfg);
}

#[actix_web::test]
async fn add_to_basket_requires_customer_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Vendor]);
    let (status, _) = post_request(&token, "/basket/add", ADD_ONE, configure_unused).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = post_request("", "/basket/add", ADD_ONE, configure_unused).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn add_to_new_basket() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Customer]);
    let (status, body) = post_request(&token, "/basket/add", ADD_ONE, configure_new_basket).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["stripe_account_id"], "acct_1");
    assert_eq!(body["checkout_session_id"], "cs_test_1");
    assert_eq!(body["basket_id"], 30);
}

fn configure_new_basket(cfg: &mut ServiceConfig) {
    let mut db = catalogue();
    db.expect_fetch_active_basket().returning(|_| Ok(None));
    db.expect_create_basket()
        .withf(|owner, vendor| *owner == USER_ID && *vendor == Some(1))
        .times(1)
        .returning(|owner, vendor| Ok(basket(30, owner, vendor)));
    db.expect_fetch_lines().returning(|_| Ok(vec![]));
    db.expect_add_line()
        .withf(|basket_id, product_id, quantity| *basket_id == 30 && *product_id == 5 && *quantity == 1)
        .times(1)
        .returning(|basket_id, product_id, quantity| Ok(Line { id: 1, basket_id, product_id, quantity }));
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_checkout_session()
        .withf(|req| {
            req.account == "acct_1" &&
                req.unit_amount == Cents::from(4500) &&
                req.application_fee == Cents::from(450) &&
                req.customer_email.as_deref() == Some("user21@example.com")
        })
        .times(1)
        .returning(|_| Ok(CheckoutSessionRef { id: "cs_test_1".into(), url: Some("https://checkout.test/1".into()) }));
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn add_product_from_another_vendor_switches_basket() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Customer]);
    let (status, body) = post_request(&token, "/basket/add", ADD_ONE, configure_switch_vendor).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["basket_id"], 31);
}

fn configure_switch_vendor(cfg: &mut ServiceConfig) {
    let mut db = catalogue();
    // The active basket belongs to vendor 2 and already holds product 6
    db.expect_fetch_active_basket().returning(|owner| Ok(Some(basket(30, owner, Some(2)))));
    db.expect_fetch_lines().returning(|basket_id| {
        if basket_id == 30 {
            Ok(vec![Line { id: 1, basket_id, product_id: 6, quantity: 2 }])
        } else {
            Ok(vec![])
        }
    });
    db.expect_switch_basket_vendor()
        .withf(|basket_id, vendor_id| *basket_id == 30 && *vendor_id == 1)
        .times(1)
        .returning(|_, vendor_id| Ok(basket(31, USER_ID, Some(vendor_id))));
    db.expect_add_line()
        .withf(|basket_id, _, _| *basket_id == 31)
        .times(1)
        .returning(|basket_id, product_id, quantity| Ok(Line { id: 2, basket_id, product_id, quantity }));
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_checkout_session()
        .returning(|_| Ok(CheckoutSessionRef { id: "cs_test_2".into(), url: None }));
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn add_to_basket_validation_errors() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Customer]);
    let cases = [
        // product 6 is sold by vendor 2
        r#"{"vendor_id": 1, "product_id": 6, "quantity": 1, "amount": "45.00"}"#,
        // vendor 2 has not been onboarded
        r#"{"vendor_id": 2, "product_id": 6, "quantity": 1, "amount": "45.00"}"#,
        r#"{"vendor_id": 1, "product_id": 5, "quantity": 0, "amount": "45.00"}"#,
        r#"{"vendor_id": 1, "product_id": 5, "quantity": 1, "amount": "4.999"}"#,
        r#"{"vendor_id": 1, "product_id": 5}"#,
    ];
    for case in cases {
        let (status, body) = post_request(&token, "/basket/add", case, configure_validation).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert!(json(&body)["error"].is_string(), "{case}");
    }
}

fn configure_validation(cfg: &mut ServiceConfig) {
    let mut db = catalogue();
    db.expect_create_basket().never();
    db.expect_add_line().never();
    let mut gateway = MockGateway::new();
    gateway.expect_create_checkout_session().never();
    register(db, gateway, cfg);
}

#[actix_web::test]
async fn checkout_session_failure() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(USER_ID, &[Role::Customer]);
    let (status, body) = post_request(&token, "/basket/add", ADD_ONE, configure_gateway_failure).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json(&body)["error"].as_str().unwrap().contains("No such destination"));
}

fn configure_gateway_failure(cfg: &mut ServiceConfig) {
    let mut db = catalogue();
    db.expect_fetch_active_basket().returning(|owner| Ok(Some(basket(30, owner, Some(1)))));
    db.expect_fetch_lines().returning(|basket_id| Ok(vec![Line { id: 1, basket_id, product_id: 5, quantity: 1 }]));
    db.expect_add_line().never();
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_checkout_session()
        .returning(|_| Err(GatewayError::Rejected("[400] No such destination".into())));
    register(db, gateway, cfg);
}
