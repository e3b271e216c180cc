use actix_web::{
    body::{to_bytes, MessageBody},
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
    ResponseError,
};
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use markio_engine::{
    db_types::{
        Basket,
        BasketStatusType,
        Cents,
        NewPayout,
        Payout,
        Product,
        Role,
        Transaction,
        TransactionType,
        User,
        Vendor,
    },
    traits::{GatewayPayout, GatewayPayoutStatus},
};
use serde_json::json;

use crate::{auth::TokenIssuer, config::AuthConfig, middleware::JwtMiddlewareFactory, routes::json_config};

// Test-only secret. DO NOT re-use it anywhere.
const TEST_JWT_SECRET: &str = "markio-endpoint-tests-secret-0123456789";

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_JWT_SECRET)
}

pub fn issue_token(user_id: i64, roles: &[Role]) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(user_id, roles, None).expect("Failed to sign token")
}

pub async fn get_request(token: &str, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let req = TestRequest::get().uri(path);
    send(token, req, configure).await
}

pub async fn post_request(
    token: &str,
    path: &str,
    body: &str,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let req = TestRequest::post()
        .uri(path)
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string());
    send(token, req, configure).await
}

async fn send(token: &str, mut req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    if !token.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    let app = App::new()
        .wrap(JwtMiddlewareFactory::new(&get_auth_config()))
        .app_data(json_config())
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            (status, read_body(res.into_body()).await)
        },
        Err(e) => {
            let res = e.as_response_error().error_response();
            (res.status(), read_body(res.into_body()).await)
        },
    }
}

async fn read_body<B: MessageBody>(body: B) -> String {
    match to_bytes(body).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => panic!("Could not read response body"),
    }
}

//----------------------------------------------   Fixtures  ----------------------------------------------------

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn user(id: i64) -> User {
    User { id, email: format!("user{id}@example.com"), created_at: timestamp() }
}

pub fn product(id: i64, vendor_id: i64, price: i64) -> Product {
    Product { id, vendor_id, title: format!("Product {id}"), price: Cents::from(price) }
}

pub fn basket(id: i64, owner_id: i64, vendor_id: Option<i64>) -> Basket {
    let ts = timestamp();
    Basket { id, owner_id, vendor_id, status: BasketStatusType::Active, created_at: ts, updated_at: ts }
}

pub fn vendor(id: i64, user_id: i64, stripe_id: Option<&str>) -> Vendor {
    let ts = timestamp();
    Vendor {
        id,
        user_id,
        name: format!("Vendor {id}"),
        stripe_id: stripe_id.map(String::from),
        created_at: ts,
        updated_at: ts,
    }
}

pub fn gateway_payout(id: &str, amount: i64, status: GatewayPayoutStatus) -> GatewayPayout {
    GatewayPayout {
        id: id.to_string(),
        amount: Cents::from(amount),
        currency: "eur".into(),
        status,
        failure_code: None,
        raw: json!({"id": id, "object": "payout", "amount": amount}),
    }
}

pub fn stored_payout(id: i64, new: &NewPayout) -> Payout {
    serde_json::from_value(json!({
        "id": id,
        "vendor_id": new.vendor_id,
        "amount": new.amount,
        "currency": new.currency,
        "fee": new.fee,
        "stripe_id": new.stripe_id,
        "method": "stripe_payout",
        "status": new.status,
        "data": new.data,
        "created_at": "2024-06-02T09:30:00Z",
        "updated_at": "2024-06-02T09:30:00Z"
    }))
    .expect("Invalid payout fixture")
}

pub fn payout_transaction(payout: &Payout) -> Transaction {
    Transaction {
        id: 100 + payout.id,
        vendor_id: payout.vendor_id,
        payment_id: None,
        payout_id: Some(payout.id),
        tx_type: TransactionType::Payout,
        created_at: payout.created_at,
    }
}
