use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use markio_engine::{
    events::{EventHandlers, EventHooks, EventProducers, PayoutCreatedEvent, PayoutMismatchEvent},
    BalanceApi,
    CheckoutFlowApi,
    SqliteDatabase,
    WithdrawalApi,
};
use stripe_tools::StripeApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::stripe::StripeGateway,
    middleware::JwtMiddlewareFactory,
    routes::{health, json_config, AddToBasketRoute, MyBalanceRoute, WithdrawRoute},
};

const EVENT_BUFFER_SIZE: usize = 25;

type HookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not run migrations. {e}")))?;
    let api = StripeApi::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = StripeGateway::new(api, config.checkout.clone());
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Logs payouts as they are created. Mismatched payouts are logged as errors.
fn event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_payout_created(|ev: PayoutCreatedEvent| {
            Box::pin(async move {
                info!("📬️ Payout {} of {} sent to vendor #{}", ev.payout.stripe_id, ev.payout.amount, ev.vendor_id);
            }) as HookFuture
        })
        .on_payout_mismatch(|ev: PayoutMismatchEvent| {
            Box::pin(async move {
                let outcome = if ev.cancelled { "It was cancelled" } else { "IT COULD NOT BE CANCELLED" };
                error!(
                    "📬️🚨️ Payout {} for vendor #{} does not match the request. Requested {}, got {}. {outcome}.",
                    ev.payout.stripe_id, ev.vendor_id, ev.requested, ev.returned
                );
            }) as HookFuture
        });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: StripeGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    // The withdrawal API holds the per-vendor locks, so every worker must share the same instance.
    let withdrawals =
        web::Data::new(WithdrawalApi::new(db.clone(), gateway.clone(), config.fee_percentage, producers));
    let log_format = if config.use_x_forwarded_for {
        "%t (%D ms) %s %{r}a %{Host}i %U"
    } else {
        "%t (%D ms) %s %a %{Host}i %U"
    };
    let auth = config.auth.clone();
    let fee_percentage = config.fee_percentage;
    let srv = HttpServer::new(move || {
        let checkout_api = CheckoutFlowApi::new(db.clone(), gateway.clone(), fee_percentage);
        let balance_api = BalanceApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new(log_format).log_target("mko::access_log"))
            .app_data(json_config())
            .app_data(withdrawals.clone())
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(balance_api));
        // Routes that require authentication
        let auth_scope = web::scope("/api")
            .wrap(JwtMiddlewareFactory::new(&auth))
            .service(WithdrawRoute::<SqliteDatabase, StripeGateway>::new())
            .service(AddToBasketRoute::<SqliteDatabase, StripeGateway>::new())
            .service(MyBalanceRoute::<SqliteDatabase>::new());
        app.service(health).service(auth_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("💻️ Markio server listening on {}:{}", config.host, config.port);
    Ok(srv)
}
