//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the database or the payment processor,
//! so they are all async.
use actix_web::{error::JsonPayloadError, get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use markio_engine::{
    db_types::Role,
    traits::{CheckoutDatabase, CheckoutProcessor, LedgerManagement, PaymentProcessor, PayoutManagement},
    AddToBasket,
    BalanceApi,
    CheckoutFlowApi,
    WithdrawalApi,
    WithdrawalError,
};

use crate::{
    auth::JwtClaims,
    data_objects::{WithdrawRequest, WithdrawResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+ where requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Malformed JSON bodies are reported as a 400 with the usual `{"error": ...}` body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Could not deserialize request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Withdraw  ----------------------------------------------------
route!(withdraw => Post "/withdraw" impl PayoutManagement, PaymentProcessor where requires [Role::Vendor]);
/// Route handler for the withdrawal endpoint
///
/// Vendors use this endpoint to move `amount` of their earnings to their bank account. The vendor profile is the one
/// owned by the user named in the access token.
///
/// Every outcome of the withdrawal itself (success, insufficient funds, missing bank account, a payout that did not
/// match the request, or a processor failure) is a 200 response with a `status` and `message`. A malformed amount is
/// a 400, and a database failure is a 500.
pub async fn withdraw<B, G>(
    claims: JwtClaims,
    body: web::Json<WithdrawRequest>,
    api: web::Data<WithdrawalApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: PayoutManagement,
    G: PaymentProcessor,
{
    let amount = body.into_inner().amount;
    debug!("💻️ POST withdraw of {amount} for user #{}", claims.sub);
    match api.withdraw(claims.sub, amount).await {
        Ok(payout) => {
            info!("💻️ Payout {} of {} created for vendor #{}", payout.stripe_id, payout.amount, payout.vendor_id);
            Ok(HttpResponse::Ok().json(WithdrawResponse::success(payout)))
        },
        Err(e @ WithdrawalError::InvalidAmount(_)) => {
            debug!("💻️ Rejected withdrawal request. {e}");
            Ok(HttpResponse::BadRequest().json(WithdrawResponse::failure(&e)))
        },
        Err(WithdrawalError::Database(e)) => {
            error!("💻️ Database error during withdrawal for user #{}. {e}", claims.sub);
            Err(e.into())
        },
        Err(e) => {
            info!("💻️ Withdrawal for user #{} was not completed. {e}", claims.sub);
            Ok(HttpResponse::Ok().json(WithdrawResponse::failure(&e)))
        },
    }
}

//----------------------------------------------   Basket  ----------------------------------------------------
route!(add_to_basket => Post "/basket/add" impl CheckoutDatabase, CheckoutProcessor where requires [Role::Customer]);
/// Route handler for adding a product to the basket
///
/// The product goes into the caller's active basket. Because a basket only ever holds products from a single vendor,
/// adding a product from a different vendor starts a fresh basket. The response carries the checkout session the
/// customer should be sent to.
pub async fn add_to_basket<B, G>(
    claims: JwtClaims,
    body: web::Json<AddToBasket>,
    api: web::Data<CheckoutFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: CheckoutDatabase,
    G: CheckoutProcessor,
{
    let req = body.into_inner();
    debug!("💻️ POST add_to_basket for user #{}: product #{} x {}", claims.sub, req.product_id, req.quantity);
    let started = api.add_product_to_basket(claims.sub, req).await.map_err(|e| {
        debug!("💻️ Could not add product to basket. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(started))
}

//----------------------------------------------   Balance  ----------------------------------------------------
route!(my_balance => Get "/balance" impl LedgerManagement where requires [Role::Vendor]);
/// Route handler for the balance endpoint
///
/// Returns the ledger summary for the vendor owned by the user named in the access token: completed and pending
/// earnings, the last payout and the most recent payouts.
pub async fn my_balance<B: LedgerManagement>(
    claims: JwtClaims,
    api: web::Data<BalanceApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_balance for user #{}", claims.sub);
    let summary = api
        .balance_for_user(claims.sub)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("User #{} is not a vendor", claims.sub)))?;
    Ok(HttpResponse::Ok().json(summary))
}
