use std::sync::Arc;

use log::*;
use markio_common::Cents;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::StripeConfig,
    data_objects::{BankAccount, CheckoutSession, List, NewCheckoutSession, StripeBalance, StripePayout},
    helpers::{stripe_error_message, FormParams},
    StripeApiError,
};

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let auth = format!("Bearer {}", config.secret_key.reveal());
        let mut val = HeaderValue::from_str(&auth).map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Sends a request to the Stripe API. GET requests carry `params` as the query string; everything else sends them
    /// as a form-encoded body. If `account` is given, the call is made on behalf of that connected account.
    pub async fn rest_query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &FormParams,
        account: Option<&str>,
    ) -> Result<T, StripeApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let is_get = method == Method::GET;
        let mut req = self.client.request(method, url);
        if let Some(account) = account {
            req = req.header("Stripe-Account", account);
        }
        if is_get {
            if !params.is_empty() {
                req = req.query(params);
            }
        } else {
            req = req.form(params);
        }
        let response = req.send().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
            Err(StripeApiError::QueryError { status, message: stripe_error_message(&body) })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    pub async fn retrieve_balance(&self, account: &str) -> Result<StripeBalance, StripeApiError> {
        debug!("Fetching balance for {account}");
        let balance = self.rest_query::<StripeBalance>(Method::GET, "/v1/balance", &FormParams::new(), Some(account)).await?;
        trace!("Balance for {account}: {balance:?}");
        Ok(balance)
    }

    pub async fn list_bank_accounts(&self, account: &str) -> Result<Vec<BankAccount>, StripeApiError> {
        let path = format!("/v1/accounts/{account}/external_accounts");
        let mut params = FormParams::new();
        params.push("object", "bank_account");
        debug!("Fetching bank accounts for {account}");
        let result = self.rest_query::<List<BankAccount>>(Method::GET, &path, &params, None).await?;
        info!("{account} has {} bank account(s)", result.data.len());
        Ok(result.data)
    }

    /// Pays `amount` out of the connected account's balance to its default bank account.
    pub async fn create_payout(
        &self,
        account: &str,
        amount: Cents,
        currency: &str,
    ) -> Result<StripePayout, StripeApiError> {
        let params = payout_params(amount, currency);
        debug!("Creating payout of {amount} {currency} for {account}");
        let result = self.rest_query::<Value>(Method::POST, "/v1/payouts", &params, Some(account)).await?;
        if result.is_null() {
            return Err(StripeApiError::EmptyResponse);
        }
        let payout = StripePayout::from_json(result)?;
        info!("Created payout {} for {account}. Status: {}", payout.id, payout.status);
        Ok(payout)
    }

    pub async fn cancel_payout(&self, account: &str, payout_id: &str) -> Result<StripePayout, StripeApiError> {
        let path = format!("/v1/payouts/{payout_id}/cancel");
        debug!("Cancelling payout {payout_id} for {account}");
        let result = self.rest_query::<Value>(Method::POST, &path, &FormParams::new(), Some(account)).await?;
        let payout = StripePayout::from_json(result)?;
        info!("Cancelled payout {payout_id}. Status: {}", payout.status);
        Ok(payout)
    }

    pub async fn create_checkout_session(&self, session: &NewCheckoutSession) -> Result<CheckoutSession, StripeApiError> {
        let params = session.to_form_params();
        debug!("Creating checkout session for destination {}", session.destination);
        let result = self.rest_query::<CheckoutSession>(Method::POST, "/v1/checkout/sessions", &params, None).await?;
        info!("Created checkout session {}", result.id);
        Ok(result)
    }
}

fn payout_params(amount: Cents, currency: &str) -> FormParams {
    let mut params = FormParams::new();
    params.push("amount", amount.value().to_string()).push("currency", currency);
    params
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn payouts_go_to_the_default_bank_account() {
        let params = payout_params(Cents::from(2000), "eur");
        assert_eq!(params.get("amount"), Some("2000"));
        assert_eq!(params.get("currency"), Some("eur"));
        assert!(params.get("destination").is_none());
    }

    #[test]
    fn url_joins_base_and_path() {
        let config = StripeConfig { api_url: "http://localhost:12111".into(), ..Default::default() };
        let api = StripeApi::new(config).unwrap();
        assert_eq!(api.url("/v1/balance"), "http://localhost:12111/v1/balance");
    }

    #[test]
    fn default_config_points_at_stripe() {
        let api = StripeApi::new(StripeConfig::default()).unwrap();
        assert_eq!(api.url("/v1/payouts"), "https://api.stripe.com/v1/payouts");
    }
}
