use std::time::Duration;

use log::*;
use markio_common::Secret;

const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";
const DEFAULT_STRIPE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Base URL of the Stripe API, without a trailing slash. Override this to point at a stub server in tests.
    pub api_url: String,
    pub secret_key: Secret<String>,
    /// Applied to every request. Stripe calls are made while a withdrawal holds the vendor lock, so this should be
    /// kept short.
    pub timeout: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_STRIPE_API_URL.to_string(),
            secret_key: Secret::default(),
            timeout: DEFAULT_STRIPE_TIMEOUT,
        }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("MKO_STRIPE_API_URL").unwrap_or_else(|_| {
            debug!("MKO_STRIPE_API_URL not set, using {DEFAULT_STRIPE_API_URL}");
            DEFAULT_STRIPE_API_URL.to_string()
        });
        let secret_key = Secret::new(std::env::var("MKO_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("MKO_STRIPE_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let timeout = std::env::var("MKO_STRIPE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for MKO_STRIPE_TIMEOUT_SECS ({s}). {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_STRIPE_TIMEOUT);
        Self { api_url: api_url.trim_end_matches('/').to_string(), secret_key, timeout }
    }
}
