use std::env;

use log::*;
use markio_common::{parse_boolean_flag, Secret};
use markio_engine::DEFAULT_FEE_PERCENTAGE;
use rand::{distributions::Alphanumeric, Rng};
use stripe_tools::StripeConfig;

use crate::errors::ServerError;

const DEFAULT_MKO_HOST: &str = "127.0.0.1";
const DEFAULT_MKO_PORT: u16 = 8380;
const DEFAULT_SUCCESS_URL: &str = "http://localhost:3000/checkout/success";
const DEFAULT_CANCEL_URL: &str = "http://localhost:3000/checkout/cancel";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// If true, the access log records the client address from the X-Forwarded-For header, rather than the
    /// connection's remote address. Only enable this behind a proxy you trust.
    pub use_x_forwarded_for: bool,
    /// The marketplace commission, in whole percent. Applied to checkout sessions and recorded on payouts.
    pub fee_percentage: u32,
    pub checkout: CheckoutConfig,
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MKO_HOST.to_string(),
            port: DEFAULT_MKO_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            use_x_forwarded_for: false,
            fee_percentage: DEFAULT_FEE_PERCENTAGE,
            checkout: CheckoutConfig::default(),
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MKO_HOST").ok().unwrap_or_else(|| DEFAULT_MKO_HOST.into());
        let port = env::var("MKO_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MKO_PORT. {e} Using the default, {DEFAULT_MKO_PORT}, instead."
                    );
                    DEFAULT_MKO_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MKO_PORT);
        let database_url = env::var("MKO_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ MKO_DATABASE_URL is not set. Please set it to the URL for the Markio database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let use_x_forwarded_for = parse_boolean_flag(env::var("MKO_USE_X_FORWARDED_FOR").ok(), false);
        let fee_percentage = configure_fee_percentage();
        let checkout = CheckoutConfig::from_env_or_default();
        let stripe = StripeConfig::new_from_env_or_default();
        Self { host, port, database_url, auth, use_x_forwarded_for, fee_percentage, checkout, stripe }
    }
}

fn configure_fee_percentage() -> u32 {
    env::var("MKO_FEE_PERCENTAGE")
        .map_err(|_| info!("🪛️ MKO_FEE_PERCENTAGE is not set. Using the default of {DEFAULT_FEE_PERCENTAGE}%."))
        .and_then(|s| {
            s.parse::<u32>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for MKO_FEE_PERCENTAGE. {e}"))
                .and_then(|p| {
                    if p <= 100 {
                        Ok(p)
                    } else {
                        warn!("🪛️ MKO_FEE_PERCENTAGE must be between 0 and 100, but was {p}.");
                        Err(())
                    }
                })
        })
        .ok()
        .unwrap_or(DEFAULT_FEE_PERCENTAGE)
}

//-------------------------------------------------  CheckoutConfig  ---------------------------------------------------
/// Where the processor's hosted checkout page sends the customer afterwards.
#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    pub success_url: String,
    pub cancel_url: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self { success_url: DEFAULT_SUCCESS_URL.to_string(), cancel_url: DEFAULT_CANCEL_URL.to_string() }
    }
}

impl CheckoutConfig {
    pub fn from_env_or_default() -> Self {
        let success_url = env::var("MKO_CHECKOUT_SUCCESS_URL").unwrap_or_else(|_| {
            warn!("🪛️ MKO_CHECKOUT_SUCCESS_URL is not set. Using {DEFAULT_SUCCESS_URL}");
            DEFAULT_SUCCESS_URL.to_string()
        });
        let cancel_url = env::var("MKO_CHECKOUT_CANCEL_URL").unwrap_or_else(|_| {
            warn!("🪛️ MKO_CHECKOUT_CANCEL_URL is not set. Using {DEFAULT_CANCEL_URL}");
            DEFAULT_CANCEL_URL.to_string()
        });
        Self { success_url, cancel_url }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify HS256 access tokens.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. Tokens issued \
             elsewhere will not be accepted. DO NOT operate on production like this. 🚨️🚨️🚨️"
        );
        let secret: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        Self { jwt_secret: Secret::new(secret.to_string()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("MKO_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [MKO_JWT_SECRET]")))?;
        if secret.len() < 32 {
            return Err(ServerError::ConfigurationError(
                "MKO_JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }
        Ok(Self::new(&secret))
    }
}
