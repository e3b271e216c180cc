//! Access tokens.
//!
//! Markio does not handle logins itself. Clients present an HS256 bearer token, signed with the shared secret
//! `MKO_JWT_SECRET`, whose claims name the user and the roles they hold. The [`crate::middleware::JwtMiddlewareFactory`]
//! validates the token and stores the [`JwtClaims`] in the request extensions, from where handlers extract them.
use std::{
    future::{ready, Ready},
    time::Duration,
};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use markio_engine::db_types::Role;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user id.
    pub sub: i64,
    pub roles: Vec<Role>,
    /// Expiry, as a unix timestamp.
    pub exp: usize,
}

impl JwtClaims {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned().ok_or_else(|| {
            warn!("💻️ No JWT claims found in request extensions. Is the route wrapped in the JWT middleware?");
            ServerError::AuthenticationError(AuthError::MissingToken)
        });
        ready(claims)
    }
}

/// Validates the signature and expiry of `token` and returns its claims.
pub fn validate_access_token(token: &str, key: &DecodingKey) -> Result<JwtClaims, AuthError> {
    let data = decode::<JwtClaims>(token, key, &Validation::default()).map_err(|e| {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                AuthError::PoorlyFormattedToken(e.to_string())
            },
            _ => AuthError::ValidationError(e.to_string()),
        }
    })?;
    trace!("💻️ Access token validated for user #{}", data.claims.sub);
    Ok(data.claims)
}

/// Signs access tokens with the server's shared secret. Used by the operator tooling and the tests.
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()) }
    }

    pub fn issue_token(&self, user_id: i64, roles: &[Role], lifetime: Option<Duration>) -> Result<String, AuthError> {
        let lifetime = lifetime.unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let exp = (Utc::now().timestamp() + lifetime.as_secs() as i64) as usize;
        let claims = JwtClaims { sub: user_id, roles: roles.to_vec(), exp };
        encode(&Header::default(), &claims, &self.key).map_err(|e| AuthError::CouldNotIssueToken(e.to_string()))
    }
}
