//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs whose `sub` claim is the user id. A request with no
//! token, or a token that fails verification, simply has no caller; each
//! operation decides what that means.

use std::convert::Infallible;

use accounts::Caller;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::AppState;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Verifies bearer tokens against the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Resolve a token to a caller, or `None` if it does not verify.
    pub fn verify(&self, token: &str) -> Option<Caller> {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Some(Caller::new(data.claims.sub)),
            Ok(_) => {
                debug!("Rejected token with empty subject");
                None
            }
            Err(err) => {
                debug!(error = %err, "Rejected bearer token");
                None
            }
        }
    }
}

/// The verified caller of a request, if any.
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<Caller>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeCaller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| state.tokens.verify(token.trim()));

        Ok(MaybeCaller(caller))
    }
}

/// Sign a token for `sub`, valid for an hour.
#[cfg(test)]
pub(crate) fn sign(secret: &str, sub: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
