// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::VaultError;
use crate::models::{AuthToken, UserId};

/// Issues tokens for authenticated users and turns them back into user ids.
pub trait Authenticator: Send + Sync {
    fn create_token(&self, user_id: &UserId) -> Result<AuthToken, VaultError>;

    /// Every failure (bad signature, wrong algorithm, expiry, missing claim)
    /// is reported as [`VaultError::Unauthenticated`].
    fn validate_token(&self, token: &AuthToken) -> Result<UserId, VaultError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userID")]
    user_id: String,
    exp: u64,
}

/// HS256 tokens carrying the user id and an absolute expiry.
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> Result<u64, VaultError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|err| {
            tracing::error!("[server] system clock before unix epoch: {:?}", err);
            VaultError::Unknown
        })
}

impl Authenticator for JwtAuthenticator {
    fn create_token(&self, user_id: &UserId) -> Result<AuthToken, VaultError> {
        let claims = Claims {
            user_id: user_id.to_string(),
            exp: unix_now()?.saturating_add(self.ttl.as_secs()),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(AuthToken)
            .map_err(|err| {
                tracing::error!("[server] unable to sign token: {:?}", err);
                VaultError::Unknown
            })
    }

    fn validate_token(&self, token: &AuthToken) -> Result<UserId, VaultError> {
        let data = jsonwebtoken::decode::<Claims>(token.as_str(), &self.decoding_key, &self.validation)
            .map_err(|err| {
                tracing::warn!("[server] rejected token: {}", err);
                VaultError::Unauthenticated
            })?;

        if data.claims.user_id.is_empty() {
            tracing::warn!("[server] rejected token: empty user id claim");
            return Err(VaultError::Unauthenticated);
        }

        Ok(UserId(data.claims.user_id))
    }
}
