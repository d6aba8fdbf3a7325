// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Token issuing and the per-request identity it yields.

pub mod middleware;
pub mod token;

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::VaultError;
use crate::models::UserId;

pub use token::{Authenticator, JwtAuthenticator};

/// Identity attached to a request by [`middleware::authenticate`].
///
/// A request without a valid token still gets a context, just an anonymous
/// one; handlers that need a user ask for it with [`RequestContext::user_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    user_id: Option<UserId>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn user_id(&self) -> Result<&UserId, VaultError> {
        self.user_id.as_ref().ok_or(VaultError::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_context_is_unauthenticated() {
        assert_eq!(
            RequestContext::anonymous().user_id(),
            Err(VaultError::Unauthenticated)
        );
    }

    #[test]
    fn test_user_context_yields_id() {
        let context = RequestContext::for_user(UserId("u1".to_string()));
        assert_eq!(context.user_id().unwrap().as_str(), "u1");
    }

    #[tokio::test]
    async fn test_extractor_defaults_to_anonymous() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let context = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(context, RequestContext::anonymous());

        parts
            .extensions
            .insert(RequestContext::for_user(UserId("u2".to_string())));
        let context = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(context.user_id().unwrap().as_str(), "u2");
    }
}
