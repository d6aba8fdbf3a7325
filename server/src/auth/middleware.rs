// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Request middleware. [`authenticate`] and [`log_requests`] never reject a
//! request: a missing or bad token only means the handler sees an anonymous
//! [`RequestContext`]. Routes that need a user add [`require_user`] as a
//! route layer, which runs before any body is extracted.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{Authenticator, RequestContext};
use crate::constants::AUTH_TOKEN_HEADER;
use crate::errors::VaultError;
use crate::models::AuthToken;

fn auth_token(request: &Request) -> Option<AuthToken> {
    let value = request.headers().get(AUTH_TOKEN_HEADER)?;
    match value.to_str() {
        Ok(token) if !token.is_empty() => Some(AuthToken(token.to_string())),
        Ok(_) => None,
        Err(_) => {
            tracing::warn!("[server] auth token header is not valid ASCII");
            None
        }
    }
}

pub async fn authenticate(
    State(authenticator): State<Arc<dyn Authenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = auth_token(&request) {
        match authenticator.validate_token(&token) {
            Ok(user_id) => {
                tracing::debug!("[server] authenticated user {}", user_id);
                request
                    .extensions_mut()
                    .insert(RequestContext::for_user(user_id));
            }
            Err(err) => tracing::info!("[server] continuing unauthenticated: {}", err),
        }
    }

    next.run(request).await
}

pub async fn require_user(request: Request, next: Next) -> Result<Response, VaultError> {
    request
        .extensions()
        .get::<RequestContext>()
        .ok_or(VaultError::Unauthenticated)?
        .user_id()?;

    Ok(next.run(request).await)
}

/// Header values are never logged since one of them is the bearer token.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let header_names: Vec<&str> = request.headers().keys().map(|name| name.as_str()).collect();
    tracing::info!(
        method = %request.method(),
        uri = %request.uri(),
        headers = ?header_names,
        "[server] request"
    );

    next.run(request).await
}
