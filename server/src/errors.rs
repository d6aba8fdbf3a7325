// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! The per-request error taxonomy.
//!
//! Backend failures are logged where they happen and collapse into one of
//! these variants, so no database or filesystem text ever reaches a client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultError {
    #[error("field is empty")]
    EmptyField,
    #[error("login already exists")]
    LoginExists,
    #[error("wrong login or password")]
    WrongCredentials,
    #[error("user is unauthenticated")]
    Unauthenticated,
    #[error("record not found")]
    NotFound,
    #[error("internal server error")]
    Unknown,
}

impl VaultError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyField => StatusCode::BAD_REQUEST,
            Self::LoginExists => StatusCode::CONFLICT,
            Self::WrongCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::EmptyField => "Required field is empty",
            Self::LoginExists => "Login already exists",
            Self::WrongCredentials => "Wrong login or password",
            Self::Unauthenticated => "Unauthenticated",
            Self::NotFound => "Record not found",
            Self::Unknown => "Internal Server Error",
        }
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({"code": status.as_u16(), "message": self.message()}));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for VaultError {
    fn from(source: sqlx::Error) -> Self {
        tracing::error!("[server] database error: {:?}", source);
        VaultError::Unknown
    }
}

impl From<std::io::Error> for VaultError {
    fn from(source: std::io::Error) -> Self {
        tracing::error!("[server] io error: {:?}", source);
        VaultError::Unknown
    }
}

impl From<validator::ValidationErrors> for VaultError {
    fn from(source: validator::ValidationErrors) -> Self {
        tracing::debug!("[server] validation failed: {}", source);
        VaultError::EmptyField
    }
}
