// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP route handlers for the vault API.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | [`health`] |
//! | POST | `/v1/register` | [`register`] |
//! | POST | `/v1/login` | [`login`] |
//! | GET | `/v1/records` | [`get_records_info`] |
//! | POST | `/v1/records` | [`create_record`] |
//! | GET | `/v1/records/{id}` | [`get_record`] |
//! | DELETE | `/v1/records/{id}` | [`delete_record`] |
//!
//! Everything under `/v1/records` needs an `authToken` header.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use validator::Validate;

use crate::application::AppState;
use crate::auth::RequestContext;
use crate::errors::VaultError;
use crate::models::{
    CreateRecordRequest, CredentialsRequest, RecordInfoResponse, RecordResponse, TokenResponse,
};

pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[tracing::instrument(skip(state))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, VaultError> {
    let token = state.service.register(&request).await?;

    Ok(Json(TokenResponse { token }))
}

#[tracing::instrument(skip(state))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, VaultError> {
    let token = state.service.login(&request).await?;

    Ok(Json(TokenResponse { token }))
}

#[tracing::instrument(skip(state))]
pub async fn get_records_info(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Json<Vec<RecordInfoResponse>>, VaultError> {
    let records = state.service.records_info(&ctx).await?;

    Ok(Json(records.into_iter().map(RecordInfoResponse::from).collect()))
}

#[tracing::instrument(skip(state))]
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(record_id): Path<String>,
) -> Result<Json<RecordResponse>, VaultError> {
    let record = state.service.record(&ctx, &record_id).await?;

    Ok(Json(RecordResponse::from(record)))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(request): Json<CreateRecordRequest>,
) -> Result<StatusCode, VaultError> {
    request.validate()?;

    let record_id = state.service.create_record(&ctx, request.into()).await?;
    tracing::info!("[server] created record {}", record_id);

    Ok(StatusCode::CREATED)
}

#[tracing::instrument(skip(state))]
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(record_id): Path<String>,
) -> Result<StatusCode, VaultError> {
    state.service.delete_record(&ctx, &record_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
