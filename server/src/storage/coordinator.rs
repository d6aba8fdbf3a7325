// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::sync::Arc;

use crate::auth::RequestContext;
use crate::errors::VaultError;
use crate::models::{Credentials, Record, RecordType, UserId};
use crate::storage::{BlobBackend, MetadataBackend};

/// Single entry point to persistence. File records keep their ciphertext in
/// the blob backend and an empty-data row in the metadata backend; every
/// other type lives entirely in the metadata backend.
#[derive(Clone)]
pub struct RecordStorage {
    metadata: Arc<dyn MetadataBackend>,
    blobs: Arc<dyn BlobBackend>,
}

impl RecordStorage {
    pub fn new(metadata: Arc<dyn MetadataBackend>, blobs: Arc<dyn BlobBackend>) -> Self {
        Self { metadata, blobs }
    }

    pub async fn create_user(&self, credentials: &Credentials) -> Result<UserId, VaultError> {
        self.metadata.create_user(credentials).await
    }

    pub async fn login_user(&self, credentials: &Credentials) -> Result<UserId, VaultError> {
        self.metadata.login_user(credentials).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_records_info(&self, ctx: &RequestContext) -> Result<Vec<Record>, VaultError> {
        let user_id = ctx.user_id()?;
        self.metadata.get_records_info(user_id).await
    }

    /// Returns the id of the new record.
    ///
    /// For a file record the metadata row is written first since its id
    /// keys the blob. A failed blob write leaves that row behind.
    #[tracing::instrument(skip(self))]
    pub async fn create_record(
        &self,
        ctx: &RequestContext,
        record: Record,
    ) -> Result<String, VaultError> {
        let user_id = ctx.user_id()?;

        if record.record_type != RecordType::File {
            return self.metadata.create_record(user_id, &record).await;
        }

        let row = Record {
            data: Vec::new(),
            ..record.clone()
        };
        let record_id = self.metadata.create_record(user_id, &row).await?;

        let blob = Record {
            id: record_id.clone(),
            ..record
        };
        if let Err(err) = self.blobs.create_record(&blob).await {
            tracing::error!(
                "[server] blob write failed, metadata row {} is orphaned: {}",
                record_id,
                err
            );
            return Err(err);
        }

        Ok(record_id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_record(
        &self,
        ctx: &RequestContext,
        record_id: &str,
    ) -> Result<Record, VaultError> {
        let user_id = ctx.user_id()?;
        let row = self.metadata.get_record(user_id, record_id).await?;

        if row.record_type == RecordType::File {
            return self.blobs.get_record(&row.id, &row).await;
        }
        Ok(row)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_record(&self, ctx: &RequestContext, record_id: &str) -> Result<(), VaultError> {
        let user_id = ctx.user_id()?;
        self.metadata.delete_record(user_id, record_id).await?;

        match self.blobs.delete_record(record_id).await {
            Ok(()) | Err(VaultError::NotFound) => Ok(()),
            Err(err) => {
                tracing::error!("[server] unable to delete blob {}: {}", record_id, err);
                Err(VaultError::Unknown)
            }
        }
    }
}
