// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::VaultError;
use crate::models::Record;
use crate::storage::{BlobBackend, is_valid_record_id};

/// One file per record, named by record id, under a single directory.
#[derive(Debug, Clone)]
pub struct FileBlobBackend {
    root: PathBuf,
}

impl FileBlobBackend {
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, record_id: &str) -> Result<PathBuf, VaultError> {
        if !is_valid_record_id(record_id) {
            tracing::warn!("[server] refusing blob path for id {:?}", record_id);
            return Err(VaultError::NotFound);
        }
        Ok(self.root.join(record_id))
    }
}

fn not_found_or_unknown(err: std::io::Error) -> VaultError {
    if err.kind() == ErrorKind::NotFound {
        VaultError::NotFound
    } else {
        VaultError::from(err)
    }
}

#[async_trait]
impl BlobBackend for FileBlobBackend {
    #[tracing::instrument(skip(self))]
    async fn create_record(&self, record: &Record) -> Result<String, VaultError> {
        let path = self.path_for(&record.id)?;
        tokio::fs::write(&path, &record.data).await?;

        Ok(record.id.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn get_record(&self, record_id: &str, template: &Record) -> Result<Record, VaultError> {
        let path = self.path_for(record_id)?;
        let data = tokio::fs::read(&path).await.map_err(not_found_or_unknown)?;

        Ok(Record {
            data,
            ..template.clone()
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete_record(&self, record_id: &str) -> Result<(), VaultError> {
        let path = self.path_for(record_id)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(not_found_or_unknown)
    }
}
