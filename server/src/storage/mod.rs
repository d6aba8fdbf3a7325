// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Record persistence.
//!
//! Users and record metadata live in a [`MetadataBackend`]; the ciphertext of
//! file records lives in a separate [`BlobBackend`]. [`RecordStorage`] routes
//! between the two by record type.

pub mod blob;
pub mod coordinator;
pub mod metadata;

use async_trait::async_trait;

use crate::errors::VaultError;
use crate::models::{Credentials, Record, UserId};

pub use blob::FileBlobBackend;
pub use coordinator::RecordStorage;
pub use metadata::SqlMetadataBackend;

#[async_trait]
pub trait MetadataBackend: Send + Sync {
    /// Fails with [`VaultError::LoginExists`] if the login is taken.
    async fn create_user(&self, credentials: &Credentials) -> Result<UserId, VaultError>;

    async fn login_user(&self, credentials: &Credentials) -> Result<UserId, VaultError>;

    /// Listing of the user's records, with `data` left empty.
    async fn get_records_info(&self, user_id: &UserId) -> Result<Vec<Record>, VaultError>;

    /// Returns the new record id. `record.id` is ignored.
    async fn create_record(&self, user_id: &UserId, record: &Record) -> Result<String, VaultError>;

    async fn get_record(&self, user_id: &UserId, record_id: &str) -> Result<Record, VaultError>;

    async fn delete_record(&self, user_id: &UserId, record_id: &str) -> Result<(), VaultError>;
}

/// Opaque ciphertext keyed by record id. Ownership is enforced by the
/// metadata backend, never here.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Stores `record.data` under `record.id` and returns that id.
    async fn create_record(&self, record: &Record) -> Result<String, VaultError>;

    /// `template` supplies every field except `data`, which is read from
    /// the blob.
    async fn get_record(&self, record_id: &str, template: &Record) -> Result<Record, VaultError>;

    async fn delete_record(&self, record_id: &str) -> Result<(), VaultError>;
}

/// Record ids are generated as UUIDs; anything outside this alphabet can
/// never name a stored record.
pub(crate) fn is_valid_record_id(record_id: &str) -> bool {
    !record_id.is_empty()
        && record_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_alphabet() {
        assert!(is_valid_record_id("0b6f5c1e-8a4d-4f0e-9c1b-2d3e4f5a6b7c"));
        assert!(!is_valid_record_id(""));
        assert!(!is_valid_record_id("../etc/passwd"));
        assert!(!is_valid_record_id("a/b"));
        assert!(!is_valid_record_id("a b"));
    }
}
