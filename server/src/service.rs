// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! The vault operations, independent of the HTTP surface.

use std::sync::Arc;

use validator::Validate;
use vault_crypt::password_hash;

use crate::auth::{Authenticator, RequestContext};
use crate::errors::VaultError;
use crate::models::{AuthToken, Credentials, CredentialsRequest, Record};
use crate::storage::RecordStorage;

#[derive(Clone)]
pub struct VaultService {
    storage: RecordStorage,
    authenticator: Arc<dyn Authenticator>,
}

fn hashed_credentials(request: &CredentialsRequest) -> Result<Credentials, VaultError> {
    request.validate()?;

    Ok(Credentials {
        login: request.login.clone(),
        password: password_hash(&request.login, &request.password),
    })
}

impl VaultService {
    pub fn new(storage: RecordStorage, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            storage,
            authenticator,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn register(&self, request: &CredentialsRequest) -> Result<AuthToken, VaultError> {
        let credentials = hashed_credentials(request)?;
        let user_id = self.storage.create_user(&credentials).await?;

        self.authenticator.create_token(&user_id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn login(&self, request: &CredentialsRequest) -> Result<AuthToken, VaultError> {
        let credentials = hashed_credentials(request)?;
        let user_id = self.storage.login_user(&credentials).await?;
        tracing::info!("[server] user {} logged in", user_id);

        self.authenticator.create_token(&user_id)
    }

    pub async fn records_info(&self, ctx: &RequestContext) -> Result<Vec<Record>, VaultError> {
        self.storage.get_records_info(ctx).await
    }

    pub async fn record(&self, ctx: &RequestContext, record_id: &str) -> Result<Record, VaultError> {
        self.storage.get_record(ctx, record_id).await
    }

    pub async fn create_record(
        &self,
        ctx: &RequestContext,
        record: Record,
    ) -> Result<String, VaultError> {
        self.storage.create_record(ctx, record).await
    }

    pub async fn delete_record(&self, ctx: &RequestContext, record_id: &str) -> Result<(), VaultError> {
        self.storage.delete_record(ctx, record_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::auth::JwtAuthenticator;
    use crate::models::RecordType;
    use crate::storage::{FileBlobBackend, SqlMetadataBackend};
    use std::time::Duration;

    async fn service(dir: &tempfile::TempDir) -> (VaultService, Arc<dyn Authenticator>) {
        let metadata = SqlMetadataBackend::in_memory().await.unwrap();
        metadata.migrate().await.unwrap();
        let blobs = FileBlobBackend::new(dir.path()).unwrap();
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(JwtAuthenticator::new(b"secret", Duration::from_secs(60)));
        let storage = RecordStorage::new(Arc::new(metadata), Arc::new(blobs));

        (VaultService::new(storage, authenticator.clone()), authenticator)
    }

    fn credentials(login: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login_resolve_same_user() {
        let dir = tempfile::tempdir().unwrap();
        let (service, authenticator) = service(&dir).await;

        let registered = service.register(&credentials("alice", "pw1")).await.unwrap();
        let logged_in = service.login(&credentials("alice", "pw1")).await.unwrap();

        assert_eq!(
            authenticator.validate_token(&registered).unwrap(),
            authenticator.validate_token(&logged_in).unwrap()
        );
    }

    #[tokio::test]
    async fn test_registration_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(&dir).await;

        service.register(&credentials("alice", "pw1")).await.unwrap();
        assert_eq!(
            service.register(&credentials("alice", "pw2")).await,
            Err(VaultError::LoginExists)
        );
        assert_eq!(
            service.login(&credentials("alice", "wrong")).await,
            Err(VaultError::WrongCredentials)
        );
    }

    #[tokio::test]
    async fn test_empty_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(&dir).await;

        assert_eq!(
            service.register(&credentials("", "pw")).await,
            Err(VaultError::EmptyField)
        );
        assert_eq!(
            service.login(&credentials("alice", "")).await,
            Err(VaultError::EmptyField)
        );
    }

    #[tokio::test]
    async fn test_file_record_lands_in_blob_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (service, authenticator) = service(&dir).await;
        let token = service.register(&credentials("alice", "pw1")).await.unwrap();
        let ctx = RequestContext::for_user(authenticator.validate_token(&token).unwrap());

        let record = Record {
            id: String::new(),
            record_type: RecordType::File,
            key_hint: "pa**".to_string(),
            metadata: "report.pdf".to_string(),
            data: b"ciphertext".to_vec(),
        };
        let id = service.create_record(&ctx, record).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join(&id)).unwrap(), b"ciphertext");
        assert!(service.records_info(&ctx).await.unwrap()[0].data.is_empty());
        assert_eq!(service.record(&ctx, &id).await.unwrap().data, b"ciphertext");

        service.delete_record(&ctx, &id).await.unwrap();
        assert!(!dir.path().join(&id).exists());
    }
}
