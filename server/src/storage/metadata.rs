// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;
use vault_crypt::utils::{hex_decode, hex_encode};

use crate::constants::DB_QUERY_TIMEOUT;
use crate::errors::VaultError;
use crate::models::{Credentials, Record, RecordType, UserId};
use crate::storage::{MetadataBackend, is_valid_record_id};

#[derive(sqlx::FromRow)]
struct RecordInfoRow {
    record_id: String,
    record_type: i32,
    keyhint: String,
    metadata: String,
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    record_id: String,
    record_type: i32,
    keyhint: String,
    metadata: String,
    crypted_data: String,
}

fn record_type(code: i32) -> Result<RecordType, VaultError> {
    RecordType::try_from(code).map_err(|err| {
        tracing::error!("[server] corrupt record row: {}", err);
        VaultError::Unknown
    })
}

impl TryFrom<RecordInfoRow> for Record {
    type Error = VaultError;

    fn try_from(row: RecordInfoRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.record_id,
            record_type: record_type(row.record_type)?,
            key_hint: row.keyhint,
            metadata: row.metadata,
            data: Vec::new(),
        })
    }
}

impl TryFrom<RecordRow> for Record {
    type Error = VaultError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let data = hex_decode(&row.crypted_data).map_err(|err| {
            tracing::error!("[server] corrupt crypted_data in {}: {}", row.record_id, err);
            VaultError::Unknown
        })?;

        Ok(Self {
            id: row.record_id,
            record_type: record_type(row.record_type)?,
            key_hint: row.keyhint,
            metadata: row.metadata,
            data,
        })
    }
}

/// Users and record metadata in SQLite. Ciphertext of non-file records is
/// stored inline as hex.
#[derive(Debug, Clone)]
pub struct SqlMetadataBackend {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqlMetadataBackend {
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self::from_pool(pool))
    }

    /// Private database that lives as long as the backend. The pool is
    /// pinned to one connection because every SQLite memory connection is a
    /// separate database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            timeout: DB_QUERY_TIMEOUT,
        }
    }

    /// Replaces the per-query deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, VaultError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result.map_err(VaultError::from),
            Err(_) => {
                tracing::error!(
                    "[server] {} timed out after {:?}",
                    operation,
                    self.timeout
                );
                Err(VaultError::Unknown)
            }
        }
    }
}

#[async_trait]
impl MetadataBackend for SqlMetadataBackend {
    #[tracing::instrument(skip(self))]
    async fn create_user(&self, credentials: &Credentials) -> Result<UserId, VaultError> {
        let existing: i64 = self
            .bounded(
                "count users",
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE login = ?")
                    .bind(&credentials.login)
                    .fetch_one(&self.pool),
            )
            .await?;
        if existing > 0 {
            return Err(VaultError::LoginExists);
        }

        let user_id = Uuid::new_v4().to_string();
        self.bounded(
            "insert user",
            sqlx::query("INSERT INTO users (user_id, login, password) VALUES (?, ?, ?)")
                .bind(&user_id)
                .bind(&credentials.login)
                .bind(&credentials.password)
                .execute(&self.pool),
        )
        .await?;

        tracing::info!("[server] created user {}", user_id);
        Ok(UserId(user_id))
    }

    #[tracing::instrument(skip(self))]
    async fn login_user(&self, credentials: &Credentials) -> Result<UserId, VaultError> {
        let user_id: Option<String> = self
            .bounded(
                "select user",
                sqlx::query_scalar("SELECT user_id FROM users WHERE login = ? AND password = ?")
                    .bind(&credentials.login)
                    .bind(&credentials.password)
                    .fetch_optional(&self.pool),
            )
            .await?;

        user_id.map(UserId).ok_or(VaultError::WrongCredentials)
    }

    #[tracing::instrument(skip(self))]
    async fn get_records_info(&self, user_id: &UserId) -> Result<Vec<Record>, VaultError> {
        let rows: Vec<RecordInfoRow> = self
            .bounded(
                "list records",
                sqlx::query_as(
                    "SELECT record_id, record_type, keyhint, metadata FROM data \
                     WHERE user_id = ? ORDER BY rowid",
                )
                .bind(user_id.as_str())
                .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter().map(Record::try_from).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn create_record(&self, user_id: &UserId, record: &Record) -> Result<String, VaultError> {
        let record_id = Uuid::new_v4().to_string();
        self.bounded(
            "insert record",
            sqlx::query(
                "INSERT INTO data (record_id, user_id, record_type, keyhint, metadata, crypted_data) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&record_id)
            .bind(user_id.as_str())
            .bind(i32::from(record.record_type))
            .bind(&record.key_hint)
            .bind(&record.metadata)
            .bind(hex_encode(&record.data))
            .execute(&self.pool),
        )
        .await?;

        Ok(record_id)
    }

    #[tracing::instrument(skip(self))]
    async fn get_record(&self, user_id: &UserId, record_id: &str) -> Result<Record, VaultError> {
        if !is_valid_record_id(record_id) {
            return Err(VaultError::NotFound);
        }

        let row: Option<RecordRow> = self
            .bounded(
                "select record",
                sqlx::query_as(
                    "SELECT record_id, record_type, keyhint, metadata, crypted_data FROM data \
                     WHERE record_id = ? AND user_id = ?",
                )
                .bind(record_id)
                .bind(user_id.as_str())
                .fetch_optional(&self.pool),
            )
            .await?;

        row.ok_or(VaultError::NotFound)?.try_into()
    }

    #[tracing::instrument(skip(self))]
    async fn delete_record(&self, user_id: &UserId, record_id: &str) -> Result<(), VaultError> {
        if !is_valid_record_id(record_id) {
            return Err(VaultError::NotFound);
        }

        let result = self
            .bounded(
                "delete record",
                sqlx::query("DELETE FROM data WHERE record_id = ? AND user_id = ?")
                    .bind(record_id)
                    .bind(user_id.as_str())
                    .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(VaultError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    async fn backend() -> SqlMetadataBackend {
        let backend = SqlMetadataBackend::in_memory().await.unwrap();
        backend.migrate().await.unwrap();
        backend
    }

    fn credentials(login: &str, password: &str) -> Credentials {
        Credentials {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    fn text_record(data: &[u8]) -> Record {
        Record {
            id: String::new(),
            record_type: RecordType::Text,
            key_hint: "my**".to_string(),
            metadata: "note".to_string(),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let backend = backend().await;
        let created = backend.create_user(&credentials("alice", "h1")).await.unwrap();
        let logged_in = backend.login_user(&credentials("alice", "h1")).await.unwrap();
        assert_eq!(created, logged_in);
    }

    #[tokio::test]
    async fn test_duplicate_login_is_rejected() {
        let backend = backend().await;
        backend.create_user(&credentials("alice", "h1")).await.unwrap();
        assert_eq!(
            backend.create_user(&credentials("alice", "h2")).await,
            Err(VaultError::LoginExists)
        );
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let backend = backend().await;
        backend.create_user(&credentials("alice", "h1")).await.unwrap();
        assert_eq!(
            backend.login_user(&credentials("alice", "h2")).await,
            Err(VaultError::WrongCredentials)
        );
        assert_eq!(
            backend.login_user(&credentials("bob", "h1")).await,
            Err(VaultError::WrongCredentials)
        );
    }

    #[tokio::test]
    async fn test_record_lifecycle() {
        let backend = backend().await;
        let user = backend.create_user(&credentials("alice", "h1")).await.unwrap();

        let id = backend.create_record(&user, &text_record(b"abc")).await.unwrap();

        let listing = backend.get_records_info(&user).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id, id);
        assert_eq!(listing[0].metadata, "note");
        assert!(listing[0].data.is_empty());

        let record = backend.get_record(&user, &id).await.unwrap();
        assert_eq!(record.data, b"abc");
        assert_eq!(record.key_hint, "my**");

        backend.delete_record(&user, &id).await.unwrap();
        assert_eq!(
            backend.get_record(&user, &id).await,
            Err(VaultError::NotFound)
        );
        assert_eq!(
            backend.delete_record(&user, &id).await,
            Err(VaultError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_owner() {
        let backend = backend().await;
        let alice = backend.create_user(&credentials("alice", "h1")).await.unwrap();
        let bob = backend.create_user(&credentials("bob", "h2")).await.unwrap();

        let id = backend.create_record(&alice, &text_record(b"abc")).await.unwrap();

        assert!(backend.get_records_info(&bob).await.unwrap().is_empty());
        assert_eq!(
            backend.get_record(&bob, &id).await,
            Err(VaultError::NotFound)
        );
        assert_eq!(
            backend.delete_record(&bob, &id).await,
            Err(VaultError::NotFound)
        );
        assert!(backend.get_record(&alice, &id).await.is_ok());
    }

    #[tokio::test]
    async fn test_slow_query_hits_deadline() {
        let backend = backend().await.with_timeout(Duration::from_millis(50));

        let started = std::time::Instant::now();
        let result: Result<i64, VaultError> = backend
            .bounded(
                "count to fifty million",
                sqlx::query_scalar(
                    "WITH RECURSIVE counter(x) AS \
                     (SELECT 1 UNION ALL SELECT x + 1 FROM counter WHERE x < 50000000) \
                     SELECT COUNT(*) FROM counter",
                )
                .fetch_one(&backend.pool),
            )
            .await;

        assert_eq!(result, Err(VaultError::Unknown));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fast_query_within_deadline() {
        let backend = backend().await.with_timeout(Duration::from_secs(5));
        backend.create_user(&credentials("alice", "h1")).await.unwrap();
        assert!(backend.login_user(&credentials("alice", "h1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_record_id_is_not_found() {
        let backend = backend().await;
        let user = backend.create_user(&credentials("alice", "h1")).await.unwrap();
        assert_eq!(
            backend.get_record(&user, "' OR 1=1 --").await,
            Err(VaultError::NotFound)
        );
    }
}
