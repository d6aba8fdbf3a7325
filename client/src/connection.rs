// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Certificate, Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ClientError;
use crate::models::{AuthToken, Record, RecordInfo};

const AUTH_TOKEN_HEADER: &str = "authToken";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request/response channel to the vault server. Login and password reach
/// this layer unhashed; the server derives the digest.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn register(&self, login: &str, password: &str) -> Result<AuthToken, ClientError>;

    async fn login(&self, login: &str, password: &str) -> Result<AuthToken, ClientError>;

    async fn records_info(&self, token: &AuthToken) -> Result<Vec<RecordInfo>, ClientError>;

    async fn record(&self, token: &AuthToken, record_id: &str) -> Result<Record, ClientError>;

    async fn create_record(&self, token: &AuthToken, record: &Record) -> Result<(), ClientError>;

    async fn delete_record(&self, token: &AuthToken, record_id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// e.g. `https://127.0.0.1:9000`
    pub server_url: String,
    /// PEM of the CA that signed the server certificate. It is the only
    /// root the client trusts.
    pub ca_cert: PathBuf,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
struct TokenBody {
    token: AuthToken,
}

/// Maps an error status back onto the taxonomy. Both credential and token
/// failures arrive as 401, so the caller says which one it means.
fn status_error(status: StatusCode, unauthorized: ClientError) -> ClientError {
    match status {
        StatusCode::BAD_REQUEST => ClientError::EmptyField,
        StatusCode::CONFLICT => ClientError::LoginExists,
        StatusCode::UNAUTHORIZED => unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        other => {
            tracing::warn!("[client] unexpected status {}", other);
            ClientError::Unknown
        }
    }
}

/// Path of one record. Server ids are UUIDs; anything outside that alphabet
/// cannot name a record and must not alter the request path.
fn record_path(record_id: &str) -> Result<String, ClientError> {
    let valid = !record_id.is_empty()
        && record_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        tracing::warn!("[client] refusing record id {:?}", record_id);
        return Err(ClientError::NotFound);
    }
    Ok(format!("/v1/records/{record_id}"))
}

pub struct HttpConnection {
    client: Client,
    base_url: String,
}

impl HttpConnection {
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let pem = std::fs::read(&options.ca_cert).map_err(|err| {
            tracing::error!(
                "[client] unable to read CA certificate {}: {}",
                options.ca_cert.display(),
                err
            );
            ClientError::Unknown
        })?;
        let ca = Certificate::from_pem(&pem)?;

        let client = Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .add_root_certificate(ca)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: options.server_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, token: &AuthToken) -> RequestBuilder {
        request.header(AUTH_TOKEN_HEADER, token.0.as_str())
    }

    async fn send(request: RequestBuilder, unauthorized: ClientError) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(status_error(status, unauthorized))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        response.json::<T>().await.map_err(|err| {
            tracing::warn!("[client] malformed response body: {}", err);
            ClientError::Unknown
        })
    }

    async fn credentials(
        &self,
        path: &str,
        login: &str,
        password: &str,
        unauthorized: ClientError,
    ) -> Result<AuthToken, ClientError> {
        let request = self
            .client
            .post(self.url(path))
            .json(&CredentialsBody { login, password });
        let response = Self::send(request, unauthorized).await?;

        Ok(Self::json::<TokenBody>(response).await?.token)
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn register(&self, login: &str, password: &str) -> Result<AuthToken, ClientError> {
        self.credentials("/v1/register", login, password, ClientError::Unauthenticated)
            .await
    }

    async fn login(&self, login: &str, password: &str) -> Result<AuthToken, ClientError> {
        self.credentials("/v1/login", login, password, ClientError::WrongCredentials)
            .await
    }

    async fn records_info(&self, token: &AuthToken) -> Result<Vec<RecordInfo>, ClientError> {
        let request = self.authorized(self.client.get(self.url("/v1/records")), token);
        let response = Self::send(request, ClientError::Unauthenticated).await?;

        Self::json(response).await
    }

    async fn record(&self, token: &AuthToken, record_id: &str) -> Result<Record, ClientError> {
        let request = self.authorized(
            self.client.get(self.url(&record_path(record_id)?)),
            token,
        );
        let response = Self::send(request, ClientError::Unauthenticated).await?;

        Self::json(response).await
    }

    async fn create_record(&self, token: &AuthToken, record: &Record) -> Result<(), ClientError> {
        let request = self.authorized(self.client.post(self.url("/v1/records")), token).json(record);
        Self::send(request, ClientError::Unauthenticated).await?;

        Ok(())
    }

    async fn delete_record(&self, token: &AuthToken, record_id: &str) -> Result<(), ClientError> {
        let request = self.authorized(
            self.client.delete(self.url(&record_path(record_id)?)),
            token,
        );
        Self::send(request, ClientError::Unauthenticated).await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_error(StatusCode::BAD_REQUEST, ClientError::Unauthenticated),
            ClientError::EmptyField
        );
        assert_eq!(
            status_error(StatusCode::CONFLICT, ClientError::Unauthenticated),
            ClientError::LoginExists
        );
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED, ClientError::WrongCredentials),
            ClientError::WrongCredentials
        );
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED, ClientError::Unauthenticated),
            ClientError::Unauthenticated
        );
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, ClientError::Unauthenticated),
            ClientError::NotFound
        );
        assert_eq!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, ClientError::Unauthenticated),
            ClientError::Unknown
        );
    }

    #[test]
    fn test_record_path_accepts_server_ids() {
        assert_eq!(
            record_path("0b6f5c1e-8a4d-4f0e-9c1b-2d3e4f5a6b7c").unwrap(),
            "/v1/records/0b6f5c1e-8a4d-4f0e-9c1b-2d3e4f5a6b7c"
        );
    }

    #[test]
    fn test_record_path_refuses_path_altering_ids() {
        for record_id in ["", "../register", "a/b", "a?b=c", "a#b", "a b", "%2e%2e"] {
            assert_eq!(record_path(record_id), Err(ClientError::NotFound));
        }
    }

    #[test]
    fn test_missing_ca_certificate_fails() {
        let options = ClientOptions {
            server_url: "https://127.0.0.1:9000/".to_string(),
            ca_cert: PathBuf::from("/nonexistent/ca.pem"),
        };
        assert!(matches!(
            HttpConnection::new(&options),
            Err(ClientError::Unknown)
        ));
    }
}
