// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::constants::DEFAULT_TOKEN_TTL_SECS;

#[derive(Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct ServerOptions {
    #[arg(long, default_value = "127.0.0.1", env("VAULT_HTTP_HOST"))]
    pub host: String,
    #[arg(long, default_value = "9000", env("VAULT_HTTP_PORT"))]
    pub port: u16,
    #[arg(long, default_value = "sqlite://vault.db?mode=rwc", env("VAULT_DATABASE_URL"))]
    pub database_url: String,
    /// Directory holding one file per file-type record
    #[arg(long, default_value = "data", env("VAULT_FILES_STORE"))]
    pub files_store: PathBuf,
    /// HMAC secret for auth tokens. Rotating it invalidates every issued token.
    #[arg(long, default_value = "mySuperSecretKey", env("VAULT_JWT_SECRET"))]
    pub jwt_secret: String,
    #[arg(long, default_value_t = DEFAULT_TOKEN_TTL_SECS, env("VAULT_TOKEN_TTL_SECS"))]
    pub token_ttl_secs: u64,
    #[arg(long, default_value = "cert/server-cert.pem", env("VAULT_TLS_CERT"))]
    pub tls_cert: PathBuf,
    #[arg(long, default_value = "cert/server-key.pem", env("VAULT_TLS_KEY"))]
    pub tls_key: PathBuf,
    /// Log every request's method, URI and header names
    #[arg(long, default_value = "false", env("VAULT_CONSOLE_LOG"), action = ArgAction::SetTrue)]
    pub console_log: bool,
}

impl ServerOptions {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            host: "127.0.0.1".to_string(),
            port: 9000,
            database_url: "sqlite::memory:".to_string(),
            files_store: PathBuf::from("data"),
            jwt_secret: "mySuperSecretKey".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            tls_cert: PathBuf::from("cert/server-cert.pem"),
            tls_key: PathBuf::from("cert/server-key.pem"),
            console_log: false,
        }
    }
}

// Custom Debug implementation so the options can be logged at startup
impl fmt::Debug for ServerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("files_store", &self.files_store)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("tls_cert", &self.tls_cert)
            .field("tls_key", &self.tls_key)
            .field("console_log", &self.console_log)
            .finish()
    }
}
