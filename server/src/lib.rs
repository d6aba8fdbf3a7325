// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Vault Server
//!
//! Stores encrypted user records for the vault client. The server never sees
//! a passphrase; it keeps ciphertext, per-record metadata and the users that
//! own them.
//!
//! ## Architecture
//!
//! ```text
//! Client -> HTTPS -> auth middleware -> routes -> VaultService -> RecordStorage
//!                                                                   |
//!                                                 +-----------------+-----------------+
//!                                                 |                                   |
//!                                         SqlMetadataBackend                  FileBlobBackend
//!                                      (users, rows, hex ciphertext)      (file record payloads)
//! ```
//!
//! ## Modules
//!
//! - [`application`]: router, middleware stack and the rustls listener
//! - [`auth`]: token issuing/validation and the per-request identity
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: timeouts and size limits
//! - [`errors`]: the error taxonomy and its HTTP mapping
//! - [`models`]: domain types and request/response bodies
//! - [`routes`]: HTTP handlers
//! - [`service`]: registration, login and record operations
//! - [`storage`]: metadata and blob backends and the coordinator between them
//!
//! ## Usage
//!
//! ```bash
//! vault-server --port 9000 --files-store data --tls-cert cert/server-cert.pem --tls-key cert/server-key.pem
//! ```
//!
//! ## Security Considerations
//!
//! - Login passwords are stored as an unsalted SHA-256 of login and password,
//!   and record keys are an MD5 of the passphrase. Both are kept for
//!   compatibility with existing clients and data; neither is a strong scheme.
//! - Tokens cannot be revoked; rotating the JWT secret invalidates all of them.

pub mod application;
pub mod auth;
pub mod configuration;
pub mod constants;
pub mod errors;
pub mod models;
pub mod routes;
pub mod service;
pub mod storage;
