// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Vault Client
//!
//! The client half of the vault. Records are encrypted here with the user's
//! passphrase before they leave the process, and decrypted here after they
//! come back; the server only ever sees ciphertext.
//!
//! - [`connection`]: the request/response channel to the server
//! - [`errors`]: client error taxonomy
//! - [`models`]: records, payloads and their byte encodings
//! - [`session`]: logged-in state shared by every operation

pub mod connection;
pub mod errors;
pub mod models;
pub mod session;

pub use connection::{ClientOptions, Connection, HttpConnection};
pub use errors::ClientError;
pub use models::{RecordPayload, RecordType};
pub use session::Session;
