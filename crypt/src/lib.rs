// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Vault Crypt
//!
//! Client-side record encryption for the secrets vault.
//!
//! The server only ever stores what this crate produces: record payloads are
//! sealed on the client with a key derived from the user's passphrase and the
//! resulting bytes travel and rest as an opaque blob.
//!
//! ## Wire Format
//!
//! ```text
//! +-----------------+--------------------------------------+
//! | IV (16 bytes)   | AES-128-CBC(PKCS#7(plaintext))       |
//! +-----------------+--------------------------------------+
//! ```
//!
//! The key is `MD5(passphrase)`. This is kept for compatibility with records
//! already stored by existing clients; MD5 is a weak, unsalted KDF and any
//! replacement is a format break (see DESIGN.md).
//!
//! ## Modules
//!
//! - [`cipher`]: record encryption and decryption
//! - [`constants`]: block and key sizes
//! - [`errors`]: decryption failures
//! - [`masker`]: passphrase key hints
//! - [`password`]: login credential digest
//! - [`utils`]: hex helpers shared by the server and client

pub mod cipher;
pub mod constants;
pub mod errors;
pub mod masker;
pub mod password;
pub mod utils;

pub use cipher::{decrypt, encrypt};
pub use errors::CryptError;
pub use masker::mask;
pub use password::password_hash;
