// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use sha2::{Digest, Sha256};

use crate::utils::hex_encode;

/// Digest stored in place of a user's password: `hex(SHA-256(login || password))`.
///
/// There is no per-user salt; the login only namespaces the digest. Kept as is
/// so existing `users` rows keep verifying.
pub fn password_hash(login: &str, password: &str) -> String {
    let mut sha = Sha256::new();
    sha.update(login.as_bytes());
    sha.update(password.as_bytes());
    hex_encode(&sha.finalize())
}
