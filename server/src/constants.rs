// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

/// Request header carrying the bearer token. Header names are matched
/// case-insensitively, so clients may send `authToken`.
pub const AUTH_TOKEN_HEADER: &str = "authtoken";

/// Deadline applied to every metadata backend call
pub const DB_QUERY_TIMEOUT: Duration = Duration::from_secs(5);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const GRACEFUL_SHUTDOWN_PERIOD: Duration = Duration::from_secs(30);
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 120;

/// File records travel inline in the request body, hex encoded, so each
/// byte of ciphertext costs two bytes of body.
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024; // 16 MiB

/// Room left in a body for the JSON envelope around `data`
pub const BODY_ENVELOPE_RESERVE: usize = 64 * 1024;

/// Largest ciphertext a single create request can carry, a little under 8 MiB
pub const MAX_RECORD_DATA_SIZE: usize = (MAX_BODY_SIZE - BODY_ENVELOPE_RESERVE) / 2;

// Validation constants for request bodies
pub const MAX_LOGIN_LENGTH: u64 = 256;
pub const MAX_PASSWORD_LENGTH: u64 = 1024;
pub const MAX_METADATA_LENGTH: u64 = 4096;
pub const MAX_KEY_HINT_LENGTH: u64 = 1024;
