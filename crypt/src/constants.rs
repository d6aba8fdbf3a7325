// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// AES block size, which is also the IV length prepended to every ciphertext.
pub const BLOCK_SIZE: usize = 16;

/// Length of the record key (an MD5 digest).
pub const KEY_SIZE: usize = 16;

/// Character used to hide the tail of a passphrase in key hints.
pub const MASK_CHAR: char = '*';
