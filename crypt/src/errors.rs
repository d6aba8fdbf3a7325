// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptError {
    /// PKCS#7 padding did not verify after decryption. A wrong passphrase
    /// surfaces here.
    #[error("bad padding")]
    BadPadding,
    /// The ciphertext is shorter than one IV plus one block, or its body is
    /// not block aligned.
    #[error("malformed ciphertext: {0} bytes")]
    MalformedCiphertext(usize),
    #[error("invalid hex encoding")]
    InvalidHex,
}
