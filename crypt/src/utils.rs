// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use data_encoding::HEXLOWER_PERMISSIVE;

use crate::errors::CryptError;

#[inline]
pub fn hex_encode(input: &[u8]) -> String {
    data_encoding::HEXLOWER.encode(input)
}

#[inline]
pub fn hex_decode(input: &str) -> Result<Vec<u8>, CryptError> {
    HEXLOWER_PERMISSIVE
        .decode(input.as_bytes())
        .map_err(|_| CryptError::InvalidHex)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encode_is_lowercase() {
        assert_eq!(hex_encode(b"hello!"), "68656c6c6f21");
    }

    #[test]
    fn test_hex_decode_accepts_uppercase() {
        assert_eq!(hex_decode("68656C6C6F21").unwrap(), b"hello!");
    }

    #[test]
    fn test_hex_decode_empty() {
        assert!(hex_decode("").unwrap().is_empty());
    }

    #[test]
    fn test_hex_decode_rejects_odd_length() {
        assert_eq!(hex_decode("abc"), Err(CryptError::InvalidHex));
    }
}
