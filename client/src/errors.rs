// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("field is empty")]
    EmptyField,
    #[error("login already exists")]
    LoginExists,
    #[error("wrong login or password")]
    WrongCredentials,
    #[error("user is unauthenticated")]
    Unauthenticated,
    #[error("record not found")]
    NotFound,
    #[error("wrong encryption key")]
    WrongKey,
    #[error("internal error")]
    Unknown,
    #[error("unable to reach server: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(source: reqwest::Error) -> Self {
        tracing::warn!("[client] request failed: {:?}", source);
        ClientError::Transport(source.to_string())
    }
}

impl From<vault_crypt::CryptError> for ClientError {
    fn from(source: vault_crypt::CryptError) -> Self {
        tracing::info!("[client] unable to decrypt record: {}", source);
        ClientError::WrongKey
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_crypt::CryptError;

    #[test]
    fn test_crypt_errors_mean_wrong_key() {
        assert_eq!(ClientError::from(CryptError::BadPadding), ClientError::WrongKey);
        assert_eq!(
            ClientError::from(CryptError::MalformedCiphertext(3)),
            ClientError::WrongKey
        );
    }
}
