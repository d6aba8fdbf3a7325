// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;
use zeroize::ZeroizeOnDrop;

use crate::constants::{
    MAX_KEY_HINT_LENGTH, MAX_LOGIN_LENGTH, MAX_METADATA_LENGTH, MAX_PASSWORD_LENGTH,
};

/// Opaque user identifier assigned by the metadata backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed, time-bounded identity token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Custom Debug implementation to prevent accidental logging of bearer tokens
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown record type: {0}")]
pub struct UnknownRecordType(pub i32);

/// Kind of secret a record holds. Encoded on the wire and in the `data`
/// table as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum RecordType {
    LoginPassword,
    File,
    Text,
    CreditCard,
}

impl TryFrom<i32> for RecordType {
    type Error = UnknownRecordType;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::LoginPassword),
            1 => Ok(Self::File),
            2 => Ok(Self::Text),
            3 => Ok(Self::CreditCard),
            other => Err(UnknownRecordType(other)),
        }
    }
}

impl From<RecordType> for i32 {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::LoginPassword => 0,
            RecordType::File => 1,
            RecordType::Text => 2,
            RecordType::CreditCard => 3,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoginPassword => "Login & password",
            Self::File => "File",
            Self::Text => "Text",
            Self::CreditCard => "Credit card",
        };
        f.write_str(name)
    }
}

/// A stored secret. `data` is ciphertext the server never interprets; it is
/// empty in listings and in the metadata row of a file record.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub record_type: RecordType,
    pub key_hint: String,
    pub metadata: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("record_type", &self.record_type)
            .field("key_hint", &self.key_hint)
            .field("metadata", &self.metadata)
            .field("data", &format_args!("{} bytes", self.data.len()))
            .finish()
    }
}

/// Login and password as handed to the metadata backend. By the time it gets
/// there `password` already holds the password digest.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize, Validate, ZeroizeOnDrop)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, max = MAX_LOGIN_LENGTH))]
    pub login: String,

    #[validate(length(min = 1, max = MAX_PASSWORD_LENGTH))]
    pub password: String,
}

impl fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: AuthToken,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRecordRequest {
    #[serde(rename = "type")]
    pub record_type: RecordType,

    #[serde(default)]
    #[validate(length(max = MAX_KEY_HINT_LENGTH))]
    pub keyhint: String,

    #[serde(default)]
    #[validate(length(max = MAX_METADATA_LENGTH))]
    pub metadata: String,

    #[serde(default, with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl From<CreateRecordRequest> for Record {
    fn from(request: CreateRecordRequest) -> Self {
        Self {
            id: String::new(),
            record_type: request.record_type,
            key_hint: request.keyhint,
            metadata: request.metadata,
            data: request.data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInfoResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub keyhint: String,
    pub metadata: String,
}

impl From<Record> for RecordInfoResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            record_type: record.record_type,
            keyhint: record.key_hint,
            metadata: record.metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub keyhint: String,
    pub metadata: String,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            record_type: record.record_type,
            keyhint: record.key_hint,
            metadata: record.metadata,
            data: record.data,
        }
    }
}

/// Ciphertext is carried as lowercase hex in JSON bodies.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use vault_crypt::utils::{hex_decode, hex_encode};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex_encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex_decode(&encoded).map_err(D::Error::custom)
    }
}
