// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::errors::ClientError;

/// Separator between credit card fields. The two literal characters `/` and
/// `t` are what existing records contain, not a tab.
const CARD_SEPARATOR: &str = "/t";
const LOGIN_SEPARATOR: char = ':';

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(pub String);

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// What the user types to register or log in. The passphrase never leaves
/// the client.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credentials {
    pub login: String,
    pub password: String,
    pub passphrase: String,
}

impl Credentials {
    pub fn new(login: &str, password: &str, passphrase: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
            passphrase: passphrase.to_string(),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.login.is_empty() && !self.password.is_empty() && !self.passphrase.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum RecordType {
    LoginPassword,
    File,
    Text,
    CreditCard,
}

impl TryFrom<i32> for RecordType {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::LoginPassword),
            1 => Ok(Self::File),
            2 => Ok(Self::Text),
            3 => Ok(Self::CreditCard),
            other => Err(format!("unknown record type {other}")),
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

/// Listing entry, without ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(rename = "keyhint", default)]
    pub key_hint: String,
    #[serde(default)]
    pub metadata: String,
}

/// A record as it travels: `data` is ciphertext, hex encoded on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(rename = "keyhint", default)]
    pub key_hint: String,
    #[serde(default)]
    pub metadata: String,
    #[serde(default, with = "hex_bytes")]
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

/// Decrypted record contents.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub enum RecordPayload {
    LoginPassword { login: String, password: String },
    Text(String),
    CreditCard {
        number: String,
        expiration: String,
        cvc: String,
    },
    File(Vec<u8>),
}

impl RecordPayload {
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::LoginPassword { .. } => RecordType::LoginPassword,
            Self::Text(_) => RecordType::Text,
            Self::CreditCard { .. } => RecordType::CreditCard,
            Self::File(_) => RecordType::File,
        }
    }

    /// Plaintext bytes that get encrypted into the record.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let bytes = match self {
            Self::LoginPassword { login, password } => {
                format!("{login}{LOGIN_SEPARATOR}{password}").into_bytes()
            }
            Self::Text(text) => text.as_bytes().to_vec(),
            Self::CreditCard {
                number,
                expiration,
                cvc,
            } => [number.as_str(), expiration.as_str(), cvc.as_str()]
                .join(CARD_SEPARATOR)
                .into_bytes(),
            Self::File(bytes) => bytes.clone(),
        };
        Zeroizing::new(bytes)
    }

    /// Text-based payloads that do not decode are treated as decrypted with
    /// the wrong key.
    pub fn from_bytes(record_type: RecordType, bytes: Vec<u8>) -> Result<Self, ClientError> {
        if record_type == RecordType::File {
            return Ok(Self::File(bytes));
        }

        let text = Zeroizing::new(String::from_utf8(bytes).map_err(|_| ClientError::WrongKey)?);
        match record_type {
            RecordType::LoginPassword => {
                let (login, password) = text
                    .split_once(LOGIN_SEPARATOR)
                    .ok_or(ClientError::WrongKey)?;
                Ok(Self::LoginPassword {
                    login: login.to_string(),
                    password: password.to_string(),
                })
            }
            RecordType::CreditCard => {
                let mut fields = text.splitn(3, CARD_SEPARATOR);
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(number), Some(expiration), Some(cvc)) => Ok(Self::CreditCard {
                        number: number.to_string(),
                        expiration: expiration.to_string(),
                        cvc: cvc.to_string(),
                    }),
                    _ => Err(ClientError::WrongKey),
                }
            }
            RecordType::Text | RecordType::File => Ok(Self::Text(text.to_string())),
        }
    }
}

impl fmt::Debug for RecordPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordPayload({:?}, [REDACTED])", self.record_type())
    }
}

/// A record fetched and decrypted by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedRecord {
    pub info: RecordInfo,
    pub payload: RecordPayload,
}

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
