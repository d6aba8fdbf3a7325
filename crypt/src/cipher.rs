// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Record payload encryption.
//!
//! Every call to [`encrypt`] draws a fresh random IV, so sealing the same
//! plaintext twice never yields the same bytes. [`decrypt`] verifies the
//! PKCS#7 padding, which is how a wrong passphrase is detected: CBC itself
//! carries no integrity check.

use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::constants::{BLOCK_SIZE, KEY_SIZE};
use crate::errors::CryptError;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Derives the record key from a passphrase.
fn derive_key(passphrase: &str) -> Zeroizing<[u8; KEY_SIZE]> {
    let digest = Md5::digest(passphrase.as_bytes());
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    key.copy_from_slice(&digest);
    key
}

/// Encrypts `plaintext` under `passphrase`, returning `IV || ciphertext`.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Vec<u8> {
    let key = derive_key(passphrase);

    let mut iv = [0u8; BLOCK_SIZE];
    OsRng.fill_bytes(&mut iv);

    let body = Aes128CbcEnc::new(&(*key).into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut sealed = Vec::with_capacity(BLOCK_SIZE + body.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&body);
    sealed
}

/// Decrypts `IV || ciphertext` produced by [`encrypt`].
///
/// # Errors
///
/// - [`CryptError::MalformedCiphertext`] if the input cannot hold an IV and
///   at least one whole block
/// - [`CryptError::BadPadding`] if the padding does not verify (wrong
///   passphrase or corrupted data)
pub fn decrypt(sealed: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptError> {
    if sealed.len() < 2 * BLOCK_SIZE || sealed.len() % BLOCK_SIZE != 0 {
        return Err(CryptError::MalformedCiphertext(sealed.len()));
    }

    let (iv, body) = sealed.split_at(BLOCK_SIZE);
    let mut iv_block = [0u8; BLOCK_SIZE];
    iv_block.copy_from_slice(iv);

    let key = derive_key(passphrase);

    Aes128CbcDec::new(&(*key).into(), &iv_block.into())
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| CryptError::BadPadding)
}
