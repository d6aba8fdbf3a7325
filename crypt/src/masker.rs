// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Passphrase key hints.
//!
//! A key hint reminds the user which passphrase sealed a record. It reveals
//! a prefix of the passphrase on purpose and is not a secret:
//!
//! | Length | Masked positions |
//! |--------|------------------|
//! | 0 | none |
//! | 1 | 0 |
//! | 2 | 1 |
//! | 3, 4 | last two |
//! | ≥ 5 | `len / 2` to the end |

use crate::constants::MASK_CHAR;

/// Masks the tail of `passphrase` for display as a key hint.
pub fn mask(passphrase: &str) -> String {
    let chars: Vec<char> = passphrase.chars().collect();
    let len = chars.len();

    let visible = match len {
        0 | 1 => 0,
        2 => 1,
        3 | 4 => len - 2,
        _ => len / 2,
    };

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible { *c } else { MASK_CHAR })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_short_passphrases() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("1"), "*");
        assert_eq!(mask("12"), "1*");
        assert_eq!(mask("123"), "1**");
        assert_eq!(mask("1234"), "12**");
    }

    #[test]
    fn test_mask_from_midpoint() {
        assert_eq!(mask("12345"), "12***");
        assert_eq!(mask("123456"), "123***");
        assert_eq!(mask("mySuperSecretKey"), "mySuperS********");
    }

    #[test]
    fn test_mask_counts_characters_not_bytes() {
        assert_eq!(mask("пароль"), "пар***");
    }

    #[test]
    fn test_mask_preserves_length() {
        for passphrase in ["a", "ab", "abc", "abcd", "abcdefghij"] {
            assert_eq!(mask(passphrase).chars().count(), passphrase.chars().count());
        }
    }
}
