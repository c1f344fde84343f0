//! Hill cipher over the A-Z alphabet with 2-letter blocks.
//!
//! Text is folded to uppercase letters, padded with `X` to an even length and
//! pushed through the key matrix two letters at a time. Decryption runs the
//! cached inverse matrix and strips trailing `X` characters, which also eats
//! any `X` the plaintext legitimately ended with.

use super::matrix::{CipherError, KeyMatrix, DEFAULT_INVERSE, DEFAULT_KEY};

/// Letter appended to odd-length plaintext.
pub const PADDING: char = 'X';

const PADDING_VALUE: u8 = PADDING as u8 - b'A';

/// Hill cipher engine holding a key matrix and its modular inverse.
#[derive(Debug, Clone)]
pub struct HillCipher {
    key: KeyMatrix,
    inverse: KeyMatrix,
}

impl HillCipher {
    pub fn new(key: KeyMatrix) -> Result<Self, CipherError> {
        let inverse = key.inverse()?;
        Ok(Self { key, inverse })
    }

    /// Convenience constructor from raw integer rows.
    pub fn from_rows(rows: [[i64; 2]; 2]) -> Result<Self, CipherError> {
        Self::new(KeyMatrix::new(rows)?)
    }

    pub fn key(&self) -> &KeyMatrix {
        &self.key
    }

    pub fn inverse_key(&self) -> &KeyMatrix {
        &self.inverse
    }

    /// Maps letters to `0..26` (A=0). Anything that is not an ASCII letter is
    /// dropped.
    pub fn encode(text: &str) -> Vec<u8> {
        text.chars()
            .filter(char::is_ascii_alphabetic)
            .map(|ch| ch.to_ascii_uppercase() as u8 - b'A')
            .collect()
    }

    pub fn decode(numbers: &[u8]) -> String {
        numbers
            .iter()
            .map(|n| char::from(b'A' + n % 26))
            .collect()
    }

    /// Uppercases, removes spaces and pads to an even length with `X`.
    pub fn prepare(text: &str) -> String {
        let mut prepared: String = text.to_uppercase().chars().filter(|ch| *ch != ' ').collect();
        if prepared.chars().count() % 2 != 0 {
            prepared.push(PADDING);
        }
        prepared
    }

    /// Runs every consecutive pair of `numbers` through `matrix`.
    pub fn apply_blocks(matrix: &KeyMatrix, numbers: &[u8]) -> Result<Vec<u8>, CipherError> {
        if numbers.len() % 2 != 0 {
            return Err(CipherError::InvalidBlockLength { len: numbers.len() });
        }
        Ok(transform(matrix, numbers))
    }

    pub fn encrypt(&self, text: &str) -> String {
        let mut numbers = Self::encode(&Self::prepare(text));
        // prepare() counts characters encode() may still drop (digits, punctuation)
        if numbers.len() % 2 != 0 {
            numbers.push(PADDING_VALUE);
        }
        Self::decode(&transform(&self.key, &numbers))
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        let numbers = Self::encode(ciphertext);
        let plain = Self::apply_blocks(&self.inverse, &numbers)?;
        let text = Self::decode(&plain);
        Ok(text.trim_end_matches(PADDING).to_string())
    }
}

impl Default for HillCipher {
    fn default() -> Self {
        let [[a, b], [c, d]] = DEFAULT_KEY;
        Self {
            key: KeyMatrix::from_cells([[a as u32, b as u32], [c as u32, d as u32]]),
            inverse: KeyMatrix::from_cells(DEFAULT_INVERSE),
        }
    }
}

fn transform(matrix: &KeyMatrix, numbers: &[u8]) -> Vec<u8> {
    numbers
        .chunks_exact(2)
        .flat_map(|block| matrix.apply(block[0], block[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CipherError, HillCipher, KeyMatrix};
    use crate::crypto::matrix::DEFAULT_KEY;
    use proptest::prelude::*;

    #[test]
    fn default_matches_computed_inverse() {
        let computed = HillCipher::from_rows(DEFAULT_KEY).expect("default key is invertible");
        let fallback = HillCipher::default();
        assert_eq!(computed.key(), fallback.key());
        assert_eq!(computed.inverse_key(), fallback.inverse_key());
    }

    #[test]
    fn encrypts_known_block() {
        let cipher = HillCipher::default();
        assert_eq!(cipher.encrypt("HI"), "PJ");
        assert_eq!(cipher.encrypt("hi"), "PJ");
        assert_eq!(cipher.decrypt("PJ").unwrap(), "HI");
    }

    #[test]
    fn encode_drops_non_letters() {
        assert_eq!(HillCipher::encode("a-B 9z!"), vec![0, 1, 25]);
        assert_eq!(HillCipher::decode(&[0, 1, 25]), "ABZ");
    }

    #[test]
    fn prepare_strips_spaces_and_pads() {
        assert_eq!(HillCipher::prepare("ab c"), "ABCX");
        assert_eq!(HillCipher::prepare("Hill"), "HILL");
        assert_eq!(HillCipher::prepare(""), "");
    }

    #[test]
    fn odd_plaintext_round_trips_through_padding() {
        let cipher = HillCipher::default();
        let encrypted = cipher.encrypt("abc");
        assert_eq!(encrypted.len(), 4);
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "ABC");
    }

    #[test]
    fn trailing_x_in_plaintext_is_lost() {
        let cipher = HillCipher::default();
        let encrypted = cipher.encrypt("box");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "BO");
    }

    #[test]
    fn encrypt_repads_when_digits_are_dropped() {
        let cipher = HillCipher::default();
        // "AB1" prepares to "AB1X" but only three letters survive encoding
        let encrypted = cipher.encrypt("ab1");
        assert_eq!(encrypted.len(), 4);
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "AB");
    }

    #[test]
    fn rejects_odd_block_input() {
        let cipher = HillCipher::default();
        assert_eq!(
            cipher.decrypt("PJQ").unwrap_err(),
            CipherError::InvalidBlockLength { len: 3 }
        );
        let key = KeyMatrix::identity();
        assert!(HillCipher::apply_blocks(&key, &[1, 2, 3]).is_err());
        assert_eq!(HillCipher::apply_blocks(&key, &[1, 2]).unwrap(), vec![1, 2]);
    }

    #[test]
    fn custom_key_round_trips() {
        let cipher = HillCipher::from_rows([[3, 3], [2, 5]]).expect("det 9 is a unit");
        let encrypted = cipher.encrypt("help");
        assert_ne!(encrypted, "HELP");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "HELP");
    }

    #[test]
    fn singular_key_is_rejected() {
        assert!(matches!(
            HillCipher::from_rows([[2, 4], [6, 8]]),
            Err(CipherError::NotInvertible { .. })
        ));
    }

    proptest! {
        #[test]
        fn round_trip_recovers_prepared_text(text in "[a-zA-Z]{0,24}[a-wyzA-WYZ]") {
            let cipher = HillCipher::default();
            let prepared = HillCipher::prepare(&text);
            let encrypted = cipher.encrypt(&text);
            prop_assert_eq!(encrypted.len() % 2, 0);
            prop_assert_eq!(encrypted.len(), prepared.len());
            prop_assert_eq!(cipher.decrypt(&encrypted).unwrap(), prepared.trim_end_matches('X'));
        }
    }
}
