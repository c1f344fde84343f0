//! Cipher engine and hashing helpers. The Hill cipher lives in `hill`, the
//! modular matrix arithmetic it relies on in `matrix`, and config
//! fingerprinting in `integrity`.

pub mod hill;
pub mod integrity;
pub mod matrix;

pub use hill::{HillCipher, PADDING};
pub use matrix::{CipherError, KeyMatrix, DEFAULT_KEY, MODULUS};
