//! Console password manager that keeps master and service passwords in memory,
//! obfuscated with a 2x2 Hill cipher. The cipher is a classroom cipher, not a
//! security boundary: anyone holding one known plaintext can recover the key.

pub mod config;
pub mod crypto;
pub mod shared;
pub mod shell;
pub mod store;

pub use crypto::{CipherError, HillCipher, KeyMatrix};
pub use shared::SharedStore;
pub use store::{CredentialStore, ServiceEntry, StoreError};
