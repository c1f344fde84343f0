//! In-memory credential store. Each user owns a Hill-encrypted master password
//! and an insertion-ordered list of Hill-encrypted service passwords. Nothing
//! is written to disk; the store lives as long as the session that owns it.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{CipherError, HillCipher, PADDING};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("password must contain only letters (A-Z)")]
    InvalidPasswordFormat,
    #[error("user already exists: {0}")]
    DuplicateUser(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("service number {index} is out of range (1-{len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),
    #[error("credential store lock poisoned")]
    Poisoned,
}

/// One stored service password, kept encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCredential {
    pub name: String,
    pub ciphertext: String,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub identity: String,
    pub master_ciphertext: String,
    services: Vec<ServiceCredential>,
}

impl UserRecord {
    pub fn services(&self) -> &[ServiceCredential] {
        &self.services
    }

    fn upsert(&mut self, name: &str, ciphertext: String) {
        match self.services.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.ciphertext = ciphertext,
            None => self.services.push(ServiceCredential {
                name: name.to_string(),
                ciphertext,
            }),
        }
    }
}

/// A decrypted row of a user's service listing. `index` is 1-based.
#[derive(Debug)]
pub struct ServiceEntry {
    pub index: usize,
    pub service: String,
    pub ciphertext: String,
    pub plaintext: Zeroizing<String>,
}

/// Passwords are restricted to the cipher alphabet: at least one letter,
/// nothing but ASCII letters.
pub fn is_valid_password(password: &str) -> bool {
    !password.is_empty() && password.chars().all(|ch| ch.is_ascii_alphabetic())
}

fn check_password(password: &str) -> Result<(), StoreError> {
    if is_valid_password(password) {
        Ok(())
    } else {
        Err(StoreError::InvalidPasswordFormat)
    }
}

#[derive(Debug, Default)]
pub struct CredentialStore {
    cipher: HillCipher,
    users: HashMap<String, UserRecord>,
}

impl CredentialStore {
    pub fn new(cipher: HillCipher) -> Self {
        Self {
            cipher,
            users: HashMap::new(),
        }
    }

    pub fn cipher(&self) -> &HillCipher {
        &self.cipher
    }

    pub fn contains_user(&self, identity: &str) -> bool {
        self.users.contains_key(identity)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn user(&self, identity: &str) -> Result<&UserRecord, StoreError> {
        self.users
            .get(identity)
            .ok_or_else(|| StoreError::UserNotFound(identity.to_string()))
    }

    fn user_mut(&mut self, identity: &str) -> Result<&mut UserRecord, StoreError> {
        self.users
            .get_mut(identity)
            .ok_or_else(|| StoreError::UserNotFound(identity.to_string()))
    }

    pub fn create_user(&mut self, identity: &str, password: &str) -> Result<(), StoreError> {
        if self.users.contains_key(identity) {
            return Err(StoreError::DuplicateUser(identity.to_string()));
        }
        check_password(password)?;
        if password.to_ascii_uppercase().ends_with(PADDING) {
            warn!(user = %identity, "master password ends in the padding letter and will not decrypt intact");
        }

        let record = UserRecord {
            identity: identity.to_string(),
            master_ciphertext: self.cipher.encrypt(password),
            services: Vec::new(),
        };
        self.users.insert(identity.to_string(), record);
        info!(user = %identity, "user created");
        Ok(())
    }

    /// Decrypts the stored master password and compares it with the
    /// uppercased input. A mismatch has no side effects.
    pub fn authenticate(&self, identity: &str, password: &str) -> Result<bool, StoreError> {
        let record = self.user(identity)?;
        check_password(password)?;

        let stored = Zeroizing::new(self.cipher.decrypt(&record.master_ciphertext)?);
        let matches = *stored == password.to_ascii_uppercase();
        debug!(user = %identity, matches, "authentication attempt");
        Ok(matches)
    }

    /// Encrypts and stores a service password, replacing any existing entry
    /// with the same name in place. Returns the stored ciphertext.
    pub fn set_service_credential(
        &mut self,
        identity: &str,
        service: &str,
        password: &str,
    ) -> Result<String, StoreError> {
        check_password(password)?;
        let ciphertext = self.cipher.encrypt(password);
        let record = self.user_mut(identity)?;
        record.upsert(service, ciphertext.clone());
        info!(user = %identity, service = %service, "service credential stored");
        Ok(ciphertext)
    }

    pub fn list_services(&self, identity: &str) -> Result<Vec<ServiceEntry>, StoreError> {
        let record = self.user(identity)?;
        record
            .services
            .iter()
            .enumerate()
            .map(|(position, entry)| -> Result<ServiceEntry, StoreError> {
                Ok(ServiceEntry {
                    index: position + 1,
                    service: entry.name.clone(),
                    ciphertext: entry.ciphertext.clone(),
                    plaintext: Zeroizing::new(self.cipher.decrypt(&entry.ciphertext)?),
                })
            })
            .collect()
    }

    /// Resolves a 1-based position in the current listing to a service name.
    pub fn service_name(&self, identity: &str, index: usize) -> Result<String, StoreError> {
        let services = &self.user(identity)?.services;
        index
            .checked_sub(1)
            .and_then(|position| services.get(position))
            .map(|entry| entry.name.clone())
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: services.len(),
            })
    }

    pub fn edit_service(
        &mut self,
        identity: &str,
        index: usize,
        new_password: &str,
    ) -> Result<String, StoreError> {
        let service = self.service_name(identity, index)?;
        self.set_service_credential(identity, &service, new_password)
    }
}
