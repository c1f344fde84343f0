//! Thread-safe handle around [`CredentialStore`]. Each call holds the lock for
//! its whole read-modify-write, so concurrent sessions never interleave inside
//! a create, login or credential update.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::store::{CredentialStore, ServiceEntry, StoreError};

#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<CredentialStore>>,
}

impl SharedStore {
    pub fn new(store: CredentialStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CredentialStore>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn create_user(&self, identity: &str, password: &str) -> Result<(), StoreError> {
        self.lock()?.create_user(identity, password)
    }

    pub fn authenticate(&self, identity: &str, password: &str) -> Result<bool, StoreError> {
        self.lock()?.authenticate(identity, password)
    }

    pub fn set_service_credential(
        &self,
        identity: &str,
        service: &str,
        password: &str,
    ) -> Result<String, StoreError> {
        self.lock()?.set_service_credential(identity, service, password)
    }

    pub fn list_services(&self, identity: &str) -> Result<Vec<ServiceEntry>, StoreError> {
        self.lock()?.list_services(identity)
    }

    pub fn edit_service(
        &self,
        identity: &str,
        index: usize,
        new_password: &str,
    ) -> Result<String, StoreError> {
        self.lock()?.edit_service(identity, index, new_password)
    }

    pub fn user_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.user_count())
    }
}

#[cfg(test)]
mod tests {
    use super::SharedStore;
    use crate::store::StoreError;
    use std::thread;

    #[test]
    fn concurrent_creates_of_same_user_admit_exactly_one() {
        let shared = SharedStore::default();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.create_user("alice", "hello"))
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread should not panic"))
            .collect();
        let created = results.iter().filter(|result| result.is_ok()).count();
        assert_eq!(created, 1);
        assert!(results
            .iter()
            .filter_map(|result| result.as_ref().err())
            .all(|err| matches!(err, StoreError::DuplicateUser(_))));
        assert_eq!(shared.user_count().unwrap(), 1);
    }

    #[test]
    fn concurrent_service_writes_are_all_kept() {
        let shared = SharedStore::default();
        shared.create_user("alice", "hello").unwrap();

        let handles: Vec<_> = ["Gmail", "Slack", "Bank", "Forum"]
            .into_iter()
            .map(|service| {
                let shared = shared.clone();
                thread::spawn(move || shared.set_service_credential("alice", service, "pass"))
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread should not panic").unwrap();
        }

        let listing = shared.list_services("alice").unwrap();
        assert_eq!(listing.len(), 4);
        assert!(listing.iter().all(|entry| entry.plaintext.as_str() == "PASS"));
        shared.edit_service("alice", 1, "other").unwrap();
        assert!(shared.authenticate("alice", "hello").unwrap());
    }
}
