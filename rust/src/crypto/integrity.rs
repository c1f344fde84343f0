//! SHA-256 fingerprints for configuration files so operators can tell which
//! key material a session was started with without printing the key itself.

use sha2::{Digest, Sha256};

/// Produces a raw SHA-256 digest of the provided bytes.
pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Returns the hexadecimal representation of a SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = sha256_digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::{sha256_digest, sha256_hex};

    #[test]
    fn hashes_to_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_and_hex_agree() {
        let digest = sha256_digest(b"{\"keyMatrix\": [[5, 4], [21, 25]]}");
        let hex = sha256_hex(b"{\"keyMatrix\": [[5, 4], [21, 25]]}");
        assert_eq!(hex.len(), 64);
        assert_eq!(&hex[..2], format!("{:02x}", digest[0]));
    }
}
