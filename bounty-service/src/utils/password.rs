use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Newtype for the stored password digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(digest: String) -> Self {
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Digest a password as base64(SHA-256(utf8 bytes)).
///
/// Unsalted and deterministic so digests written by existing deployments
/// keep verifying.
pub fn digest_password(password: &Password) -> PasswordDigest {
    let hash = Sha256::digest(password.as_str().as_bytes());
    PasswordDigest::new(STANDARD.encode(hash))
}

/// Check a password against a stored digest in constant time.
pub fn verify_password(password: &Password, stored: &PasswordDigest) -> bool {
    let computed = digest_password(password);
    computed
        .as_str()
        .as_bytes()
        .ct_eq(stored.as_str().as_bytes())
        .into()
}
