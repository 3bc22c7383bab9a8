//! Credential hashing port

use crate::shared::DomainResult;

/// One-way hash plus verification of plaintext credentials.
///
/// The algorithm is the implementor's business; services only ever see
/// the opaque hash string.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, plaintext: &str) -> DomainResult<String>;
    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool>;
}
