//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::{CredentialVerifier, DomainError, DomainResult};

/// bcrypt-backed [`CredentialVerifier`].
#[derive(Debug, Clone)]
pub struct BcryptCredentialVerifier {
    cost: u32,
}

impl BcryptCredentialVerifier {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptCredentialVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl CredentialVerifier for BcryptCredentialVerifier {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        hash(plaintext, self.cost)
            .map_err(|e| DomainError::Credential(format!("Failed to hash password: {}", e)))
    }

    /// bcrypt compares digests in constant time. A malformed stored hash is an
    /// error, not a mismatch.
    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        verify(plaintext, hash)
            .map_err(|e| DomainError::Credential(format!("Failed to verify password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> BcryptCredentialVerifier {
        BcryptCredentialVerifier::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hashed = verifier().hash(password).unwrap();

        assert_ne!(hashed, password);
        assert!(verifier().verify(password, &hashed).unwrap());
        assert!(!verifier().verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = verifier().verify("anything", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, DomainError::Credential(_)));
    }

    #[test]
    fn default_uses_bcrypt_default_cost() {
        assert_eq!(BcryptCredentialVerifier::default().cost(), DEFAULT_COST);
    }
}
