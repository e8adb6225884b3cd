//! Password hashing utilities

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// bcrypt hasher with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password using bcrypt
    pub fn hash(&self, password: &str) -> Result<String, BcryptError> {
        hash(password, self.cost)
    }

    /// Verify a password against a hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, BcryptError> {
        verify(password, hash)
    }

    /// Whether `hash` was produced with a different cost than the current
    /// one. Unparseable hashes are reported as needing a rehash.
    pub fn needs_rehash(&self, hash: &str) -> bool {
        hash_cost(hash) != Some(self.cost)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

/// Cost segment of a modular-crypt bcrypt hash (`$2b$12$...`).
fn hash_cost(hash: &str) -> Option<u32> {
    let mut parts = hash.split('$');
    parts.next()?;
    parts.next()?;
    parts.next()?.parse().ok()
}
