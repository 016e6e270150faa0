//! Stored credentials, one salted digest per user.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::hasher::{Salt, SaltedPasswordDigest};
use crate::errors::CredentialError;
use crate::ids::UserId;

/// Compare two hash buffers without leaking where (or whether) they differ
/// through timing. XOR-accumulates over the full length of both buffers and
/// folds the length mismatch into the same accumulator, so a mismatch at
/// byte 0 costs exactly as much as a mismatch at the last byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}

/// Per-user credential store. At most one digest per user; replacing one
/// goes through [`change_password`](Self::change_password).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRegistry {
    credentials: HashMap<UserId, SaltedPasswordDigest>,
}

impl CredentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        user: UserId,
        digest: SaltedPasswordDigest,
    ) -> Result<(), CredentialError> {
        if self.credentials.contains_key(&user) {
            return Err(CredentialError::AlreadyRegistered(user));
        }
        self.credentials.insert(user, digest);
        Ok(())
    }

    pub fn unregister(&mut self, user: &UserId) -> Result<(), CredentialError> {
        self.credentials
            .remove(user)
            .map(|_| ())
            .ok_or_else(|| CredentialError::NotRegistered(user.clone()))
    }

    /// Replace a user's stored digest. Unregister-then-register; no caller
    /// can observe the gap between the two.
    pub fn change_password(
        &mut self,
        user: &UserId,
        digest: SaltedPasswordDigest,
    ) -> Result<(), CredentialError> {
        self.unregister(user)?;
        self.register(user.clone(), digest)
    }

    /// The salt a login attempt must re-hash the submitted password with.
    pub fn salt(&self, user: &UserId) -> Result<&Salt, CredentialError> {
        self.credentials
            .get(user)
            .map(SaltedPasswordDigest::salt)
            .ok_or_else(|| CredentialError::NotRegistered(user.clone()))
    }

    /// Does the candidate digest match the stored one? The comparison is
    /// constant-time over the hash bytes. Fails (rather than answering
    /// `false`) when the user has no stored credentials; the caller decides
    /// what an absent credential means.
    pub fn has_valid_credentials(
        &self,
        user: &UserId,
        candidate: &SaltedPasswordDigest,
    ) -> Result<bool, CredentialError> {
        let stored = self
            .credentials
            .get(user)
            .ok_or_else(|| CredentialError::NotRegistered(user.clone()))?;
        Ok(constant_time_eq(stored.hash_bytes(), candidate.hash_bytes()))
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.credentials.contains_key(user)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
