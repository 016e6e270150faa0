//! Credential storage and verification.
//!
//! The server stores salted PBKDF2 digests, never plaintext. The one place
//! a plaintext password exists inside this crate is [`Authenticator`], which
//! feeds it straight into the hasher and returns an [`AuthToken`].

pub mod hasher;
pub mod registry;

pub use hasher::{PasswordHasher, Salt, SaltGenerator, SaltedPasswordDigest};
pub use registry::CredentialRegistry;

use crate::entities::User;
use crate::ids::UserId;
use crate::registry::UserRegistry;

/// Outcome of a login attempt, handed back across the authentication
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthToken {
    Authorized(User),
    Unauthorized(UserId),
}

impl AuthToken {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthToken::Authorized(_))
    }

    pub fn user_id(&self) -> &UserId {
        match self {
            AuthToken::Authorized(user) => &user.id,
            AuthToken::Unauthorized(id) => id,
        }
    }
}

/// The login flow: fetch the stored salt, re-hash the submitted password
/// with the same parameters, compare in constant time. Every failure path
/// (unknown user, no stored credentials, digest mismatch) collapses to
/// `Unauthorized`.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    hasher: PasswordHasher,
}

impl Authenticator {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self { hasher }
    }

    pub fn authenticate(
        &self,
        users: &UserRegistry,
        credentials: &CredentialRegistry,
        user_id: &UserId,
        password: &str,
    ) -> AuthToken {
        let Ok(user) = users.get(user_id) else {
            return AuthToken::Unauthorized(user_id.clone());
        };
        let Ok(salt) = credentials.salt(user_id) else {
            return AuthToken::Unauthorized(user_id.clone());
        };

        let candidate = self.hasher.hash(password, salt);
        match credentials.has_valid_credentials(user_id, &candidate) {
            Ok(true) => AuthToken::Authorized(user.clone()),
            Ok(false) | Err(_) => {
                tracing::debug!(user = %user_id, "Rejected credentials");
                AuthToken::Unauthorized(user_id.clone())
            }
        }
    }
}
