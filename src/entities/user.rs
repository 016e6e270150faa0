use serde::{Deserialize, Serialize};

use crate::ids::{Name, UserId};

/// A registered user of the editing server.
///
/// The email address is unique across the user registry; the invariant is
/// enforced on insert, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: Name,
    pub email: String,
}

impl User {
    pub fn new(id: UserId, name: Name, email: impl Into<String>) -> Self {
        Self {
            id,
            name,
            email: email.into(),
        }
    }

    /// Copy of this user with a different display name. Registries use this
    /// for the remove/reconstruct/insert edit pattern.
    pub fn with_name(&self, name: Name) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }
}
