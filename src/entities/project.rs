use serde::{Deserialize, Serialize};

use crate::ids::{Description, Name, ProjectId, UserId};

/// A project hosted by the editing server. The owner is referenced by id;
/// ownership confers nothing by itself, permissions come from the policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: Name,
    pub description: Description,
    pub owner: UserId,
}

impl Project {
    pub fn new(id: ProjectId, name: Name, description: Description, owner: UserId) -> Self {
        Self {
            id,
            name,
            description,
            owner,
        }
    }

    pub fn with_name(&self, name: Name) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    pub fn with_description(&self, description: Description) -> Self {
        Self {
            description,
            ..self.clone()
        }
    }
}
