use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ids::{Description, Name, OperationId, RoleId};

/// A named bundle of operations. Users are granted roles per project (or
/// universally) through the policy; a role never knows who holds it.
///
/// Nothing checks that the referenced operation ids still resolve; the
/// engine skips dangling ids at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: Name,
    pub description: Description,
    pub operations: HashSet<OperationId>,
}

impl Role {
    pub fn new(
        id: RoleId,
        name: Name,
        description: Description,
        operations: impl IntoIterator<Item = OperationId>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            operations: operations.into_iter().collect(),
        }
    }

    pub fn grants(&self, operation: &OperationId) -> bool {
        self.operations.contains(operation)
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

    /// Copy of this role with extra operations granted.
    pub fn with_operations(&self, operations: impl IntoIterator<Item = OperationId>) -> Self {
        let mut copy = self.clone();
        copy.operations.extend(operations);
        copy
    }

    /// Copy of this role with the given operations retracted.
    pub fn without_operations<'a>(
        &self,
        operations: impl IntoIterator<Item = &'a OperationId>,
    ) -> Self {
        let mut copy = self.clone();
        for op in operations {
            copy.operations.remove(op);
        }
        copy
    }
}
