//! Entity records managed by the registries.
//!
//! Entities are plain immutable values that reference each other by id only.
//! [`Entity`] is the closed sum over every kind the access-control state
//! manages; orchestration code matches it exhaustively instead of inspecting
//! types at runtime.

pub mod operation;
pub mod project;
pub mod role;
pub mod user;

pub use operation::{builtin as builtin_operations, Operation, OperationKind, OperationScope};
pub use project::Project;
pub use role::Role;
pub use user::User;

/// Closed sum over the entity kinds. Used by
/// [`AccessState`](crate::engine::AccessState) to dispatch inserts and
/// removals to the matching registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    User(User),
    Role(Role),
    Operation(Operation),
    Project(Project),
}

impl From<User> for Entity {
    fn from(user: User) -> Self {
        Entity::User(user)
    }
}

impl From<Role> for Entity {
    fn from(role: Role) -> Self {
        Entity::Role(role)
    }
}

impl From<Operation> for Entity {
    fn from(operation: Operation) -> Self {
        Entity::Operation(operation)
    }
}

impl From<Project> for Entity {
    fn from(project: Project) -> Self {
        Entity::Project(project)
    }
}
