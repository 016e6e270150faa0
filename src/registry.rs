//! CRUD stores for the four entity kinds.
//!
//! All stores share one generic map keyed by entity id. Entities are never
//! mutated in place: an edit removes the old value, rebuilds a copy with the
//! changed field and inserts it back under the same id.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::entities::{builtin_operations, Operation, Project, Role, User};
use crate::errors::RegistryError;
use crate::ids::{Description, Name, OperationId, ProjectId, RoleId, UserId};

/// An entity that can live in a [`Registry`].
pub trait Record: Clone {
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display;

    fn id(&self) -> &Self::Id;
}

impl Record for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

impl Record for Role {
    type Id = RoleId;

    fn id(&self) -> &RoleId {
        &self.id
    }
}

impl Record for Operation {
    type Id = OperationId;

    fn id(&self) -> &OperationId {
        &self.id
    }
}

impl Record for Project {
    type Id = ProjectId;

    fn id(&self) -> &ProjectId {
        &self.id
    }
}

/// Generic id-keyed store enforcing id uniqueness.
#[derive(Debug, Clone)]
pub struct Registry<T: Record> {
    entries: HashMap<T::Id, T>,
}

impl<T: Record> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Record> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one entity. Fails with `IdAlreadyInUse` on collision and
    /// leaves the store unchanged.
    pub fn insert(&mut self, entity: T) -> Result<(), RegistryError> {
        if self.entries.contains_key(entity.id()) {
            return Err(RegistryError::IdAlreadyInUse(entity.id().to_string()));
        }
        self.entries.insert(entity.id().clone(), entity);
        Ok(())
    }

    /// Insert many entities. Per-element, not transactional: entities before
    /// the first collision stay inserted.
    pub fn insert_all(&mut self, entities: impl IntoIterator<Item = T>) -> Result<(), RegistryError> {
        for entity in entities {
            self.insert(entity)?;
        }
        Ok(())
    }

    /// Remove by id. Silently a no-op when the id is absent.
    pub fn remove(&mut self, id: &T::Id) {
        self.entries.remove(id);
    }

    pub fn get(&self, id: &T::Id) -> Result<&T, RegistryError> {
        self.entries
            .get(id)
            .ok_or_else(|| RegistryError::UnknownId(id.to_string()))
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The remove/reconstruct/insert edit pattern. `rebuild` receives the
    /// current value and returns the replacement, which is inserted under
    /// its (normally unchanged) id.
    fn replace(&mut self, id: &T::Id, rebuild: impl FnOnce(&T) -> T) -> Result<(), RegistryError> {
        let current = self.get(id)?.clone();
        self.remove(id);
        self.insert(rebuild(&current))
    }
}

/// User store. Enforces email uniqueness on top of id uniqueness.
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    inner: Registry<User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user: User) -> Result<(), RegistryError> {
        if self.inner.contains(&user.id) {
            return Err(RegistryError::IdAlreadyInUse(user.id.to_string()));
        }
        if self.inner.iter().any(|u| u.email == user.email) {
            return Err(RegistryError::EmailAlreadyInUse(user.email));
        }
        self.inner.insert(user)
    }

    pub fn insert_all(&mut self, users: impl IntoIterator<Item = User>) -> Result<(), RegistryError> {
        for user in users {
            self.insert(user)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &UserId) {
        self.inner.remove(id);
    }

    pub fn get(&self, id: &UserId) -> Result<&User, RegistryError> {
        self.inner.get(id)
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn rename(&mut self, id: &UserId, name: Name) -> Result<(), RegistryError> {
        self.inner.replace(id, |user| user.with_name(name))
    }
}

/// Role store. Also hosts the read-modify-write helpers for a role's
/// operation set.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    inner: Registry<Role>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: Role) -> Result<(), RegistryError> {
        self.inner.insert(role)
    }

    pub fn insert_all(&mut self, roles: impl IntoIterator<Item = Role>) -> Result<(), RegistryError> {
        self.inner.insert_all(roles)
    }

    pub fn remove(&mut self, id: &RoleId) {
        self.inner.remove(id);
    }

    pub fn get(&self, id: &RoleId) -> Result<&Role, RegistryError> {
        self.inner.get(id)
    }

    pub fn contains(&self, id: &RoleId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn rename(&mut self, id: &RoleId, name: Name) -> Result<(), RegistryError> {
        self.inner.replace(id, |role| role.with_name(name))
    }

    pub fn redescribe(&mut self, id: &RoleId, description: Description) -> Result<(), RegistryError> {
        self.inner.replace(id, |role| role.with_description(description))
    }

    /// Grant extra operations to a role.
    pub fn add_operations(
        &mut self,
        id: &RoleId,
        operations: impl IntoIterator<Item = OperationId>,
    ) -> Result<(), RegistryError> {
        self.inner.replace(id, |role| role.with_operations(operations))
    }

    /// Retract operations from a role. Absent operation ids are ignored.
    pub fn remove_operations(
        &mut self,
        id: &RoleId,
        operations: &[OperationId],
    ) -> Result<(), RegistryError> {
        self.inner.replace(id, |role| role.without_operations(operations))
    }
}

/// Operation store. Refuses to rename system (built-in) operations.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    inner: Registry<Operation>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-seeded with the built-in operation table.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let ops = builtin_operations();
        let count = ops.len();
        registry
            .inner
            .insert_all(ops)
            .expect("built-in operation ids are unique");
        tracing::debug!(count, "Seeded built-in operations");
        registry
    }

    pub fn insert(&mut self, operation: Operation) -> Result<(), RegistryError> {
        self.inner.insert(operation)
    }

    pub fn insert_all(
        &mut self,
        operations: impl IntoIterator<Item = Operation>,
    ) -> Result<(), RegistryError> {
        self.inner.insert_all(operations)
    }

    pub fn remove(&mut self, id: &OperationId) {
        self.inner.remove(id);
    }

    pub fn get(&self, id: &OperationId) -> Result<&Operation, RegistryError> {
        self.inner.get(id)
    }

    pub fn contains(&self, id: &OperationId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn rename(&mut self, id: &OperationId, name: Name) -> Result<(), RegistryError> {
        if self.inner.get(id)?.system {
            return Err(RegistryError::SystemOperation(id.to_string()));
        }
        self.inner.replace(id, |op| op.with_name(name))
    }

    pub fn redescribe(
        &mut self,
        id: &OperationId,
        description: Description,
    ) -> Result<(), RegistryError> {
        self.inner.replace(id, |op| op.with_description(description))
    }
}

/// Project store.
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    inner: Registry<Project>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project: Project) -> Result<(), RegistryError> {
        self.inner.insert(project)
    }

    pub fn insert_all(
        &mut self,
        projects: impl IntoIterator<Item = Project>,
    ) -> Result<(), RegistryError> {
        self.inner.insert_all(projects)
    }

    pub fn remove(&mut self, id: &ProjectId) {
        self.inner.remove(id);
    }

    pub fn get(&self, id: &ProjectId) -> Result<&Project, RegistryError> {
        self.inner.get(id)
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn rename(&mut self, id: &ProjectId, name: Name) -> Result<(), RegistryError> {
        self.inner.replace(id, |project| project.with_name(name))
    }

    pub fn redescribe(
        &mut self,
        id: &ProjectId,
        description: Description,
    ) -> Result<(), RegistryError> {
        self.inner.replace(id, |project| project.with_description(description))
    }
}
