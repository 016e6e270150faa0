//! Resolution and orchestration over the registries and the policy.
//!
//! [`AccessState`] owns the four registries plus the policy and answers the
//! one question the rest of the server asks: is this operation allowed for
//! this user in this project? Resolution is fail-safe deny — an unknown
//! user, an unknown project or a dangling id can make the answer `false`,
//! never an error and never an accidental grant.

use std::collections::HashSet;

use crate::entities::{Entity, Operation, Project, Role};
use crate::errors::RegistryError;
use crate::ids::{OperationId, ProjectId, RoleId, UserId};
use crate::policy::Policy;
use crate::registry::{OperationRegistry, ProjectRegistry, RoleRegistry, UserRegistry};

/// The combined access-control state of one server instance.
///
/// Registries and policy are plain fields: read paths may query them
/// directly, but mutation of whole entities should go through
/// [`insert`](Self::insert) / [`remove`](Self::remove) so removals cascade
/// into the policy.
#[derive(Debug, Clone, Default)]
pub struct AccessState {
    pub users: UserRegistry,
    pub roles: RoleRegistry,
    pub operations: OperationRegistry,
    pub projects: ProjectRegistry,
    pub policy: Policy,
}

impl AccessState {
    /// Empty state with the built-in operations seeded.
    pub fn new() -> Self {
        Self {
            operations: OperationRegistry::with_builtins(),
            ..Self::default()
        }
    }

    /// Assemble a state from previously built parts, e.g. out of an external
    /// configuration loader. The parts are trusted to be internally
    /// consistent; nothing is revalidated here.
    pub fn from_parts(
        users: UserRegistry,
        roles: RoleRegistry,
        operations: OperationRegistry,
        projects: ProjectRegistry,
        policy: Policy,
    ) -> Self {
        Self {
            users,
            roles,
            operations,
            projects,
            policy,
        }
    }

    /// The role ids effective for a user in a project: the project's own
    /// grants unioned with the universal-scope grants. Absence of either is
    /// swallowed.
    fn effective_roles(&self, user: &UserId, project: &ProjectId) -> HashSet<RoleId> {
        let mut role_ids = HashSet::new();
        if let Ok(roles) = self.policy.roles_in_project(user, project) {
            role_ids.extend(roles.iter().cloned());
        }
        if let Ok(roles) = self.policy.roles_in_project(user, &ProjectId::universal()) {
            role_ids.extend(roles.iter().cloned());
        }
        role_ids
    }

    /// Is the operation allowed for the user in the project? True iff any
    /// effective role that still resolves in the role registry grants it.
    /// Role ids that no longer resolve are skipped.
    pub fn is_operation_allowed(
        &self,
        operation: &OperationId,
        project: &ProjectId,
        user: &UserId,
    ) -> bool {
        self.effective_roles(user, project)
            .iter()
            .any(|id| match self.roles.get(id) {
                Ok(role) => role.grants(operation),
                Err(_) => false,
            })
    }

    /// Global-only variant: considers universal-scope grants alone.
    pub fn is_operation_allowed_globally(&self, operation: &OperationId, user: &UserId) -> bool {
        self.is_operation_allowed(operation, &ProjectId::universal(), user)
    }

    /// Every operation the user can perform in the project, resolved through
    /// the operation registry. Dangling ids are dropped silently.
    pub fn operations_in_project(&self, user: &UserId, project: &ProjectId) -> HashSet<Operation> {
        let roles: Vec<Role> = self
            .effective_roles(user, project)
            .iter()
            .filter_map(|id| self.roles.get(id).ok().cloned())
            .collect();
        self.operations_of_roles(&roles)
    }

    /// Every operation the user can perform by universal grant alone.
    pub fn operations_globally(&self, user: &UserId) -> HashSet<Operation> {
        self.operations_in_project(user, &ProjectId::universal())
    }

    /// The operations granted by a set of roles, dropping ids that no longer
    /// resolve.
    pub fn operations_of_roles(&self, roles: &[Role]) -> HashSet<Operation> {
        roles
            .iter()
            .flat_map(|role| role.operations.iter())
            .filter_map(|id| self.operations.get(id).ok().cloned())
            .collect()
    }

    pub fn operations_of_role(&self, role: &Role) -> HashSet<Operation> {
        self.operations_of_roles(std::slice::from_ref(role))
    }

    /// The projects the user holds roles in, resolved through the project
    /// registry. The universal key and any dangling project id drop out
    /// here; a user with no policy entry gets an empty set.
    pub fn projects_of(&self, user: &UserId) -> HashSet<Project> {
        match self.policy.projects(user) {
            Ok(ids) => ids
                .iter()
                .filter_map(|id| self.projects.get(id).ok().cloned())
                .collect(),
            Err(_) => HashSet::new(),
        }
    }

    /// Insert an entity into its registry.
    pub fn insert(&mut self, entity: Entity) -> Result<(), RegistryError> {
        match entity {
            Entity::User(user) => self.users.insert(user),
            Entity::Role(role) => self.roles.insert(role),
            Entity::Operation(operation) => self.operations.insert(operation),
            Entity::Project(project) => self.projects.insert(project),
        }
    }

    /// Remove an entity from its registry. User, role and project removals
    /// cascade into the policy; operation removals do not, so roles may keep
    /// dangling operation ids, which resolution skips.
    pub fn remove(&mut self, entity: &Entity) {
        match entity {
            Entity::User(user) => {
                self.users.remove(&user.id);
                self.policy.remove_user(&user.id);
                tracing::debug!(user = %user.id, "Removed user and policy entries");
            }
            Entity::Role(role) => {
                self.roles.remove(&role.id);
                self.policy.remove_role(&role.id);
                tracing::debug!(role = %role.id, "Removed role and policy grants");
            }
            Entity::Operation(operation) => {
                self.operations.remove(&operation.id);
            }
            Entity::Project(project) => {
                self.projects.remove(&project.id);
                self.policy.remove_project(&project.id);
                tracing::debug!(project = %project.id, "Removed project and policy entries");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::User;
    use crate::ids::{Description, Name};

    fn op(id: &str) -> OperationId {
        OperationId::new(id)
    }

    /// alice holds `editor` = {read, write} in p1 only; bob holds `viewer`
    /// universally.
    fn fixture() -> AccessState {
        let mut state = AccessState::new();

        state
            .users
            .insert(User::new(UserId::new("alice"), Name::new("Alice"), "alice@example.com"))
            .unwrap();
        state
            .users
            .insert(User::new(UserId::new("bob"), Name::new("Bob"), "bob@example.com"))
            .unwrap();

        state
            .roles
            .insert(Role::new(
                RoleId::new("editor"),
                Name::new("Editor"),
                Description::new("Read and write"),
                [op("read"), op("write")],
            ))
            .unwrap();
        state
            .roles
            .insert(Role::new(
                RoleId::new("viewer"),
                Name::new("Viewer"),
                Description::new("Read only"),
                [op("read")],
            ))
            .unwrap();

        state
            .projects
            .insert(Project::new(
                ProjectId::new("p1"),
                Name::new("Pizza"),
                Description::new(""),
                UserId::new("alice"),
            ))
            .unwrap();
        state
            .projects
            .insert(Project::new(
                ProjectId::new("p2"),
                Name::new("Wine"),
                Description::new(""),
                UserId::new("bob"),
            ))
            .unwrap();

        state
            .policy
            .assign(UserId::new("alice"), ProjectId::new("p1"), [RoleId::new("editor")]);
        state
            .policy
            .assign(UserId::new("bob"), ProjectId::universal(), [RoleId::new("viewer")]);

        state
    }

    #[test]
    fn test_project_scoped_grant() {
        let state = fixture();
        let alice = UserId::new("alice");
        assert!(state.is_operation_allowed(&op("write"), &ProjectId::new("p1"), &alice));
        // delete is not granted by editor
        assert!(!state.is_operation_allowed(&op("remove-axiom"), &ProjectId::new("p1"), &alice));
        // the grant does not leak into other projects
        assert!(!state.is_operation_allowed(&op("write"), &ProjectId::new("p2"), &alice));
    }

    #[test]
    fn test_universal_grant_applies_everywhere() {
        let state = fixture();
        let bob = UserId::new("bob");
        assert!(state.is_operation_allowed(&op("read"), &ProjectId::new("p1"), &bob));
        assert!(state.is_operation_allowed(&op("read"), &ProjectId::new("p2"), &bob));
        assert!(state.is_operation_allowed_globally(&op("read"), &bob));
        assert!(!state.is_operation_allowed(&op("write"), &ProjectId::new("p1"), &bob));
    }

    #[test]
    fn test_fail_safe_deny_never_errors() {
        let state = fixture();
        // unknown user
        assert!(!state.is_operation_allowed(
            &op("read"),
            &ProjectId::new("p1"),
            &UserId::new("ghost")
        ));
        // unknown project
        assert!(!state.is_operation_allowed(
            &op("write"),
            &ProjectId::new("ghost"),
            &UserId::new("alice")
        ));
        // unknown operation
        assert!(!state.is_operation_allowed(
            &op("ghost"),
            &ProjectId::new("p1"),
            &UserId::new("alice")
        ));
    }

    #[test]
    fn test_dangling_role_id_is_skipped() {
        let mut state = fixture();
        // remove the role from the registry only, leaving the policy grant
        state.roles.remove(&RoleId::new("editor"));
        assert!(!state.is_operation_allowed(
            &op("write"),
            &ProjectId::new("p1"),
            &UserId::new("alice")
        ));
    }

    #[test]
    fn test_operations_resolution_drops_dangling_operation_ids() {
        let mut state = fixture();
        // editor references `write`, which disappears from the registry
        let write = state.operations.get(&op("write")).unwrap().clone();
        state.remove(&Entity::Operation(write));

        let ops = state.operations_in_project(&UserId::new("alice"), &ProjectId::new("p1"));
        let ids: HashSet<OperationId> = ops.iter().map(|o| o.id.clone()).collect();
        assert!(ids.contains(&op("read")));
        assert!(!ids.contains(&op("write")));

        // and the allow check can no longer match it
        assert!(!state.is_operation_allowed(
            &op("write"),
            &ProjectId::new("p1"),
            &UserId::new("alice")
        ));
    }

    #[test]
    fn test_operations_in_project_merges_universal_grants() {
        let mut state = fixture();
        state
            .policy
            .assign(UserId::new("alice"), ProjectId::universal(), [RoleId::new("viewer")]);

        let ops = state.operations_in_project(&UserId::new("alice"), &ProjectId::new("p2"));
        let ids: HashSet<OperationId> = ops.iter().map(|o| o.id.clone()).collect();
        // only the universal viewer grant reaches p2
        assert_eq!(ids, [op("read")].into_iter().collect());
    }

    #[test]
    fn test_projects_resolves_and_drops_universal_key() {
        let mut state = fixture();
        state
            .policy
            .assign(UserId::new("bob"), ProjectId::new("p2"), [RoleId::new("viewer")]);

        let projects = state.projects_of(&UserId::new("bob"));
        let ids: HashSet<ProjectId> = projects.iter().map(|p| p.id.clone()).collect();
        // bob's universal key is not a real project and drops out
        assert_eq!(ids, [ProjectId::new("p2")].into_iter().collect());

        assert!(state.projects_of(&UserId::new("ghost")).is_empty());
    }

    #[test]
    fn test_remove_role_cascades_into_policy() {
        let mut state = fixture();
        let editor = state.roles.get(&RoleId::new("editor")).unwrap().clone();

        state.remove(&Entity::Role(editor));

        assert!(!state.roles.contains(&RoleId::new("editor")));
        assert!(!state
            .policy
            .has_role(&UserId::new("alice"), &ProjectId::new("p1"), &RoleId::new("editor")));
        assert!(!state.is_operation_allowed(
            &op("write"),
            &ProjectId::new("p1"),
            &UserId::new("alice")
        ));
    }

    #[test]
    fn test_remove_user_and_project_cascade() {
        let mut state = fixture();

        let alice = state.users.get(&UserId::new("alice")).unwrap().clone();
        state.remove(&Entity::User(alice));
        assert!(!state.users.contains(&UserId::new("alice")));
        assert!(!state.policy.has_any_role(&UserId::new("alice")));

        let p2 = state.projects.get(&ProjectId::new("p2")).unwrap().clone();
        state.remove(&Entity::Project(p2));
        assert!(!state.projects.contains(&ProjectId::new("p2")));
    }

    #[test]
    fn test_remove_operation_does_not_cascade() {
        let mut state = fixture();
        let read = state.operations.get(&op("read")).unwrap().clone();
        state.remove(&Entity::Operation(read));

        // the role still references the now-dangling id
        assert!(state
            .roles
            .get(&RoleId::new("viewer"))
            .unwrap()
            .grants(&op("read")));
        // but it can never match an allow check again
        assert!(!state.is_operation_allowed_globally(&op("read"), &UserId::new("bob")));
    }

    #[test]
    fn test_insert_dispatches_by_kind() {
        let mut state = AccessState::new();
        state
            .insert(Entity::User(User::new(
                UserId::new("carol"),
                Name::new("Carol"),
                "carol@example.com",
            )))
            .unwrap();
        assert!(state.users.contains(&UserId::new("carol")));

        let err = state
            .insert(Entity::User(User::new(
                UserId::new("carol"),
                Name::new("Carol again"),
                "carol2@example.com",
            )))
            .unwrap_err();
        assert!(matches!(err, RegistryError::IdAlreadyInUse(_)));
    }
}
