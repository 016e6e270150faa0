//! The role-assignment map: which user holds which roles in which project.
//!
//! Shape: user → project → set of granted roles. The reserved
//! [`ProjectId::universal()`] key marks grants that apply in every project;
//! the engine folds it in at resolution time.
//!
//! Two invariants hold after every mutation: no user maps to an empty
//! project map, and no project maps to an empty role set. Removals prune
//! emptied entries instead of leaving ghosts behind. Nothing here checks
//! that the ids exist in the registries; the policy stores assignments,
//! the engine decides what they are worth.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::errors::PolicyError;
use crate::ids::{ProjectId, RoleId, UserId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policy {
    assignments: HashMap<UserId, HashMap<ProjectId, HashSet<RoleId>>>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant roles to a user in a project. Upserts intermediate entries and
    /// is idempotent for roles already granted.
    pub fn assign(
        &mut self,
        user: UserId,
        project: ProjectId,
        roles: impl IntoIterator<Item = RoleId>,
    ) {
        let roles: Vec<RoleId> = roles.into_iter().collect();
        if roles.is_empty() {
            // An empty grant would leave an empty entry behind.
            return;
        }
        self.assignments
            .entry(user)
            .or_default()
            .entry(project)
            .or_default()
            .extend(roles);
    }

    /// Bulk form: grant one role to many users in a project.
    pub fn assign_users(
        &mut self,
        role: RoleId,
        project: ProjectId,
        users: impl IntoIterator<Item = UserId>,
    ) {
        for user in users {
            self.assign(user, project.clone(), [role.clone()]);
        }
    }

    /// Retract one role grant. Prunes the project entry when its role set
    /// empties, and the user entry when its project map empties.
    pub fn retract(&mut self, user: &UserId, project: &ProjectId, role: &RoleId) {
        if let Some(projects) = self.assignments.get_mut(user) {
            if let Some(roles) = projects.get_mut(project) {
                roles.remove(role);
                if roles.is_empty() {
                    projects.remove(project);
                }
            }
            if projects.is_empty() {
                self.assignments.remove(user);
            }
        }
    }

    /// Retract every role a user holds in one project.
    pub fn retract_project(&mut self, user: &UserId, project: &ProjectId) {
        if let Some(projects) = self.assignments.get_mut(user) {
            projects.remove(project);
            if projects.is_empty() {
                self.assignments.remove(user);
            }
        }
    }

    /// Remove every trace of a user.
    pub fn remove_user(&mut self, user: &UserId) {
        self.assignments.remove(user);
    }

    /// Remove a role from every user/project pair it appears in, pruning
    /// emptied entries. Operates on each user's existing assignment map.
    pub fn remove_role(&mut self, role: &RoleId) {
        self.assignments.retain(|_, projects| {
            projects.retain(|_, roles| {
                roles.remove(role);
                !roles.is_empty()
            });
            !projects.is_empty()
        });
    }

    /// Remove a project key from every user's assignment map, pruning
    /// emptied user entries.
    pub fn remove_project(&mut self, project: &ProjectId) {
        self.assignments.retain(|_, projects| {
            projects.remove(project);
            !projects.is_empty()
        });
    }

    /// Does the user hold any role anywhere (including universally)?
    pub fn has_any_role(&self, user: &UserId) -> bool {
        // Entries are pruned on removal, so presence implies a grant.
        self.assignments.contains_key(user)
    }

    /// Does the user hold any role in this specific project key? The
    /// universal project is a distinct key here; resolution-level fallback
    /// lives in the engine.
    pub fn has_role_in_project(&self, user: &UserId, project: &ProjectId) -> bool {
        self.assignments
            .get(user)
            .is_some_and(|projects| projects.contains_key(project))
    }

    /// Does the user hold this exact role in this project key?
    pub fn has_role(&self, user: &UserId, project: &ProjectId, role: &RoleId) -> bool {
        self.assignments
            .get(user)
            .and_then(|projects| projects.get(project))
            .is_some_and(|roles| roles.contains(role))
    }

    /// All roles the user holds, unioned across every project key.
    pub fn roles(&self, user: &UserId) -> Result<HashSet<RoleId>, PolicyError> {
        let projects = self
            .assignments
            .get(user)
            .ok_or_else(|| PolicyError::UserNotInPolicy(user.clone()))?;
        Ok(projects.values().flatten().cloned().collect())
    }

    /// The roles the user holds under one project key.
    pub fn roles_in_project(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<&HashSet<RoleId>, PolicyError> {
        let projects = self
            .assignments
            .get(user)
            .ok_or_else(|| PolicyError::UserNotInPolicy(user.clone()))?;
        projects
            .get(project)
            .ok_or_else(|| PolicyError::ProjectNotInPolicy {
                user: user.clone(),
                project: project.clone(),
            })
    }

    /// The project keys (universal included, when present) the user holds
    /// roles under.
    pub fn projects(&self, user: &UserId) -> Result<HashSet<ProjectId>, PolicyError> {
        let projects = self
            .assignments
            .get(user)
            .ok_or_else(|| PolicyError::UserNotInPolicy(user.clone()))?;
        Ok(projects.keys().cloned().collect())
    }

    /// Reverse lookup: every user holding a role under this project key.
    /// Scans all users.
    pub fn users(&self, project: &ProjectId) -> HashSet<UserId> {
        self.assignments
            .iter()
            .filter(|(_, projects)| projects.contains_key(project))
            .map(|(user, _)| user.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
