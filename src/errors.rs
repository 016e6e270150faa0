use miette::Diagnostic;
use thiserror::Error;

use crate::ids::{ProjectId, UserId};

/// Failures surfaced by the entity registries.
#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error("id `{0}` is already in use")]
    #[diagnostic(
        code(apsis::registry::id_in_use),
        help("Pick a fresh id, or remove the existing entry first")
    )]
    IdAlreadyInUse(String),

    #[error("email address `{0}` is already in use")]
    #[diagnostic(
        code(apsis::registry::email_in_use),
        help("Every user must have a distinct email address")
    )]
    EmailAlreadyInUse(String),

    #[error("unknown id `{0}`")]
    #[diagnostic(code(apsis::registry::unknown_id))]
    UnknownId(String),

    #[error("operation `{0}` is a system operation and cannot be renamed")]
    #[diagnostic(
        code(apsis::registry::system_operation),
        help("Built-in operations keep their names; define a custom operation instead")
    )]
    SystemOperation(String),
}

/// Failures surfaced by the policy queries. Membership predicates are total
/// and never return these; only the set-returning queries do.
#[derive(Debug, Error, Diagnostic)]
pub enum PolicyError {
    #[error("user `{0}` has no policy entry")]
    #[diagnostic(code(apsis::policy::user_not_in_policy))]
    UserNotInPolicy(UserId),

    #[error("user `{user}` has no roles in project `{project}`")]
    #[diagnostic(code(apsis::policy::project_not_in_policy))]
    ProjectNotInPolicy { user: UserId, project: ProjectId },
}

/// Failures surfaced by the credential registry.
#[derive(Debug, Error, Diagnostic)]
pub enum CredentialError {
    #[error("user `{0}` already has registered credentials")]
    #[diagnostic(
        code(apsis::auth::already_registered),
        help("Use change_password to replace an existing credential")
    )]
    AlreadyRegistered(UserId),

    #[error("user `{0}` has no registered credentials")]
    #[diagnostic(code(apsis::auth::not_registered))]
    NotRegistered(UserId),
}
