//! Apsis: access-control and credential core for a multi-user,
//! multi-project editing server.
//!
//! Users hold roles per project (or universally), roles grant operations,
//! and [`engine::AccessState`] resolves "is this operation allowed" over
//! the registries and the policy, failing closed on anything dangling.
//! Credentials live apart from the policy as salted PBKDF2 digests,
//! verified in constant time.
//!
//! Everything is a plain synchronous in-process store with no interior
//! locking; callers serialize access themselves.

pub mod auth;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod ids;
pub mod policy;
pub mod registry;
pub mod settings;
