//! `stockledger-auth` — role policy and the credential boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod credentials;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, permits, policy_table, AuthzError, PolicyRow};
pub use credentials::{hash_password, verify_password, CredentialStore, SeedCredential};
pub use permissions::Operation;
pub use principal::Principal;
pub use roles::{Role, RoleParseError};
