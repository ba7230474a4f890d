//! Credential check: the collaborator that turns (username, password) into a role.
//!
//! Storage lives in infra; this module only fixes the contract and the
//! password digest format.

use sha2::{Digest, Sha256};

use crate::Role;

/// Something that can verify a username/password pair.
///
/// Implementations return `None` for unknown users and wrong passwords alike.
pub trait CredentialStore: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}

impl<S> CredentialStore for std::sync::Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        (**self).authenticate(username, password)
    }
}

/// Lowercase hex SHA-256 of the password.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, digest: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(digest)
}

/// A credential row written when a store is bootstrapped empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCredential {
    pub username: &'static str,
    pub password: &'static str,
    pub role: Role,
}

impl SeedCredential {
    /// The three default accounts, one per role.
    pub const DEFAULTS: [SeedCredential; 3] = [
        SeedCredential {
            username: "admin",
            password: "admin123",
            role: Role::Admin,
        },
        SeedCredential {
            username: "manager",
            password: "manager123",
            role: Role::Manager,
        },
        SeedCredential {
            username: "staff",
            password: "staff123",
            role: Role::Staff,
        },
    ];

    pub fn password_digest(&self) -> String {
        hash_password(self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn verify_accepts_matching_password_only() {
        let digest = hash_password("staff123");
        assert!(verify_password("staff123", &digest));
        assert!(verify_password("staff123", &digest.to_uppercase()));
        assert!(!verify_password("staff124", &digest));
    }

    #[test]
    fn defaults_cover_every_role_once() {
        let roles: Vec<Role> = SeedCredential::DEFAULTS.iter().map(|c| c.role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
    }
}
