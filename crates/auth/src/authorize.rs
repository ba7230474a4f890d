use serde::Serialize;
use thiserror::Error;

use stockledger_core::DomainError;

use crate::{Operation, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' may not perform '{operation}'")]
    Forbidden { role: Role, operation: Operation },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden { role, operation } => {
                DomainError::unauthorized(role.as_str(), operation.as_str())
            }
        }
    }
}

/// The role policy table.
///
/// - No IO
/// - No panics
/// - Total over both closed enums
pub fn permits(role: Role, operation: Operation) -> bool {
    use Operation::*;

    match role {
        Role::Admin => true,
        Role::Manager => match operation {
            CreateItem | Restock | Sell | ViewReports => true,
            DeleteItem => false,
        },
        Role::Staff => match operation {
            Sell => true,
            CreateItem | Restock | DeleteItem | ViewReports => false,
        },
    }
}

/// `permits` as a `Result`, for use with `?` at command boundaries.
pub fn authorize(role: Role, operation: Operation) -> Result<(), AuthzError> {
    if permits(role, operation) {
        Ok(())
    } else {
        tracing::debug!(%role, %operation, "operation denied by role policy");
        Err(AuthzError::Forbidden { role, operation })
    }
}

/// One role's row in the policy table (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRow {
    pub role: Role,
    pub permitted: Vec<Operation>,
}

impl PolicyRow {
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            permitted: Operation::ALL
                .into_iter()
                .filter(|op| permits(role, *op))
                .collect(),
        }
    }
}

/// The whole policy table, one row per role.
pub fn policy_table() -> Vec<PolicyRow> {
    Role::ALL.into_iter().map(PolicyRow::for_role).collect()
}
