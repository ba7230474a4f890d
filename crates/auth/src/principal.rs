use serde::{Deserialize, Serialize};

use crate::Role;

/// An authenticated principal: who is calling, and in which role.
///
/// Built by whatever authenticated the caller; the engine only ever looks at
/// `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}
