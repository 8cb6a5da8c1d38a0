use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability passed with each call from the front-end. Only admins may mutate
/// the phonebook; everyone may browse and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn from_admin_flag(admin: bool) -> Self {
        if admin {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn can_mutate(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
