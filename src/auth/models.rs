// Identity data models

use serde::{Deserialize, Serialize};

use crate::booking::CancelledBy;

/// Role carried in the identity token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated caller
///
/// The raw token is kept so it can be forwarded to the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
    pub token: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Who a cancellation performed by this identity is attributed to
    pub fn cancellation_actor(&self) -> CancelledBy {
        match self.role {
            Role::Admin => CancelledBy::Manager,
            Role::User => CancelledBy::User,
        }
    }
}
