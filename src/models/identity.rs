//! Identity model matching the front end's User interface.

use serde::{Deserialize, Serialize};

/// Default avatar shown for volunteer accounts.
pub const VOLUNTEER_AVATAR: &str = "https://randomuser.me/api/portraits/women/44.jpg";
/// Default avatar shown for organization accounts.
pub const ORGANIZATION_AVATAR: &str = "https://randomuser.me/api/portraits/men/32.jpg";

/// The two kinds of account the front end distinguishes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Volunteer,
    Organization,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Organization => "organization",
        }
    }

    /// Avatar assigned to freshly synthesized identities of this role.
    pub fn default_avatar(&self) -> &'static str {
        match self {
            Role::Volunteer => VOLUNTEER_AVATAR,
            Role::Organization => ORGANIZATION_AVATAR,
        }
    }
}

/// The authenticated user. Also the persisted local-storage format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Role,
}

/// Request body for creating an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Role,
}

/// Snapshot of the session returned to the front end.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<Identity>,
}

impl From<Option<Identity>> for SessionState {
    fn from(user: Option<Identity>) -> Self {
        Self {
            authenticated: user.is_some(),
            user,
        }
    }
}
