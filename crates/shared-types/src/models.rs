use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff role controlling which part of the console a user may open.
///
/// - `Admin`: user management, company-wide reports.
/// - `Agent`: own clients and their contracts.
/// - `Reviewer`: contract review queue and reports.
///
/// Anything else (including the `client` tag used for policy holders) has no
/// console access and is treated as signed out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    Reviewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Agent, Role::Reviewer];

    /// Parse a stored role tag. Unknown tags yield `None` so callers fail closed.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "agent" => Some(Role::Agent),
            "reviewer" => Some(Role::Reviewer),
            _ => None,
        }
    }

    /// Lowercase tag for database / JWT storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
            Role::Reviewer => "reviewer",
        }
    }

    /// Human-readable name for headers and badges.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Agent => "Agent",
            Role::Reviewer => "Reviewer",
        }
    }

    /// Default dashboard for this role.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Agent => "/agent/dashboard",
            Role::Reviewer => "/reviewer/dashboard",
        }
    }
}

/// The signed-in identity as seen by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    /// Raw role tag as stored; use [`Session::role`] for decisions.
    pub role: String,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// Row of the admin users table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Row of the agent clients table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct ClientSummary {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub policy_count: i64,
    pub status: String,
}

/// Counts shown on the dashboards. Agents only see their own book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_clients: i64,
    pub active_contracts: i64,
    pub pending_reviews: i64,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 8, message = "Password must be at least 8 characters"))
    )]
    pub password: String,
}
