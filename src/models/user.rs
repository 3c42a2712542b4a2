use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CRM role. Permissions are granted per role, never per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    LeadGeneration,
    PreSales,
    Sales,
    Implementation,
    Finance,
    DataTeam,
    PresalesTeam,
    SalesTeam,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Admin,
        Role::LeadGeneration,
        Role::PreSales,
        Role::Sales,
        Role::Implementation,
        Role::Finance,
        Role::DataTeam,
        Role::PresalesTeam,
        Role::SalesTeam,
    ];

    /// Storage key, as written in `users.role` and `rolePermissions.role`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::LeadGeneration => "lead_generation",
            Role::PreSales => "pre_sales",
            Role::Sales => "sales",
            Role::Implementation => "implementation",
            Role::Finance => "finance",
            Role::DataTeam => "data_team",
            Role::PresalesTeam => "presales_team",
            Role::SalesTeam => "sales_team",
        }
    }

    /// Human readable label shown next to the user in the shell.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::LeadGeneration => "Lead Generation Team",
            Role::PreSales => "Pre-Sales/Qualification Team",
            Role::Sales => "Sales Team",
            Role::Implementation => "Implementation Team",
            Role::Finance => "Finance Team",
            Role::DataTeam => "Data Team",
            Role::PresalesTeam => "Pre-Sales Team",
            Role::SalesTeam => "Sales Team",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// The authenticated identity held by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect::<String>()
            .to_uppercase()
    }
}

/// A row of the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            role: record.role,
            department: record.department,
            phone: record.phone,
            avatar_url: record.avatar_url,
            is_active: record.is_active,
            last_login: record.last_login,
        }
    }
}
