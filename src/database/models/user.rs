use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Closed role enumeration. Every authorization site matches exhaustively,
/// so an unhandled role is a compile error rather than a silent typo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account as stored, credential included. Never serialized outward;
/// responses go through [`SanitizedUser`] or [`ProfileUser`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role: Role,
    pub number: Option<String>,
    pub extension_id: Option<String>,
    pub host: Option<String>,
    pub port: Option<i32>,
    pub secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload handed to the repository. `password` is the plaintext
/// credential; the repository hashes it before storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Role,
    pub number: Option<String>,
    pub extension_id: Option<String>,
    pub host: Option<String>,
    pub port: Option<i32>,
    pub secret: Option<String>,
}

/// Account shape returned by the directory endpoints. Credential omitted;
/// absent textual fields normalize to "" and absent port to null so every
/// record in a response has a uniform shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub number: String,
    pub extension_id: String,
    pub host: String,
    pub port: Option<i32>,
    pub secret: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserRecord> for SanitizedUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone().unwrap_or_default(),
            email: user.email.clone(),
            role: user.role,
            number: user.number.clone().unwrap_or_default(),
            extension_id: user.extension_id.clone().unwrap_or_default(),
            host: user.host.clone().unwrap_or_default(),
            port: user.port,
            secret: user.secret.clone().unwrap_or_default(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Account shape returned by the current-user profile endpoint. No telephony
/// secret and no update timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    pub number: Option<String>,
    pub extension_id: Option<String>,
    pub host: Option<String>,
    pub port: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for ProfileUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            number: user.number.clone(),
            extension_id: user.extension_id.clone(),
            host: user.host.clone(),
            port: user.port,
            created_at: user.created_at,
        }
    }
}
