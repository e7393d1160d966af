//! User Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User entity (员工账户)
///
/// `password_hash` never leaves the server; handlers convert to
/// [`UserResponse`] before serializing.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    /// Role name: admin | manager | staff
    pub role: String,
    /// None = all branches
    pub branch_id: Option<i64>,
    pub is_active: bool,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub branch_id: Option<i64>,
    pub is_active: bool,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            display_name: u.display_name,
            email: u.email,
            role: u.role,
            branch_id: u.branch_id,
            is_active: u.is_active,
            banned: u.banned,
            ban_reason: u.ban_reason,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub display_name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Role name: admin | manager | staff
    pub role: String,
    pub branch_id: Option<i64>,
}

/// Update user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 200))]
    pub display_name: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    pub branch_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Set-role payload (idempotent, replaces the previous role)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Ban payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BanRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}
