//! Employee Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default password for accounts created without one
pub const DEFAULT_PASSWORD: &str = "123456";

/// Employee entity (员工账号)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// Argon2 hash, never serialized out
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: Option<String>,
    pub is_enabled: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: i64,
    pub updated_by: i64,
}

impl Employee {
    /// Verify a plaintext password against the stored argon2 hash
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeCreate {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    pub phone: Option<String>,
    /// Falls back to [`DEFAULT_PASSWORD`] when omitted
    pub password: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub username: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Paged employee query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePageQuery {
    pub name: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: employee identity plus a bearer token
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub token: String,
}
