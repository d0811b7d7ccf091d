use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use sqlx::{postgres::PgRow, PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::{NewUser, Role, UserRecord};

/// Errors from the user repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Invalid role in storage: {0}")]
    InvalidRole(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, number, \
                            extension_id, host, port, secret, created_at, updated_at";

/// Persistence operations over the user collection. Owns storage access,
/// credential hashing, and timestamping; validation and authorization stay
/// with the callers.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Repository over the shared application pool.
    pub async fn shared() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    /// All accounts, most recently created first.
    pub async fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row).transpose()
    }

    /// Whether any account other than `id` already holds `email`.
    pub async fn email_in_use_by_other(
        &self,
        email: &str,
        id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 AS hit FROM users WHERE email = $1 AND id <> $2")
            .bind(email)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Insert a new account. The plaintext credential is argon2-hashed here;
    /// id and timestamps are assigned by this layer.
    pub async fn create(&self, new_user: NewUser) -> Result<UserRecord, RepositoryError> {
        let password_hash = hash_password(&new_user.password)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, name, role, number,
                               extension_id, host, port, secret)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(&new_user.name)
        .bind(new_user.role.as_str())
        .bind(&new_user.number)
        .bind(&new_user.extension_id)
        .bind(&new_user.host)
        .bind(new_user.port)
        .bind(&new_user.secret)
        .fetch_one(&self.pool)
        .await?;

        map_row(&row)
    }

    /// Write back a fully-resolved record. Callers fetch, apply their partial
    /// changes in memory, then persist through here; `new_password`, when
    /// present, replaces the stored credential after hashing.
    pub async fn update(
        &self,
        record: &UserRecord,
        new_password: Option<&str>,
    ) -> Result<UserRecord, RepositoryError> {
        let password_hash = match new_password {
            Some(password) => hash_password(password)?,
            None => record.password_hash.clone(),
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, name = $4, role = $5, number = $6,
                extension_id = $7, host = $8, port = $9, secret = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.email)
        .bind(&password_hash)
        .bind(&record.name)
        .bind(record.role.as_str())
        .bind(&record.number)
        .bind(&record.extension_id)
        .bind(&record.host)
        .bind(record.port)
        .bind(&record.secret)
        .fetch_one(&self.pool)
        .await?;

        map_row(&row)
    }

    /// Verify a plaintext password against the stored argon2 hash.
    pub fn verify_password(
        &self,
        user: &UserRecord,
        password: &str,
    ) -> Result<bool, RepositoryError> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| RepositoryError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn hash_password(password: &str) -> Result<String, RepositoryError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RepositoryError::PasswordHash(e.to_string()))
}

fn map_row(row: &PgRow) -> Result<UserRecord, RepositoryError> {
    let role: String = row.get("role");
    let role: Role = role.parse().map_err(RepositoryError::InvalidRole)?;

    Ok(UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        role,
        number: row.get("number"),
        extension_id: row.get("extension_id"),
        host: row.get("host"),
        port: row.get("port"),
        secret: row.get("secret"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn password_hash_verifies_round_trip() {
        let hash = hash_password("p1").unwrap();
        assert_ne!(hash, "p1");

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            password_hash: hash,
            name: None,
            role: Role::User,
            number: None,
            extension_id: None,
            host: None,
            port: None,
            secret: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // Repository methods that don't touch the pool are testable with any pool
        // handle, but verify_password only needs the record itself.
        let parsed = PasswordHash::new(&record.password_hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"p1", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"wrong", &parsed)
            .is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("p1").unwrap();
        let b = hash_password("p1").unwrap();
        assert_ne!(a, b);
    }
}
