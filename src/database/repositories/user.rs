//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
use crate::utils::errors::AppError;

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, mobile, role, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at
            "#
        )
        .bind(request.email)
        .bind(request.name)
        .bind(request.mobile)
        .bind(request.role.unwrap_or(UserRole::User))
        .bind(request.password_hash)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at FROM users WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user profile fields
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                mobile = COALESCE($3, mobile),
                photo_url = COALESCE($4, photo_url),
                bio = COALESCE($5, bio),
                location = COALESCE($6, location),
                is_active = COALESCE($7, is_active),
                is_verified = COALESCE($8, is_verified),
                updated_at = $9
            WHERE id = $1
            RETURNING id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.mobile)
        .bind(request.photo_url)
        .bind(request.bio)
        .bind(request.location)
        .bind(request.is_active)
        .bind(request.is_verified)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace the stored password hash
    pub async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Mark a user as verified after a successful OTP check
    pub async fn mark_verified(&self, id: i64) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_verified = true, updated_at = $2
            WHERE id = $1
            RETURNING id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Enable or disable an account
    pub async fn set_active_status(&self, id: i64, is_active: bool) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete user
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Find users whose name or email matches a pattern
    pub async fn search(&self, pattern: &str) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at FROM users WHERE email ILIKE $1 OR name ILIKE $1 ORDER BY created_at DESC"
        )
        .bind(format!("%{}%", pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Get disabled users
    pub async fn get_disabled_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, name, mobile, role, password_hash, is_verified, is_active, photo_url, bio, location, created_at, updated_at FROM users WHERE is_active = false ORDER BY updated_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
