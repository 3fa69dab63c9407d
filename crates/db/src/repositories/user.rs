//! User repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::auth::{hash_password, verify_password};
use isotrack_shared::error::{AppError, AppResult};

use crate::entities::users;
use crate::repositories::map_db_err;

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login email.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
}

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user with an Argon2id-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` if the email is already registered, or
    /// a database error.
    pub async fn create(&self, input: NewUser) -> AppResult<users::Model> {
        let password_hash =
            hash_password(&input.password).map_err(|e| AppError::Internal(e.to_string()))?;

        let now = Utc::now().into();
        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email.to_lowercase()),
            password_hash: Set(password_hash),
            full_name: Set(input.full_name),
            role: Set(input.role.into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such user exists.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<users::Model> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }

    /// Finds a user by email, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Verifies login credentials and returns the matching active user.
    ///
    /// The same `Unauthorized` error covers unknown email, inactive
    /// account, and wrong password, so responses do not reveal which
    /// part failed.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the credentials do not match.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<users::Model> {
        let invalid = || AppError::Unauthorized("invalid email or password".to_string());

        let user = self.find_by_email(email).await?.ok_or_else(invalid)?;
        if !user.is_active {
            return Err(invalid());
        }

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !matches {
            return Err(invalid());
        }

        Ok(user)
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> AppResult<Vec<users::Model>> {
        users::Entity::find().all(&self.db).await.map_err(map_db_err)
    }
}
