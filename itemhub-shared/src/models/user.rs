/// User model and database operations
///
/// A user authenticates with a bearer token whose SHA-256 hash is stored in
/// `api_token_hash`. Users are never removed; "deleting" one goes through
/// [`crate::ownership::deactivate_user`], which clears `is_active` and hands
/// the user's items to another active user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     hashed_password VARCHAR(255) NOT NULL,
///     api_token_hash VARCHAR(64) NOT NULL UNIQUE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use itemhub_shared::models::user::User;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, raw_token: &str) -> Result<(), sqlx::Error> {
/// if let Some(user) = User::find_by_token(&pool, raw_token).await? {
///     println!("Authenticated as {}", user.email);
/// }
///
/// let first_page = User::list(&pool, 0, 100).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::auth::api_token::{generate_api_token, hash_api_token};

/// User account
///
/// The credential hashes are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Email address, unique across users
    pub email: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// SHA-256 hex digest of the user's API token
    #[serde(skip_serializing)]
    pub api_token_hash: String,

    /// Inactive users cannot authenticate and never own items
    pub is_active: bool,

    /// When the user was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Already hashed password (never plaintext)
    pub hashed_password: String,
}

impl User {
    /// Creates a user and issues its API token
    ///
    /// Returns the persisted row together with the plaintext token. The
    /// token is not stored anywhere and cannot be recovered later; only its
    /// hash is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken (unique constraint
    /// `users_email_key`) or the database is unreachable.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<(Self, String), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let api_token = generate_api_token();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password, api_token_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, hashed_password, api_token_hash, is_active, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.hashed_password)
        .bind(hash_api_token(&api_token))
        .fetch_one(executor)
        .await?;

        tracing::debug!(user_id = user.id, "User created");

        Ok((user, api_token))
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, api_token_hash, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a user by email address (exact match)
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, api_token_hash, is_active, created_at
            FROM users
            WHERE email = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Finds the user holding a plaintext API token
    ///
    /// The token is hashed first; the lookup is against `api_token_hash`.
    /// The active flag is not checked here, callers decide what an inactive
    /// match means.
    pub async fn find_by_token<'e, E>(executor: E, token: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, api_token_hash, is_active, created_at
            FROM users
            WHERE api_token_hash = $1
            "#,
        )
        .bind(hash_api_token(token))
        .fetch_optional(executor)
        .await
    }

    /// Lists users in ID order
    ///
    /// # Arguments
    ///
    /// * `skip` - Number of users to skip
    /// * `limit` - Maximum number of users to return
    pub async fn list<'e, E>(executor: E, skip: i64, limit: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, api_token_hash, is_active, created_at
            FROM users
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(executor)
        .await
    }

    /// Counts active users
    pub async fn count_active<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_active")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Loads a user and holds a row lock until the transaction ends
    ///
    /// While the lock is held, no item can be inserted with this user as
    /// owner: the foreign key check needs a `FOR KEY SHARE` lock on the row.
    pub async fn lock_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, api_token_hash, is_active, created_at
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Picks and locks the successor for a departing user
    ///
    /// The successor is the active user with the smallest ID other than
    /// `departing_id`. Inactive users are never candidates, whatever their ID.
    pub async fn lock_successor<'e, E>(
        executor: E,
        departing_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, api_token_hash, is_active, created_at
            FROM users
            WHERE is_active AND id <> $1
            ORDER BY id ASC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(departing_id)
        .fetch_optional(executor)
        .await
    }

    /// Sets the active flag and returns the refreshed row
    pub async fn set_active<'e, E>(
        executor: E,
        id: i64,
        is_active: bool,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = $2
            WHERE id = $1
            RETURNING id, email, hashed_password, api_token_hash, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(executor)
        .await
    }
}
