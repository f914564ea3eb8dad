/// Item model and database operations
///
/// Every item has exactly one owner. Ownership only changes through
/// [`crate::ownership::deactivate_user`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE items (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id BIGINT NOT NULL REFERENCES users (id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Item owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    /// Unique item ID
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Current owner
    pub owner_id: i64,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    pub title: String,
    pub description: Option<String>,
}

impl Item {
    /// Creates an item owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if the owner does not exist.
    pub async fn create<'e, E>(executor: E, data: CreateItem, owner_id: i64) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }

    /// Lists items in ID order
    pub async fn list<'e, E>(executor: E, skip: i64, limit: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM items
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(executor)
        .await
    }

    /// Lists one user's items in ID order
    pub async fn list_by_owner<'e, E>(
        executor: E,
        owner_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM items
            WHERE owner_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(executor)
        .await
    }

    /// Loads every item owned by any of `owner_ids`, in ID order
    ///
    /// Used to attach items to a page of users with a single query.
    pub async fn list_by_owners<'e, E>(executor: E, owner_ids: &[i64]) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM items
            WHERE owner_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(owner_ids)
        .fetch_all(executor)
        .await
    }

    /// Counts a user's items
    pub async fn count_by_owner<'e, E>(executor: E, owner_id: i64) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Snapshots the IDs of a user's items, locking the rows
    pub async fn lock_ids_by_owner<'e, E>(executor: E, owner_id: i64) -> Result<Vec<i64>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM items
            WHERE owner_id = $1
            ORDER BY id ASC
            FOR UPDATE
            "#,
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await
    }

    /// Moves exactly the listed items to `new_owner_id`
    ///
    /// Returns the number of rows updated.
    pub async fn reassign<'e, E>(executor: E, item_ids: &[i64], new_owner_id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE items SET owner_id = $2 WHERE id = ANY($1)")
            .bind(item_ids)
            .bind(new_owner_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_item_description_is_optional() {
        let data: CreateItem = serde_json::from_str(r#"{"title": "katana polish"}"#).unwrap();
        assert_eq!(data.title, "katana polish");
        assert!(data.description.is_none());
    }
}
