#![allow(dead_code)]

/// Shared fixtures for database-backed tests
///
/// Each `#[sqlx::test]` receives a fresh, migrated database, so fixtures can
/// rely on an empty `users` table.

use itemhub_shared::models::item::{CreateItem, Item};
use itemhub_shared::models::user::{CreateUser, User};
use sqlx::PgPool;

/// Creates a user without going through Argon2 (hashing is not under test)
pub async fn create_user(pool: &PgPool, email: &str) -> User {
    let (user, _token) = User::create(
        pool,
        CreateUser {
            email: email.to_string(),
            hashed_password: "test_hash".to_string(),
        },
    )
    .await
    .expect("Failed to create user");

    user
}

/// Creates an inactive user by flipping the flag directly
pub async fn create_inactive_user(pool: &PgPool, email: &str) -> User {
    let user = create_user(pool, email).await;
    User::set_active(pool, user.id, false)
        .await
        .expect("Failed to update user")
        .expect("User vanished")
}

pub async fn create_item(pool: &PgPool, owner_id: i64, title: &str) -> Item {
    Item::create(
        pool,
        CreateItem {
            title: title.to_string(),
            description: None,
        },
        owner_id,
    )
    .await
    .expect("Failed to create item")
}
