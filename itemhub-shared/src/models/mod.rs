/// Database models for ItemHub
///
/// # Models
///
/// - `user`: Accounts, their API token hash and active flag
/// - `item`: Items, each owned by exactly one user
///
/// Every query takes an explicit executor: pass `&PgPool` for a one-off
/// statement or `&mut *tx` to run inside an open transaction.
///
/// # Example
///
/// ```no_run
/// use itemhub_shared::models::item::{CreateItem, Item};
/// use itemhub_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let (user, api_token) = User::create(
///     &pool,
///     CreateUser {
///         email: "deadpool@example.com".to_string(),
///         hashed_password: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let item = Item::create(
///     &pool,
///     CreateItem {
///         title: "katana polish".to_string(),
///         description: Some("shine it up".to_string()),
///     },
///     user.id,
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod item;
pub mod user;
