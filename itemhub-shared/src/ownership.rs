/// User deactivation and item ownership transfer
///
/// Deleting a user never removes the row. Instead the user is flagged
/// inactive and every item they own is handed to a successor: the active
/// user with the smallest ID among the others. Inactive users are never
/// successors, even when their ID is smaller.
///
/// # Outcomes
///
/// Three of the four outcomes are ordinary results, not errors:
///
/// | Outcome              | Mutation | HTTP |
/// |----------------------|----------|------|
/// | `NotFound`           | none     | 404  |
/// | `AlreadyInactive`    | none     | 200  |
/// | `NoActiveSuccessor`  | none     | 400  |
/// | `Deactivated`        | commit   | 200  |
///
/// Only storage failures come back as [`OwnershipError`].
///
/// # Concurrency
///
/// The whole operation runs in one transaction that
///
/// 1. takes a transaction-scoped advisory lock, so deactivations run one at
///    a time and two of them can never pick each other as successor;
/// 2. locks the departing user's row, which also blocks new items from being
///    created for that user until the transaction ends;
/// 3. locks the successor row;
/// 4. snapshots the departing user's item IDs, reassigns exactly those,
///    clears `is_active`, and commits.
///
/// Any error before the commit drops the transaction, which rolls it back.
///
/// # Example
///
/// ```no_run
/// use itemhub_shared::ownership::{deactivate_user, DeactivationOutcome};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// match deactivate_user(&pool, 42).await? {
///     DeactivationOutcome::Deactivated { successor_id, transferred_item_ids, .. } => {
///         println!("moved {} items to {}", transferred_item_ids.len(), successor_id);
///     }
///     other => println!("nothing changed: {}", other.status()),
/// }
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::models::{
    item::{CreateItem, Item},
    user::User,
};

/// Advisory lock key serializing deactivations ("ITEMHUB\0" as bytes)
pub const DEACTIVATION_LOCK_KEY: i64 = 0x4954_454D_4855_4200;

/// Storage failure during deactivation
#[derive(Debug, Error)]
pub enum OwnershipError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Fewer items moved than were snapshotted
    #[error("Transferred {moved} of {expected} items")]
    IncompleteTransfer { expected: usize, moved: u64 },
}

/// Status tag of a deactivation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeactivationStatus {
    NotFound,
    AlreadyInactive,
    NoActiveSuccessor,
    Deactivated,
}

impl std::fmt::Display for DeactivationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            DeactivationStatus::NotFound => "not_found",
            DeactivationStatus::AlreadyInactive => "already_inactive",
            DeactivationStatus::NoActiveSuccessor => "no_active_successor",
            DeactivationStatus::Deactivated => "deactivated",
        };
        f.write_str(tag)
    }
}

/// Result of [`deactivate_user`]
#[derive(Debug, Clone)]
pub enum DeactivationOutcome {
    /// No user with the requested ID
    NotFound,

    /// The user was already inactive; nothing changed
    AlreadyInactive(User),

    /// The user is the only active one; nothing changed
    NoActiveSuccessor(User),

    /// The user is now inactive and its items belong to `successor_id`
    Deactivated {
        user: User,
        successor_id: i64,
        transferred_item_ids: Vec<i64>,
    },
}

impl DeactivationOutcome {
    pub fn status(&self) -> DeactivationStatus {
        match self {
            DeactivationOutcome::NotFound => DeactivationStatus::NotFound,
            DeactivationOutcome::AlreadyInactive(_) => DeactivationStatus::AlreadyInactive,
            DeactivationOutcome::NoActiveSuccessor(_) => DeactivationStatus::NoActiveSuccessor,
            DeactivationOutcome::Deactivated { .. } => DeactivationStatus::Deactivated,
        }
    }

    /// The user payload, absent only for `NotFound`
    pub fn user(&self) -> Option<&User> {
        match self {
            DeactivationOutcome::NotFound => None,
            DeactivationOutcome::AlreadyInactive(user)
            | DeactivationOutcome::NoActiveSuccessor(user)
            | DeactivationOutcome::Deactivated { user, .. } => Some(user),
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            DeactivationOutcome::NotFound => None,
            DeactivationOutcome::AlreadyInactive(user)
            | DeactivationOutcome::NoActiveSuccessor(user)
            | DeactivationOutcome::Deactivated { user, .. } => Some(user),
        }
    }
}

/// Deactivates a user and transfers its items to the successor
///
/// # Errors
///
/// Only storage failures are errors; see [`DeactivationOutcome`] for the
/// expected results.
#[instrument(skip(pool))]
pub async fn deactivate_user(pool: &PgPool, user_id: i64) -> Result<DeactivationOutcome, OwnershipError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(DEACTIVATION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let Some(user) = User::lock_by_id(&mut *tx, user_id).await? else {
        debug!("User does not exist");
        return Ok(DeactivationOutcome::NotFound);
    };

    if !user.is_active {
        debug!("User is already inactive");
        return Ok(DeactivationOutcome::AlreadyInactive(user));
    }

    let Some(successor) = User::lock_successor(&mut *tx, user.id).await? else {
        info!("Refusing to deactivate the only active user");
        return Ok(DeactivationOutcome::NoActiveSuccessor(user));
    };

    // Fixed list taken before any owner changes
    let item_ids = Item::lock_ids_by_owner(&mut *tx, user.id).await?;

    if !item_ids.is_empty() {
        let moved = Item::reassign(&mut *tx, &item_ids, successor.id).await?;
        if moved != item_ids.len() as u64 {
            return Err(OwnershipError::IncompleteTransfer {
                expected: item_ids.len(),
                moved,
            });
        }
    }

    let user = User::set_active(&mut *tx, user.id, false)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    tx.commit().await?;

    info!(
        successor_id = successor.id,
        transferred_items = item_ids.len(),
        "User deactivated"
    );

    Ok(DeactivationOutcome::Deactivated {
        user,
        successor_id: successor.id,
        transferred_item_ids: item_ids,
    })
}

/// Result of [`create_item_for_owner`]
#[derive(Debug, Clone)]
pub enum ItemCreation {
    Created(Item),
    OwnerNotFound,
    /// Inactive users cannot receive new items
    OwnerInactive,
}

/// Creates an item for an active owner
///
/// The owner row is locked while the item is inserted, so a concurrent
/// deactivation either finishes first (and the owner is seen as inactive) or
/// waits until the item exists (and then transfers it).
#[instrument(skip(pool, data))]
pub async fn create_item_for_owner(
    pool: &PgPool,
    owner_id: i64,
    data: CreateItem,
) -> Result<ItemCreation, OwnershipError> {
    let mut tx = pool.begin().await?;

    let Some(owner) = User::lock_by_id(&mut *tx, owner_id).await? else {
        return Ok(ItemCreation::OwnerNotFound);
    };

    if !owner.is_active {
        debug!("Refusing item for inactive owner");
        return Ok(ItemCreation::OwnerInactive);
    }

    let item = Item::create(&mut *tx, data, owner.id).await?;
    tx.commit().await?;

    debug!(item_id = item.id, "Item created");
    Ok(ItemCreation::Created(item))
}
