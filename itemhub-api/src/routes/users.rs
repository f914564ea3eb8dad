/// User endpoints
///
/// - `POST /users/` - Register a user (public); the only response that
///   carries the plaintext `api_token`
/// - `GET /users/` - List users with their items
/// - `GET /users/:user_id` - Fetch one user
/// - `DELETE /users/:user_id` - Deactivate a user, handing its items over
/// - `POST /users/:user_id/items/` - Create an item for a user
/// - `GET /users/:user_id/items/` - List a user's items
///
/// Everything except registration requires `X-API-TOKEN`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{items::ItemResponse, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use itemhub_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        item::{CreateItem, Item},
        user::{CreateUser, User},
    },
    ownership::{self, DeactivationOutcome, ItemCreation},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Item creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,
}

/// User as returned by every user endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,

    pub email: String,

    pub is_active: bool,

    /// Items currently owned by the user
    pub items: Vec<ItemResponse>,

    /// Plaintext API token, present only in the registration response
    pub api_token: Option<String>,
}

impl UserResponse {
    fn new(user: User, items: Vec<Item>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            items: items.into_iter().map(ItemResponse::from).collect(),
            api_token: None,
        }
    }
}

/// Attaches owned items to each user with a single query
async fn with_items(db: &PgPool, users: Vec<User>) -> Result<Vec<UserResponse>, sqlx::Error> {
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();

    let mut by_owner: HashMap<i64, Vec<Item>> = HashMap::new();
    for item in Item::list_by_owners(db, &ids).await? {
        by_owner.entry(item.owner_id).or_default().push(item);
    }

    Ok(users
        .into_iter()
        .map(|user| {
            let items = by_owner.remove(&user.id).unwrap_or_default();
            UserResponse::new(user, items)
        })
        .collect())
}

async fn single_with_items(db: &PgPool, user: User) -> Result<UserResponse, sqlx::Error> {
    let mut responses = with_items(db, vec![user]).await?;
    responses.pop().ok_or(sqlx::Error::RowNotFound)
}

/// Register a user
///
/// ```text
/// POST /users/
/// Content-Type: application/json
///
/// { "email": "deadpool@example.com", "password": "chimichangas4life" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let hashed_password = password::hash_password(&req.password)?;

    let (user, api_token) = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            hashed_password,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    let mut response = UserResponse::new(user, Vec::new());
    response.api_token = Some(api_token);

    Ok(Json(response))
}

/// List users
///
/// ```text
/// GET /users/?skip=0&limit=100
/// X-API-TOKEN: <token>
/// ```
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = User::list(&state.db, page.skip(), page.limit()).await?;

    Ok(Json(with_items(&state.db, users).await?))
}

/// Fetch one user
///
/// # Errors
///
/// - `404 Not Found`: User not found
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(single_with_items(&state.db, user).await?))
}

/// Deactivate a user
///
/// The user's items move to the active user with the smallest ID. Calling
/// this again for an inactive user is a no-op that returns the user.
///
/// ```text
/// DELETE /users/:user_id
/// X-API-TOKEN: <token>
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Cannot delete the only active user
/// - `404 Not Found`: User not found
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let outcome = ownership::deactivate_user(&state.db, user_id).await?;

    tracing::info!(
        user_id,
        requested_by = auth.user_id,
        status = %outcome.status(),
        "Deactivation requested"
    );

    let user = match outcome {
        DeactivationOutcome::NotFound => {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        DeactivationOutcome::NoActiveSuccessor(_) => {
            return Err(ApiError::BadRequest(
                "Cannot delete the only active user".to_string(),
            ));
        }
        DeactivationOutcome::AlreadyInactive(user)
        | DeactivationOutcome::Deactivated { user, .. } => user,
    };

    Ok(Json(single_with_items(&state.db, user).await?))
}

/// Create an item owned by a user
///
/// # Errors
///
/// - `400 Bad Request`: The user is inactive
/// - `404 Not Found`: User not found
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_item_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<CreateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    req.validate()?;

    let created = ownership::create_item_for_owner(
        &state.db,
        user_id,
        CreateItem {
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    match created {
        ItemCreation::Created(item) => Ok(Json(item.into())),
        ItemCreation::OwnerNotFound => Err(ApiError::NotFound("User not found".to_string())),
        ItemCreation::OwnerInactive => Err(ApiError::BadRequest(
            "Cannot create items for an inactive user".to_string(),
        )),
    }
}

/// List a user's items
///
/// # Errors
///
/// - `404 Not Found`: User not found
pub async fn list_user_items(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<ItemResponse>>> {
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let items = Item::list_by_owner(&state.db, user_id, page.skip(), page.limit()).await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}
