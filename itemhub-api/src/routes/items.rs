/// Item endpoints
///
/// - `GET /items/` - List all items (requires `X-API-TOKEN`)
///
/// Items are created through `POST /users/:user_id/items/`.

use crate::{app::AppState, error::ApiResult, routes::Pagination};
use axum::{
    extract::{Query, State},
    Json,
};
use itemhub_shared::models::item::Item;
use serde::{Deserialize, Serialize};

/// Item response
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            owner_id: item.owner_id,
        }
    }
}

/// List items
///
/// ```text
/// GET /items/?skip=0&limit=100
/// X-API-TOKEN: <token>
/// ```
pub async fn list_items(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<ItemResponse>>> {
    let items = Item::list(&state.db, page.skip(), page.limit()).await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}
