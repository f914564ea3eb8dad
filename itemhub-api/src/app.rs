/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use itemhub_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use itemhub_shared::auth::{api_token::API_TOKEN_HEADER, middleware};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── GET    /health                     # public
/// ├── POST   /users/                     # public, returns the API token
/// ├── GET    /users/                     # X-API-TOKEN
/// ├── GET    /users/:user_id             # X-API-TOKEN
/// ├── DELETE /users/:user_id             # X-API-TOKEN
/// ├── POST   /users/:user_id/items/      # X-API-TOKEN
/// ├── GET    /users/:user_id/items/      # X-API-TOKEN
/// └── GET    /items/                     # X-API-TOKEN
/// ```
///
/// `POST /users/` and `GET /users/` share a path but not an auth policy, so
/// the protected routes live in their own router with a `route_layer` and
/// the two routers are merged.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/users/", post(routes::users::create_user));

    let protected_routes = Router::new()
        .route("/users/", get(routes::users::list_users))
        .route(
            "/users/:user_id",
            get(routes::users::get_user).delete(routes::users::delete_user),
        )
        .route(
            "/users/:user_id/items/",
            get(routes::users::list_user_items).post(routes::users::create_item_for_user),
        )
        .route("/items/", get(routes::items::list_items))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(API_TOKEN_HEADER),
            ])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// API token authentication middleware
///
/// Resolves `X-API-TOKEN` to an active user and injects
/// [`middleware::AuthContext`] into the request extensions.
async fn token_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = middleware::authenticate(&state.db, req.headers()).await?;

    tracing::debug!(user_id = auth.user_id, "Request authenticated");
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
