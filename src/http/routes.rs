//! Router assembly.

use super::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post, put},
};
use camino::Utf8Path;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Largest accepted request body, uploads included.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Builds the CORS layer; `None` allows any origin.
///
/// An origin that is not a valid header value also falls back to any.
#[must_use]
pub fn cors_layer(client_url: Option<&str>) -> CorsLayer {
    let origin = client_url
        .and_then(|url| HeaderValue::from_str(url).ok())
        .map_or_else(AllowOrigin::any, AllowOrigin::exact);
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Builds the full application router.
///
/// Files under `upload_dir` are served at `/uploads`.
pub fn router(state: AppState, upload_dir: &Utf8Path, cors: CorsLayer) -> Router {
    let auth = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/profile",
            get(handlers::auth::profile).put(handlers::auth::update_profile),
        );

    let users = Router::new()
        .route("/", get(handlers::auth::profile))
        .route("/profile", put(handlers::auth::update_profile));

    let tasks = Router::new()
        .route("/", get(handlers::tasks::list).post(handlers::tasks::create))
        .route("/dashboard-data", get(handlers::tasks::dashboard))
        .route(
            "/{id}",
            get(handlers::tasks::get)
                .put(handlers::tasks::update)
                .delete(handlers::tasks::delete),
        )
        .route("/{id}/status", patch(handlers::tasks::set_status))
        .route("/{id}/checklist", patch(handlers::tasks::set_checklist))
        .route("/{id}/pin", patch(handlers::tasks::toggle_pin));

    let uploads = Router::new().route("/upload-image", post(handlers::uploads::upload_image));

    Router::new()
        .route("/", get(handlers::health::health))
        .nest("/api/auth", auth)
        .nest("/api/users", users)
        .nest("/api/tasks", tasks)
        .nest("/api/uploads", uploads)
        .nest_service("/uploads", ServeDir::new(upload_dir.as_std_path()))
        .fallback(handlers::health::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
