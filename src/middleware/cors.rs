use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The dashboard is served from another origin and only talks JSON.
pub fn dashboard_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(Any)
}
