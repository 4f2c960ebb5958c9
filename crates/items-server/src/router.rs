use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;
use crate::tasks::run_background_tasks;

/// One entry of the public route table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
}

pub const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        method: "GET",
        path: "/",
        summary: "Welcome message",
    },
    RouteInfo {
        method: "GET",
        path: "/items/",
        summary: "List items",
    },
    RouteInfo {
        method: "POST",
        path: "/items/",
        summary: "Create an item",
    },
    RouteInfo {
        method: "GET",
        path: "/items/{item_id}",
        summary: "Get an item",
    },
    RouteInfo {
        method: "PUT",
        path: "/items/{item_id}",
        summary: "Update an item",
    },
    RouteInfo {
        method: "DELETE",
        path: "/items/{item_id}",
        summary: "Delete an item",
    },
    RouteInfo {
        method: "POST",
        path: "/items/{item_id}/log",
        summary: "Log access in background",
    },
    RouteInfo {
        method: "GET",
        path: "/items/{item_id}/action",
        summary: "Run an item action",
    },
];

/// Permissive CORS: any origin, method and header, with credentials.
///
/// Credentials cannot be combined with `*`, so the request's own origin,
/// method and headers are echoed back.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Build the axum router with all item endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::root))
        .route("/items", get(handler::list_items).post(handler::create_item))
        .route("/items/", get(handler::list_items).post(handler::create_item))
        .route(
            "/items/:item_id",
            get(handler::get_item)
                .put(handler::update_item)
                .delete(handler::delete_item),
        )
        .route("/items/:item_id/log", post(handler::log_item_action))
        .route("/items/:item_id/action", get(handler::item_action))
        .fallback(handler::not_found)
        .layer(middleware::map_response(handler::method_not_allowed_body))
        .layer(middleware::from_fn_with_state(
            state.tasks.clone(),
            run_background_tasks,
        ))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
