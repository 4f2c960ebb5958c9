//! HTTP server for the items API.
//!
//! Serves create/read/update/delete routes over a shared in-memory
//! [`ItemStore`](items_store::ItemStore), with permissive CORS, a unified
//! `{"message", "custom"}` error body for business faults, 422 responses for
//! shape-validation faults, and fire-and-forget background jobs.

pub mod action_log;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;
pub mod tasks;

pub use action_log::{ActionLog, MemoryActionLog, TracingActionLog};
pub use config::{ServerConfig, DEFAULT_WELCOME};
pub use error::{ErrorBody, FieldIssue, ServerError, ServerResult, ValidationBody};
pub use router::{build_router, cors_layer, RouteInfo, ROUTES};
pub use server::ItemsServer;
pub use state::AppState;
pub use tasks::{BackgroundJob, BackgroundTasks, TaskQueue};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use items_store::{InMemoryItemStore, ItemStore};
    use items_types::ItemId;

    struct TestApp {
        router: Router,
        store: Arc<InMemoryItemStore>,
        log: Arc<MemoryActionLog>,
    }

    fn app_with(store: InMemoryItemStore) -> TestApp {
        let store = Arc::new(store);
        let log = Arc::new(MemoryActionLog::new());
        let server = ItemsServer::with_store(ServerConfig::default(), store.clone())
            .with_action_log(log.clone());
        TestApp {
            router: server.router(),
            store,
            log,
        }
    }

    fn app() -> TestApp {
        app_with(InMemoryItemStore::seeded())
    }

    struct Reply {
        status: StatusCode,
        headers: axum::http::HeaderMap,
        body: Value,
    }

    async fn send(router: &Router, request: Request<Body>) -> Reply {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send(router, request).await
    }

    // -----------------------------------------------------------------------
    // Root and listing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn root_endpoint() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"message": DEFAULT_WELCOME}));
    }

    #[tokio::test]
    async fn list_seed_items_in_order() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/items/", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            json!([
                {"id": 1, "name": "Apple", "description": "A juicy fruit"},
                {"id": 2, "name": "Banana", "description": "A yellow fruit"},
                {"id": 3, "name": "Carrot", "description": "A crunchy vegetable"},
            ])
        );

        let without_slash = call(&app.router, Method::GET, "/items", None).await;
        assert_eq!(without_slash.body, reply.body);
    }

    // -----------------------------------------------------------------------
    // Get
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn get_existing_item() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/items/2", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["name"], "Banana");
    }

    #[tokio::test]
    async fn get_missing_item_is_custom_404() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/items/999999", None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, json!({"message": "Item not found", "custom": true}));
    }

    #[tokio::test]
    async fn get_rejects_non_positive_and_non_integer_ids() {
        let app = app();
        for uri in ["/items/0", "/items/-3"] {
            let reply = call(&app.router, Method::GET, uri, None).await;
            assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert_eq!(reply.body["detail"][0]["type"], "greater_than_equal");
            assert_eq!(reply.body["detail"][0]["loc"], json!(["path", "item_id"]));
        }

        let reply = call(&app.router, Method::GET, "/items/abc", None).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.body["detail"][0]["type"], "int_parsing");
        assert!(reply.body.get("custom").is_none());
    }

    #[tokio::test]
    async fn id_beyond_i64_is_422_not_404() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/items/9223372036854775808", None).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.body["detail"][0]["type"], "int_parsing");
        assert_eq!(reply.body["detail"][0]["loc"], json!(["path", "item_id"]));

        let reply = call(&app.router, Method::GET, "/items/9223372036854775807", None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_assigns_max_plus_one_and_round_trips() {
        let app = app();
        let reply = call(
            &app.router,
            Method::POST,
            "/items/",
            Some(json!({"name": "Date", "description": "A sweet fruit"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            json!({"id": 4, "name": "Date", "description": "A sweet fruit"})
        );

        let fetched = call(&app.router, Method::GET, "/items/4", None).await;
        assert_eq!(fetched.body, reply.body);
    }

    #[tokio::test]
    async fn create_on_empty_store_starts_at_one() {
        let app = app_with(InMemoryItemStore::new());
        let reply = call(&app.router, Method::POST, "/items", Some(json!({"name": "Egg"}))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"id": 1, "name": "Egg", "description": null}));
    }

    #[tokio::test]
    async fn create_ignores_body_id() {
        let app = app();
        let reply = call(
            &app.router,
            Method::POST,
            "/items/",
            Some(json!({"id": 100, "name": "Fig"})),
        )
        .await;
        assert_eq!(reply.body["id"], 4);
    }

    #[tokio::test]
    async fn create_shape_violations_are_422() {
        let app = app();
        let cases = [
            json!({"description": "no name"}),
            json!({"name": ""}),
            json!({"name": 12}),
        ];
        for body in cases {
            let reply = call(&app.router, Method::POST, "/items/", Some(body.clone())).await;
            assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
            assert!(reply.body["detail"].is_array(), "{body}");
            assert!(reply.body.get("custom").is_none());
        }

        let request = Request::builder()
            .method(Method::POST)
            .uri("/items/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let reply = send(&app.router, request).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.body["detail"][0]["type"], "json_invalid");

        assert_eq!(app.store.len(), 3);
    }

    #[tokio::test]
    async fn create_without_content_type_reads_json() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/items/")
            .body(Body::from(json!({"name": "Grape"}).to_string()))
            .unwrap();
        let reply = send(&app.router, request).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"id": 4, "name": "Grape", "description": null}));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/items/")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(json!({"name": "Grape"}).to_string()))
            .unwrap();
        let reply = send(&app.router, request).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.body["detail"][0]["type"], "content_type");
        assert_eq!(app.store.len(), 4);
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn update_name_only_keeps_description() {
        let app = app();
        let reply = call(
            &app.router,
            Method::PUT,
            "/items/1",
            Some(json!({"name": "Green Apple"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            json!({"id": 1, "name": "Green Apple", "description": "A juicy fruit"})
        );
    }

    #[tokio::test]
    async fn update_description_only_keeps_name() {
        let app = app();
        let reply = call(
            &app.router,
            Method::PUT,
            "/items/2",
            Some(json!({"description": "Ripe"})),
        )
        .await;
        assert_eq!(reply.body, json!({"id": 2, "name": "Banana", "description": "Ripe"}));
    }

    #[tokio::test]
    async fn update_both_and_path_id_wins() {
        let app = app();
        let reply = call(
            &app.router,
            Method::PUT,
            "/items/3",
            Some(json!({"id": 1, "name": "Beet", "description": "Red"})),
        )
        .await;
        assert_eq!(reply.body, json!({"id": 3, "name": "Beet", "description": "Red"}));
        assert_eq!(app.store.get(ItemId::new(1)).unwrap().name, "Apple");
    }

    #[tokio::test]
    async fn update_missing_is_404() {
        let app = app();
        let reply = call(
            &app.router,
            Method::PUT,
            "/items/77",
            Some(json!({"name": "x"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, json!({"message": "Item not found", "custom": true}));
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_removes_one_and_keeps_order() {
        let app = app();
        let reply = call(&app.router, Method::DELETE, "/items/2", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"detail": "Item 2 deleted"}));

        let list = call(&app.router, Method::GET, "/items/", None).await;
        let ids: Vec<_> = list.body.as_array().unwrap().iter().map(|i| i["id"].clone()).collect();
        assert_eq!(ids, [json!(1), json!(3)]);
    }

    #[tokio::test]
    async fn delete_missing_leaves_store_unchanged() {
        let app = app();
        let before = app.store.list().unwrap();
        let reply = call(&app.router, Method::DELETE, "/items/42", None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, json!({"message": "Item not found", "custom": true}));
        assert_eq!(app.store.list().unwrap(), before);
    }

    // -----------------------------------------------------------------------
    // Background log
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn log_route_acknowledges_and_logs_later() {
        let app = app();
        let reply = call(&app.router, Method::POST, "/items/7/log", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            json!({"detail": "Action will be logged in background."})
        );

        let entries = tokio::time::timeout(Duration::from_secs(2), app.log.wait_for(1))
            .await
            .unwrap();
        assert_eq!(entries, ["Item 7 accessed"]);
    }

    // -----------------------------------------------------------------------
    // Action
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn recognized_actions() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/items/1/action?action=do_view", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"action": "view", "item_id": 1}));

        let reply = call(&app.router, Method::GET, "/items/5/action?action=do_edit", None).await;
        assert_eq!(reply.body, json!({"action": "edit", "item_id": 5}));
    }

    #[tokio::test]
    async fn unknown_action_is_custom_400() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/items/1/action?action=fly", None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.body,
            json!({"message": "Unknown action: fly", "custom": true})
        );

        let reply = call(&app.router, Method::GET, "/items/1/action?action=view", None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["message"], "Unknown action: view");
    }

    #[tokio::test]
    async fn missing_action_is_422() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/items/1/action", None).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.body["detail"][0]["loc"], json!(["query"]));
    }

    // -----------------------------------------------------------------------
    // Cross-cutting
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unknown_route_uses_custom_body() {
        let app = app();
        let reply = call(&app.router, Method::GET, "/nowhere", None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, json!({"message": "Not Found", "custom": true}));
    }

    #[tokio::test]
    async fn wrong_method_uses_custom_body() {
        let app = app();
        let request = Request::builder()
            .method(Method::PATCH)
            .uri("/items/1")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let reply = send(&app.router, request).await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            reply.body,
            json!({"message": "Method Not Allowed", "custom": true})
        );
        let allow = reply.headers[header::ALLOW].to_str().unwrap();
        assert!(allow.contains("GET") && allow.contains("DELETE"), "{allow}");
        assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://example.com");

        let reply = call(&app.router, Method::DELETE, "/items/", None).await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply.body["custom"], true);
        assert_eq!(app.store.len(), 3);
    }

    #[tokio::test]
    async fn cors_headers_on_success_and_error() {
        let app = app();
        for uri in ["/items/1", "/items/999"] {
            let request = Request::builder()
                .uri(uri)
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap();
            let reply = send(&app.router, request).await;
            assert_eq!(
                reply.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
                "http://example.com",
                "{uri}"
            );
            assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        }
    }

    #[tokio::test]
    async fn cors_preflight_allows_anything() {
        let app = app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/items/1")
            .header(header::ORIGIN, "http://client.test")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
            .body(Body::empty())
            .unwrap();
        let reply = send(&app.router, request).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://client.test");
        assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_METHODS], "DELETE");
        assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
    }

    #[tokio::test]
    async fn concurrent_creates_over_http_get_unique_ids() {
        let app = app();
        let mut handles = Vec::new();
        for n in 0..20 {
            let router = app.router.clone();
            handles.push(tokio::spawn(async move {
                call(&router, Method::POST, "/items/", Some(json!({"name": format!("n{n}")})))
                    .await
                    .body["id"]
                    .as_i64()
                    .unwrap()
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (4..24).collect::<Vec<i64>>());
    }
}
