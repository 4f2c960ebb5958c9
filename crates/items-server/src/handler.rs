use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use items_types::{ActionResult, CreateItem, ItemAction, ItemView, UpdateItem};

use crate::error::{ServerError, ServerResult};
use crate::extract::{ItemIdParam, PositiveItemId, ValidJson, ValidQuery};
use crate::state::AppState;
use crate::tasks::{BackgroundJob, BackgroundTasks};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ActionQuery {
    pub action: String,
}

/// Welcome handler.
pub async fn root(State(state): State<AppState>) -> Json<Message> {
    Json(Message {
        message: state.welcome.to_string(),
    })
}

pub async fn list_items(State(state): State<AppState>) -> ServerResult<Json<Vec<ItemView>>> {
    let items = state.store.list()?;
    Ok(Json(items.iter().map(|item| item.to_view()).collect()))
}

pub async fn get_item(
    State(state): State<AppState>,
    PositiveItemId(id): PositiveItemId,
) -> ServerResult<Json<ItemView>> {
    Ok(Json(state.store.get(id)?.to_view()))
}

pub async fn create_item(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateItem>,
) -> ServerResult<Json<ItemView>> {
    let item = state.store.create(body.into_new_item())?;
    tracing::info!(id = %item.id, "item created");
    Ok(Json(item.to_view()))
}

/// Partial update: only non-empty fields in the body are written. A body
/// `id` is ignored.
pub async fn update_item(
    State(state): State<AppState>,
    ItemIdParam(id): ItemIdParam,
    ValidJson(body): ValidJson<UpdateItem>,
) -> ServerResult<Json<ItemView>> {
    let item = state.store.update(id, &body.into_patch())?;
    Ok(Json(item.to_view()))
}

pub async fn delete_item(
    State(state): State<AppState>,
    ItemIdParam(id): ItemIdParam,
) -> ServerResult<Json<Detail>> {
    state.store.remove(id)?;
    tracing::info!(%id, "item deleted");
    Ok(Json(Detail::new(format!("Item {id} deleted"))))
}

/// Acknowledge immediately; the log line is written after the response.
/// The id is not looked up.
pub async fn log_item_action(
    ItemIdParam(id): ItemIdParam,
    tasks: BackgroundTasks,
) -> Json<Detail> {
    tasks.add(BackgroundJob::log_action(format!("Item {id} accessed")));
    Json(Detail::new("Action will be logged in background."))
}

pub async fn item_action(
    ItemIdParam(id): ItemIdParam,
    ValidQuery(query): ValidQuery<ActionQuery>,
) -> ServerResult<Json<ActionResult>> {
    let action = ItemAction::parse(&query.action)?;
    Ok(Json(ActionResult::new(action, id)))
}

pub async fn not_found() -> ServerError {
    ServerError::RouteNotFound
}

/// Give routing-level 405s the same body as every other fault, keeping the
/// `Allow` header.
pub async fn method_not_allowed_body(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = ServerError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}
