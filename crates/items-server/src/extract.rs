//! Shape-validating extractors.
//!
//! Every extractor here turns axum's rejections into
//! [`ServerError::Validation`], so shape faults always surface as 422 with a
//! `{"detail": [...]}` body and never reach handler logic.

use async_trait::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderValue};
use axum::Json;
use serde::de::DeserializeOwned;

use items_types::{CreateItem, ItemId, UpdateItem};

use crate::error::{FieldIssue, ServerError};

/// Request bodies that carry constraints beyond what serde checks.
pub trait ValidateBody {
    fn validate_body(&self) -> Result<(), ServerError> {
        Ok(())
    }
}

impl ValidateBody for CreateItem {
    fn validate_body(&self) -> Result<(), ServerError> {
        self.validate().map_err(ServerError::from)
    }
}

impl ValidateBody for UpdateItem {}

/// JSON body that has been deserialized and validated.
///
/// A body sent without `Content-Type` is read as JSON; any other declared
/// type is rejected.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + ValidateBody,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        req.headers_mut()
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_issue)?;
        value.validate_body()?;
        Ok(Self(value))
    }
}

fn json_issue(rejection: JsonRejection) -> ServerError {
    let kind = match &rejection {
        JsonRejection::JsonDataError(_) => "value_error",
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "content_type",
        _ => "body",
    };
    ServerError::validation(FieldIssue::new(["body"], rejection.body_text(), kind))
}

/// `{item_id}` path segment parsed as an integer. Any integer is accepted.
#[derive(Clone, Copy, Debug)]
pub struct ItemIdParam(pub ItemId);

#[async_trait]
impl<S> FromRequestParts<S> for ItemIdParam
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(path_issue)?;
        Ok(Self(ItemId::new(raw)))
    }
}

/// `{item_id}` path segment that must also be `>= 1`.
#[derive(Clone, Copy, Debug)]
pub struct PositiveItemId(pub ItemId);

#[async_trait]
impl<S> FromRequestParts<S> for PositiveItemId
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ItemIdParam(id) = ItemIdParam::from_request_parts(parts, state).await?;
        Ok(Self(ItemId::positive(id.get())?))
    }
}

fn path_issue(rejection: PathRejection) -> ServerError {
    ServerError::validation(FieldIssue::new(
        ["path", "item_id"],
        rejection.body_text(),
        "int_parsing",
    ))
}

/// Query string deserialized into `T`.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_issue)?;
        Ok(Self(value))
    }
}

fn query_issue(rejection: QueryRejection) -> ServerError {
    ServerError::validation(FieldIssue::new(
        ["query"],
        rejection.body_text(),
        "missing",
    ))
}
