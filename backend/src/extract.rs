//! Request extractors with API-shaped rejections

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON request body whose rejections render as `ApiError`
///
/// A missing content type, unparsable JSON or a missing field all become
/// `400 {"code","message"}` instead of axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
