//! Body and query extractors whose rejections go through [`AppError`], so a
//! malformed payload is a 400 in the usual response envelope.

use axum::extract::{FromRequest, FromRequestParts, OptionalFromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// A missing or non-JSON body is `None`; a JSON body that does not parse is
/// still rejected.
impl<T, S> OptionalFromRequest<S> for AppJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body: Option<Json<T>> =
            <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
        Ok(body.map(|Json(value)| AppJson(value)))
    }
}
