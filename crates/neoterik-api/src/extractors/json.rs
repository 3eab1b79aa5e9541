//! JSON body extractor with API-shaped rejections.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use neoterik_core::error::AppError;

use crate::error::ApiError;

/// Like `Json<T>`, but an unreadable body is reported as `MISSING_FIELD`
/// in the standard error envelope instead of Axum's plain-text rejection.
///
/// Used by registration. Login reads its body leniently instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
            AppError::missing_field("Request body must be a JSON object")
        })?;
        Ok(Self(value))
    }
}
