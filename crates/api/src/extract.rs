//! Request body extractors.

use axum::extract::{FromRequest, Request};
use axum::Json;
use librairie_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then validated with [`Validate`].
///
/// Malformed bodies are rejected with 400 BAD_REQUEST and failed validation
/// with 400 VALIDATION_ERROR, both in the standard error envelope.
///
/// ```ignore
/// async fn create(ValidJson(input): ValidJson<CategoryRequest>) -> AppResult<...> { ... }
/// ```
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate().map_err(CoreError::from)?;
        Ok(Self(value))
    }
}
