//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;

use super::error::ApiError;
use crate::models::{PropertyName, ValidationError};

/// JSON body extractor that rejects with a 400 instead of axum's
/// default 422, so malformed and partial bodies surface as
/// validation errors.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            ApiError::Validation(ValidationError::Body {
                reason: e.body_text(),
            })
        })?;

        Ok(Self(value))
    }
}

/// Extract and validate a property name from path
pub struct ValidPropertyName(pub PropertyName);

impl<S> FromRequestParts<S> for ValidPropertyName
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name): Path<String> =
            Path::from_request_parts(parts, state).await.map_err(|_| {
                ApiError::Validation(ValidationError::Empty {
                    field: "property name",
                })
            })?;

        let property_name = PropertyName::new(&name)?;
        Ok(Self(property_name))
    }
}
