//! Property endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Property, PropertyRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::models::{Envelope, PropertyName};

/// Create/update property request
#[derive(Deserialize)]
pub struct PropertyBody {
    pub property_name: String,
}

/// Property response
#[derive(Serialize)]
pub struct PropertyResponse {
    pub property_id: i64,
    pub property_name: String,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        Self {
            property_id: p.property_id,
            property_name: p.property_name,
        }
    }
}

/// `data` payload for list responses
#[derive(Serialize)]
pub struct PropertiesData {
    pub properties: Vec<PropertyResponse>,
}

/// `data` payload for single-row responses
#[derive(Serialize)]
pub struct PropertyData {
    pub property: PropertyResponse,
}

/// GET /properties - list all properties
async fn list_properties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<PropertiesData>>, ApiError> {
    let rows = PropertyRepo::new(&state.pool).list().await?;
    let properties: Vec<PropertyResponse> = rows.into_iter().map(PropertyResponse::from).collect();

    Ok(Json(Envelope::success(
        properties.len(),
        PropertiesData { properties },
    )))
}

/// GET /properties/{property_id} - get a single property
async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<i64>,
) -> Result<Json<Envelope<PropertyData>>, ApiError> {
    let property = PropertyRepo::new(&state.pool).get(property_id).await?;

    Ok(Json(Envelope::success(
        1,
        PropertyData {
            property: property.into(),
        },
    )))
}

/// POST /properties - create a property
async fn create_property(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<PropertyBody>,
) -> Result<(StatusCode, Json<Envelope<PropertyData>>), ApiError> {
    let name = PropertyName::new(&body.property_name)?;
    let property = PropertyRepo::new(&state.pool).create(name).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            1,
            PropertyData {
                property: property.into(),
            },
        )),
    ))
}

/// PUT /properties/{property_id} - rename a property
async fn update_property(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<i64>,
    ValidJson(body): ValidJson<PropertyBody>,
) -> Result<Json<Envelope<PropertyData>>, ApiError> {
    let name = PropertyName::new(&body.property_name)?;
    let property = PropertyRepo::new(&state.pool)
        .update(property_id, name)
        .await?;

    Ok(Json(Envelope::success(
        1,
        PropertyData {
            property: property.into(),
        },
    )))
}

/// DELETE /properties/{property_id} - delete a property
///
/// Expenses recorded against the property are left in place.
async fn delete_property(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    PropertyRepo::new(&state.pool).delete(property_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Property routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/{property_id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
}
