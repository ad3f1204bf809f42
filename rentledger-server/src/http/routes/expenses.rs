//! Expense endpoints
//!
//! Create and update are keyed by property name in the path; the name
//! is resolved to a property id at write time and an unknown name is a
//! 404, never a silently stored dangling link.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::repos::{Expense, ExpenseRepo, ExpenseWithProperty, NewExpense};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidPropertyName};
use crate::http::server::AppState;
use crate::models::{Envelope, PropertyName, ValidationError};

/// Create/update expense request. Every field is required; a partial
/// body is rejected at deserialization.
#[derive(Debug, Deserialize)]
pub struct ExpenseBody {
    pub paid_to: String,
    pub payment_reason: String,
    pub created_on: NaiveDate,
    pub download_url: String,
    pub amount: f64,
    pub fully_paid: bool,
}

impl ExpenseBody {
    /// Cheap field checks the schema can't express.
    fn into_new_expense(self) -> Result<NewExpense, ValidationError> {
        if self.paid_to.trim().is_empty() {
            return Err(ValidationError::Empty { field: "paid_to" });
        }
        if self.payment_reason.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "payment_reason",
            });
        }

        Ok(NewExpense {
            paid_to: self.paid_to,
            payment_reason: self.payment_reason,
            created_on: self.created_on,
            download_url: self.download_url,
            amount: self.amount,
            fully_paid: self.fully_paid,
        })
    }
}

/// Expense response
#[derive(Serialize)]
pub struct ExpenseResponse {
    pub expenses_id: i64,
    pub paid_to: String,
    pub payment_reason: String,
    pub created_on: NaiveDate,
    pub download_url: String,
    pub amount: f64,
    pub fully_paid: bool,
    pub property_id: i64,
    /// Present on joined single-expense reads only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
}

impl From<Expense> for ExpenseResponse {
    fn from(e: Expense) -> Self {
        Self {
            expenses_id: e.expenses_id,
            paid_to: e.paid_to,
            payment_reason: e.payment_reason,
            created_on: e.created_on,
            download_url: e.download_url,
            amount: e.amount,
            fully_paid: e.fully_paid,
            property_id: e.property_id,
            property_name: None,
        }
    }
}

impl From<ExpenseWithProperty> for ExpenseResponse {
    fn from(e: ExpenseWithProperty) -> Self {
        Self {
            expenses_id: e.expenses_id,
            paid_to: e.paid_to,
            payment_reason: e.payment_reason,
            created_on: e.created_on,
            download_url: e.download_url,
            amount: e.amount,
            fully_paid: e.fully_paid,
            property_id: e.property_id,
            property_name: Some(e.property_name),
        }
    }
}

/// `data` payload for list responses
#[derive(Serialize)]
pub struct ExpensesData {
    pub expenses: Vec<ExpenseResponse>,
}

/// `data` payload for single-row responses
#[derive(Serialize)]
pub struct ExpenseData {
    pub expense: ExpenseResponse,
}

/// GET /expenses - list all expenses
async fn list_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<ExpensesData>>, ApiError> {
    let rows = ExpenseRepo::new(&state.pool).list().await?;
    let expenses: Vec<ExpenseResponse> = rows.into_iter().map(ExpenseResponse::from).collect();

    Ok(Json(Envelope::success(
        expenses.len(),
        ExpensesData { expenses },
    )))
}

/// GET /expenses/{expenses_id} - get a single expense joined to its property
async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(expenses_id): Path<i64>,
) -> Result<Json<Envelope<ExpenseData>>, ApiError> {
    let expense = ExpenseRepo::new(&state.pool).get(expenses_id).await?;

    Ok(Json(Envelope::success(
        1,
        ExpenseData {
            expense: expense.into(),
        },
    )))
}

/// POST /expenses/{property_name} - record an expense under a property
async fn create_expense(
    State(state): State<Arc<AppState>>,
    ValidPropertyName(property_name): ValidPropertyName,
    ValidJson(body): ValidJson<ExpenseBody>,
) -> Result<(StatusCode, Json<Envelope<ExpenseData>>), ApiError> {
    let new_expense = body.into_new_expense()?;
    let expense = ExpenseRepo::new(&state.pool)
        .create(property_name.as_str(), new_expense)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            1,
            ExpenseData {
                expense: expense.into(),
            },
        )),
    ))
}

/// PUT /expenses/{property_name}/{expenses_id} - rewrite an expense
///
/// Two path params, so the name is validated inline rather than through
/// the single-segment extractor.
async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path((property_name, expenses_id)): Path<(String, i64)>,
    ValidJson(body): ValidJson<ExpenseBody>,
) -> Result<Json<Envelope<ExpenseData>>, ApiError> {
    let property_name = PropertyName::new(&property_name)?;
    let new_expense = body.into_new_expense()?;
    let expense = ExpenseRepo::new(&state.pool)
        .update(property_name.as_str(), expenses_id, new_expense)
        .await?;

    Ok(Json(Envelope::success(
        1,
        ExpenseData {
            expense: expense.into(),
        },
    )))
}

/// DELETE /expenses/{expenses_id} - delete an expense
async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(expenses_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ExpenseRepo::new(&state.pool).delete(expenses_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Expense routes
///
/// GET/DELETE key the single segment by expense id while POST keys it
/// by property name, so all three share one registered path and each
/// handler extracts the segment as what it expects.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/expenses", get(list_expenses))
        .route(
            "/expenses/{key}",
            get(get_expense).delete(delete_expense).post(create_expense),
        )
        .route("/expenses/{key}/{expenses_id}", put(update_expense))
}
