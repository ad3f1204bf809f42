//! Expense repository
//!
//! Expense writes are keyed by property name, not id. The name is
//! resolved inside a transaction with an explicit not-found branch,
//! so an unknown name is rejected instead of stored as a dangling link.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use super::DbError;

/// Expense record from database
#[derive(Debug, Clone, FromRow)]
pub struct Expense {
    pub expenses_id: i64,
    pub paid_to: String,
    pub payment_reason: String,
    pub created_on: NaiveDate,
    pub download_url: String,
    pub amount: f64,
    pub fully_paid: bool,
    pub property_id: i64,
}

/// Expense joined to its property for single-expense reads
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseWithProperty {
    pub expenses_id: i64,
    pub paid_to: String,
    pub payment_reason: String,
    pub created_on: NaiveDate,
    pub download_url: String,
    pub amount: f64,
    pub fully_paid: bool,
    pub property_id: i64,
    pub property_name: String,
}

/// Field set for expense create/update. All fields are required.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub paid_to: String,
    pub payment_reason: String,
    pub created_on: NaiveDate,
    pub download_url: String,
    pub amount: f64,
    pub fully_paid: bool,
}

/// Expense repository
pub struct ExpenseRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ExpenseRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all expenses.
    pub async fn list(&self) -> Result<Vec<Expense>, DbError> {
        let rows: Vec<Expense> = sqlx::query_as(
            r#"
            SELECT expenses_id, paid_to, payment_reason, created_on,
                   download_url, amount, fully_paid, property_id
            FROM expenses
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a single expense by id, joined to its property.
    ///
    /// An orphaned expense (property deleted after the fact) has no
    /// matching join row and reads as not found, same as the plain
    /// missing-id case.
    pub async fn get(&self, expenses_id: i64) -> Result<ExpenseWithProperty, DbError> {
        let expense: ExpenseWithProperty = sqlx::query_as(
            r#"
            SELECT e.expenses_id, e.paid_to, e.payment_reason, e.created_on,
                   e.download_url, e.amount, e.fully_paid, e.property_id,
                   p.property_name
            FROM expenses e
            JOIN properties p ON e.property_id = p.property_id
            WHERE e.expenses_id = $1
            "#,
        )
        .bind(expenses_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "expense",
            id: expenses_id.to_string(),
        })?;

        Ok(expense)
    }

    /// Create an expense under the named property (atomic).
    pub async fn create(
        &self,
        property_name: &str,
        expense: NewExpense,
    ) -> Result<Expense, DbError> {
        let mut tx = self.pool.begin().await?;

        let property_id = resolve_property_id(&mut tx, property_name).await?;

        let inserted: Expense = sqlx::query_as(
            r#"
            INSERT INTO expenses
                (paid_to, payment_reason, created_on, download_url, amount, fully_paid, property_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING expenses_id, paid_to, payment_reason, created_on,
                      download_url, amount, fully_paid, property_id
            "#,
        )
        .bind(&expense.paid_to)
        .bind(&expense.payment_reason)
        .bind(expense.created_on)
        .bind(&expense.download_url)
        .bind(expense.amount)
        .bind(expense.fully_paid)
        .bind(property_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(inserted)
    }

    /// Update an expense, re-resolving the property by name (atomic).
    ///
    /// Every field is written; there are no partial updates.
    pub async fn update(
        &self,
        property_name: &str,
        expenses_id: i64,
        expense: NewExpense,
    ) -> Result<Expense, DbError> {
        let mut tx = self.pool.begin().await?;

        let property_id = resolve_property_id(&mut tx, property_name).await?;

        let updated: Expense = sqlx::query_as(
            r#"
            UPDATE expenses
            SET paid_to = $1, payment_reason = $2, created_on = $3,
                download_url = $4, amount = $5, fully_paid = $6, property_id = $7
            WHERE expenses_id = $8
            RETURNING expenses_id, paid_to, payment_reason, created_on,
                      download_url, amount, fully_paid, property_id
            "#,
        )
        .bind(&expense.paid_to)
        .bind(&expense.payment_reason)
        .bind(expense.created_on)
        .bind(&expense.download_url)
        .bind(expense.amount)
        .bind(expense.fully_paid)
        .bind(property_id)
        .bind(expenses_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "expense",
            id: expenses_id.to_string(),
        })?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete an expense by id.
    pub async fn delete(&self, expenses_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM expenses WHERE expenses_id = $1")
            .bind(expenses_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "expense",
                id: expenses_id.to_string(),
            });
        }

        Ok(())
    }
}

/// Resolve a property name to its id, or fail with NotFound.
async fn resolve_property_id(
    tx: &mut Transaction<'_, Postgres>,
    property_name: &str,
) -> Result<i64, DbError> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT property_id FROM properties WHERE property_name = $1")
            .bind(property_name)
            .fetch_optional(&mut **tx)
            .await?;

    row.map(|(id,)| id).ok_or_else(|| DbError::NotFound {
        resource: "property",
        id: property_name.to_owned(),
    })
}
