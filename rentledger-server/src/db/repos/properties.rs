//! Property repository

use sqlx::{FromRow, PgPool};

use crate::models::PropertyName;

/// Property record from database
#[derive(Debug, Clone, FromRow)]
pub struct Property {
    pub property_id: i64,
    pub property_name: String,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },
}

impl DbError {
    /// Map a unique violation to Conflict, anything else to Sqlx.
    pub(crate) fn from_write(e: sqlx::Error, resource: &'static str, id: String) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict { resource, id }
            }
            _ => Self::Sqlx(e),
        }
    }
}

/// Property repository
pub struct PropertyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PropertyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all properties.
    pub async fn list(&self) -> Result<Vec<Property>, DbError> {
        let rows: Vec<Property> =
            sqlx::query_as("SELECT property_id, property_name FROM properties")
                .fetch_all(self.pool)
                .await?;

        Ok(rows)
    }

    /// Get a single property by id.
    pub async fn get(&self, property_id: i64) -> Result<Property, DbError> {
        let property: Property = sqlx::query_as(
            "SELECT property_id, property_name FROM properties WHERE property_id = $1",
        )
        .bind(property_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "property",
            id: property_id.to_string(),
        })?;

        Ok(property)
    }

    /// Create a property, returning the inserted row.
    pub async fn create(&self, name: PropertyName) -> Result<Property, DbError> {
        let property: Property = sqlx::query_as(
            r#"
            INSERT INTO properties (property_name)
            VALUES ($1)
            RETURNING property_id, property_name
            "#,
        )
        .bind(name.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "property", name.as_str().to_owned()))?;

        Ok(property)
    }

    /// Update a property's name, returning the updated row.
    pub async fn update(&self, property_id: i64, name: PropertyName) -> Result<Property, DbError> {
        let property: Property = sqlx::query_as(
            r#"
            UPDATE properties
            SET property_name = $1
            WHERE property_id = $2
            RETURNING property_id, property_name
            "#,
        )
        .bind(name.as_str())
        .bind(property_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::from_write(e, "property", name.as_str().to_owned()))?
        .ok_or_else(|| DbError::NotFound {
            resource: "property",
            id: property_id.to_string(),
        })?;

        Ok(property)
    }

    /// Delete a property by id.
    ///
    /// Expenses recorded against it are left in place; there is no cascade.
    pub async fn delete(&self, property_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM properties WHERE property_id = $1")
            .bind(property_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "property",
                id: property_id.to_string(),
            });
        }

        Ok(())
    }
}
