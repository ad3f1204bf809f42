//! Schema migrations for the properties and expenses tables

use sqlx::PgPool;

/// Run all migrations. Every statement is idempotent.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    // property_name is UNIQUE: expense routes resolve it to an id,
    // so the lookup must be deterministic.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            property_id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            property_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // property_id carries no REFERENCES clause: deleting a property
    // leaves its expenses in place rather than cascading or blocking.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            expenses_id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            paid_to TEXT NOT NULL,
            payment_reason TEXT NOT NULL,
            created_on DATE NOT NULL,
            download_url TEXT NOT NULL,
            amount DOUBLE PRECISION NOT NULL,
            fully_paid BOOLEAN NOT NULL,
            property_id BIGINT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_expenses_property ON expenses(property_id)")
        .execute(pool)
        .await?;

    tracing::info!("Migrations complete");
    Ok(())
}
