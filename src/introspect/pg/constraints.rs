use sqlx::PgPool;

use crate::error::CatalogError;

/// Primary key column names in key order. Empty when the table has none.
pub async fn query_primary_key(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<String>, CatalogError> {
    let rows = sqlx::query_as::<_, PkRow>(
        r#"
        SELECT kcu.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            USING (constraint_name, table_schema, table_name)
        WHERE tc.table_schema = $1 AND tc.table_name = $2
            AND tc.constraint_type = 'PRIMARY KEY'
        ORDER BY kcu.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.column_name).collect())
}

#[derive(sqlx::FromRow)]
struct PkRow {
    column_name: String,
}
