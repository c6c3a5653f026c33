use sqlx::PgPool;

use crate::error::CatalogError;

/// List base tables and views in a schema as `(name, is_view)` pairs.
pub async fn query_tables(pool: &PgPool, schema: &str) -> Result<Vec<(String, bool)>, CatalogError> {
    let rows = sqlx::query_as::<_, TableRow>(
        r#"
        SELECT t.table_name, t.table_type
        FROM information_schema.tables t
        WHERE t.table_schema = $1
          AND t.table_type IN ('BASE TABLE', 'VIEW')
        ORDER BY t.table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let is_view = row.table_type == "VIEW";
            (row.table_name, is_view)
        })
        .collect())
}

#[derive(sqlx::FromRow)]
struct TableRow {
    table_name: String,
    table_type: String,
}
