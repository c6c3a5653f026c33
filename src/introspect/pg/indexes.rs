use sqlx::PgPool;

use crate::error::CatalogError;
use crate::introspect::LiveIndex;

/// Query secondary indexes, splitting key columns from `INCLUDE` columns.
pub async fn query_indexes(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<LiveIndex>, CatalogError> {
    let rows = sqlx::query_as::<_, IndexRow>(
        r#"
        SELECT i.relname AS index_name, ix.indisunique AS is_unique,
               a.attname AS column_name, k.ord > ix.indnkeyatts AS is_included
        FROM pg_index ix
        JOIN pg_class t ON t.oid = ix.indrelid
        JOIN pg_class i ON i.oid = ix.indexrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        CROSS JOIN LATERAL unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
        JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
        WHERE n.nspname = $1 AND t.relname = $2 AND NOT ix.indisprimary
        ORDER BY i.relname, k.ord
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    Ok(group_index_rows(rows))
}

/// Fold per-column rows (sorted by index name, then position) into indexes.
fn group_index_rows(rows: Vec<IndexRow>) -> Vec<LiveIndex> {
    let mut indexes: Vec<LiveIndex> = Vec::new();
    for row in rows {
        if indexes.last().is_none_or(|last| last.name != row.index_name) {
            indexes.push(LiveIndex {
                name: row.index_name,
                is_unique: row.is_unique,
                keys: Vec::new(),
                storing: Vec::new(),
            });
        }
        let Some(index) = indexes.last_mut() else {
            continue;
        };
        if row.is_included {
            index.storing.push(row.column_name);
        } else {
            index.keys.push(row.column_name);
        }
    }
    indexes
}

#[derive(sqlx::FromRow)]
struct IndexRow {
    index_name: String,
    is_unique: bool,
    column_name: String,
    is_included: bool,
}
