mod columns;
mod constraints;
mod indexes;
mod tables;

use sqlx::PgPool;

use super::{LiveCatalog, LiveTable};
use crate::error::CatalogError;

/// Introspect a PostgreSQL database into a schema snapshot.
pub async fn introspect(pool: &PgPool, schemas: &[String]) -> Result<LiveCatalog, CatalogError> {
    let mut catalog = LiveCatalog::default();

    for schema in schemas {
        let schema_tables = tables::query_tables(pool, schema).await?;
        tracing::debug!("Schema {schema}: {} tables/views", schema_tables.len());

        for (name, is_view) in schema_tables {
            let primary_key = constraints::query_primary_key(pool, schema, &name).await?;
            let (columns, manual_pk) =
                columns::query_columns(pool, schema, &name, &primary_key).await?;
            let indexes = if is_view {
                Vec::new()
            } else {
                indexes::query_indexes(pool, schema, &name).await?
            };

            catalog.insert(LiveTable {
                name,
                is_view,
                manual_pk,
                columns,
                primary_key,
                indexes,
            });
        }
    }

    Ok(catalog)
}
