pub mod pg;

use indexmap::IndexMap;

use crate::error::CatalogError;
use crate::schema::{
    index_columns, primary_key_columns, Column, Index, IndexColumn, SchemaSource, Table,
    PRIMARY_KEY,
};

/// A snapshot of a live database schema.
///
/// Introspection runs once up front; afterwards the snapshot answers the
/// same accessor calls as a DDL catalog without touching the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveCatalog {
    tables: IndexMap<String, LiveTable>,
}

/// Metadata for a single introspected table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTable {
    pub name: String,
    pub is_view: bool,
    pub manual_pk: bool,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub indexes: Vec<LiveIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveIndex {
    pub name: String,
    pub is_unique: bool,
    pub keys: Vec<String>,
    pub storing: Vec<String>,
}

impl LiveCatalog {
    pub fn insert(&mut self, table: LiveTable) {
        if let Some(previous) = self.tables.insert(table.name.clone(), table) {
            tracing::warn!(
                "Table {} appears in more than one schema; keeping the last one",
                previous.name
            );
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    fn table(&self, name: &str) -> Option<&LiveTable> {
        self.tables.get(name).filter(|t| !t.is_view)
    }
}

impl SchemaSource for LiveCatalog {
    fn table_list(&self) -> Result<Vec<Table>, CatalogError> {
        Ok(self
            .tables
            .values()
            .filter(|t| !t.is_view)
            .map(|t| Table {
                name: t.name.clone(),
                manual_pk: t.manual_pk,
            })
            .collect())
    }

    fn view_list(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .tables
            .values()
            .filter(|t| t.is_view)
            .map(|t| t.name.clone())
            .collect())
    }

    fn column_list(&self, table: &str) -> Result<Vec<Column>, CatalogError> {
        Ok(self
            .table(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    fn index_list(&self, table: &str) -> Result<Vec<Index>, CatalogError> {
        Ok(self
            .table(table)
            .map(|t| {
                t.indexes
                    .iter()
                    .map(|ix| Index {
                        name: ix.name.clone(),
                        is_unique: ix.is_unique,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn index_column_list(
        &self,
        table: &str,
        index: &str,
    ) -> Result<Vec<IndexColumn>, CatalogError> {
        // Views carry no primary key in PostgreSQL
        let Some(table) = self.table(table) else {
            return Ok(Vec::new());
        };
        if index == PRIMARY_KEY {
            return Ok(primary_key_columns(&table.primary_key));
        }
        Ok(table
            .indexes
            .iter()
            .find(|ix| ix.name == index)
            .map(|ix| index_columns(&ix.keys, &ix.storing))
            .unwrap_or_default())
    }
}
