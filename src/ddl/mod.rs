mod statement;
mod view;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

pub use statement::{parse_ddl, DdlStatement, IndexDef, ParsedStatement, TableDef, ViewDef};

use crate::error::CatalogError;
use crate::schema::{
    index_columns, primary_key_columns, Column, Index, IndexColumn, SchemaSource, Table,
    PRIMARY_KEY,
};

/// Everything declared under one table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOrView {
    Table {
        table: TableDef,
        indexes: Vec<IndexDef>,
    },
    View(ViewDef),
}

/// A schema catalog built from DDL text.
///
/// Statements are integrated in a single pass, so a table must be declared
/// before any index on it. Construction is all-or-nothing and the result is
/// immutable, so it can be shared freely between readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlCatalog {
    dialect: String,
    tables: IndexMap<String, TableOrView>,
}

impl DdlCatalog {
    /// Read and load a DDL file.
    pub fn from_path(path: &Path, dialect: &str) -> Result<Self, CatalogError> {
        tracing::debug!("Reading DDL from {}", path.display());
        let sql = fs::read_to_string(path)?;
        Self::from_sql(&sql, dialect)
    }

    pub fn from_sql(sql: &str, dialect: &str) -> Result<Self, CatalogError> {
        let statements = parse_ddl(sql, dialect)?;
        Self::from_statements(statements, dialect)
    }

    /// Build a catalog from already parsed statements. `dialect` is used to
    /// re-parse view definitions later on.
    pub fn from_statements<I>(statements: I, dialect: &str) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = ParsedStatement>,
    {
        let mut tables: IndexMap<String, TableOrView> = IndexMap::new();

        for stmt in statements {
            match stmt.kind {
                DdlStatement::CreateTable(def) => {
                    tracing::debug!("Table {}", def.name);
                    match tables.get_mut(&def.name) {
                        Some(TableOrView::Table { table, .. }) => *table = def,
                        Some(TableOrView::View(_)) => {
                            return Err(CatalogError::NameConflict {
                                name: def.name,
                                statement: stmt.sql,
                            });
                        }
                        None => {
                            tables.insert(
                                def.name.clone(),
                                TableOrView::Table {
                                    table: def,
                                    indexes: Vec::new(),
                                },
                            );
                        }
                    }
                }
                DdlStatement::CreateIndex(def) => {
                    tracing::debug!("Index {} on {}", def.name, def.table);
                    match tables.get_mut(&def.table) {
                        Some(TableOrView::Table { indexes, .. }) => indexes.push(def),
                        _ => {
                            return Err(CatalogError::UndefinedTable {
                                table: def.table,
                                statement: stmt.sql,
                            });
                        }
                    }
                }
                DdlStatement::AlterTable(alter) => {
                    if !alter.adds_constraint_only {
                        return Err(CatalogError::UnsupportedStatement(stmt.sql));
                    }
                    tracing::debug!("Skipping constraint on {}", alter.table);
                }
                DdlStatement::CreateView(def) => {
                    tracing::debug!("View {}", def.name);
                    match tables.get_mut(&def.name) {
                        Some(TableOrView::View(view)) => *view = def,
                        Some(TableOrView::Table { .. }) => {
                            return Err(CatalogError::NameConflict {
                                name: def.name,
                                statement: stmt.sql,
                            });
                        }
                        None => {
                            tables.insert(def.name.clone(), TableOrView::View(def));
                        }
                    }
                }
            }
        }

        tracing::debug!("Loaded {} tables/views from DDL", tables.len());

        Ok(Self {
            dialect: dialect.to_string(),
            tables,
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    fn table_def(&self, name: &str) -> Option<(&TableDef, &[IndexDef])> {
        match self.tables.get(name) {
            Some(TableOrView::Table { table, indexes }) => Some((table, indexes.as_slice())),
            _ => None,
        }
    }

    fn primary_key_column_list(&self, name: &str) -> Result<Vec<IndexColumn>, CatalogError> {
        let table = match self.tables.get(name) {
            None => return Ok(Vec::new()),
            Some(TableOrView::Table { table, .. }) => table,
            // Read-only views borrow the primary key of their base table
            Some(TableOrView::View(view)) => {
                let base = view::base_table_for_view(&view.sql, &self.dialect)?;
                tracing::debug!("View {name} resolves to base table {base}");
                match self.tables.get(&base) {
                    None => return Ok(Vec::new()),
                    Some(TableOrView::Table { table, .. }) => table,
                    Some(TableOrView::View(_)) => {
                        return Err(CatalogError::UnsupportedViewSource(format!(
                            "view over view is not supported: '{name}' selects from view '{base}'"
                        )));
                    }
                }
            }
        };

        Ok(primary_key_columns(&table.primary_key))
    }
}

impl SchemaSource for DdlCatalog {
    fn table_list(&self) -> Result<Vec<Table>, CatalogError> {
        let tables = self
            .tables
            .values()
            .filter_map(|t| match t {
                TableOrView::Table { table, .. } => Some(Table {
                    name: table.name.clone(),
                    manual_pk: true,
                }),
                TableOrView::View(_) => None,
            })
            .collect();
        Ok(tables)
    }

    fn view_list(&self) -> Result<Vec<String>, CatalogError> {
        let views = self
            .tables
            .values()
            .filter_map(|t| match t {
                TableOrView::View(view) => Some(view.name.clone()),
                TableOrView::Table { .. } => None,
            })
            .collect();
        Ok(views)
    }

    fn column_list(&self, table: &str) -> Result<Vec<Column>, CatalogError> {
        let Some((table, _)) = self.table_def(table) else {
            return Ok(Vec::new());
        };

        let pk: HashSet<&str> = table.primary_key.iter().map(String::as_str).collect();
        let columns = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| Column {
                ordinal: i + 1,
                name: c.name.clone(),
                data_type: c.data_type.clone(),
                not_null: c.not_null,
                is_primary_key: pk.contains(c.name.as_str()),
                is_generated: c.is_generated,
            })
            .collect();
        Ok(columns)
    }

    fn index_list(&self, table: &str) -> Result<Vec<Index>, CatalogError> {
        let Some((_, indexes)) = self.table_def(table) else {
            return Ok(Vec::new());
        };
        Ok(indexes
            .iter()
            .map(|ix| Index {
                name: ix.name.clone(),
                is_unique: ix.unique,
            })
            .collect())
    }

    fn index_column_list(
        &self,
        table: &str,
        index: &str,
    ) -> Result<Vec<IndexColumn>, CatalogError> {
        if index == PRIMARY_KEY {
            return self.primary_key_column_list(table);
        }

        let Some((_, indexes)) = self.table_def(table) else {
            return Ok(Vec::new());
        };
        Ok(indexes
            .iter()
            .find(|ix| ix.name == index)
            .map(|ix| index_columns(&ix.keys, &ix.storing))
            .unwrap_or_default())
    }
}
