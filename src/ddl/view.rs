use sqlparser::ast::{SetExpr, Statement, TableFactor};
use sqlparser::parser::Parser;

use super::statement::{object_name, resolve_dialect};
use crate::error::CatalogError;

/// Find the single table a view selects from.
///
/// `sql` is the rendered `CREATE VIEW` statement. Only a plain
/// `SELECT ... FROM <table>` source is supported.
pub fn base_table_for_view(sql: &str, dialect: &str) -> Result<String, CatalogError> {
    let dialect = resolve_dialect(dialect)?;
    let statements = Parser::parse_sql(dialect.as_ref(), sql)?;
    let query = match statements.as_slice() {
        [Statement::CreateView { query, .. }] => query,
        _ => {
            return Err(CatalogError::UnsupportedViewSource(format!(
                "expected a single CREATE VIEW statement, but got '{sql}'"
            )))
        }
    };

    if query.with.is_some() {
        return Err(unknown_source("common table expression"));
    }

    let select = match query.body.as_ref() {
        SetExpr::Select(select) => select,
        other => return Err(unknown_source(set_expr_kind(other))),
    };

    match select.from.as_slice() {
        [] => Err(unknown_source("no FROM clause")),
        [from] if from.joins.is_empty() => match &from.relation {
            TableFactor::Table {
                name, args: None, ..
            } => Ok(object_name(name)),
            TableFactor::Table { args: Some(_), .. } => Err(unknown_source("table function")),
            TableFactor::NestedJoin { .. } => Err(join_unsupported()),
            TableFactor::Derived { .. } => Err(unknown_source("derived table")),
            TableFactor::TableFunction { .. } => Err(unknown_source("table function")),
            TableFactor::UNNEST { .. } => Err(unknown_source("unnest")),
            _ => Err(unknown_source("unsupported table factor")),
        },
        _ => Err(join_unsupported()),
    }
}

fn join_unsupported() -> CatalogError {
    CatalogError::UnsupportedViewSource("view with join is not supported".to_string())
}

fn unknown_source(kind: &str) -> CatalogError {
    CatalogError::UnsupportedViewSource(format!("unknown source type: {kind}"))
}

fn set_expr_kind(expr: &SetExpr) -> &'static str {
    match expr {
        SetExpr::Query(_) => "subquery",
        SetExpr::SetOperation { .. } => "set operation",
        SetExpr::Values(_) => "values",
        _ => "unsupported query body",
    }
}
