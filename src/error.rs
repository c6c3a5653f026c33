use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("table '{table}' is undefined, but got '{statement}'")]
    UndefinedTable { table: String, statement: String },

    #[error("'{name}' is declared as both a table and a view, got '{statement}'")]
    NameConflict { name: String, statement: String },

    #[error(
        "stmt should be CreateTable, CreateIndex, CreateView or AlterTableAddConstraint, but got '{0}'"
    )]
    UnsupportedStatement(String),

    #[error("{0}")]
    UnsupportedViewSource(String),

    #[error("Parse error: {0}")]
    Parse(#[from] sqlparser::parser::ParserError),

    #[error("Unsupported SQL dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
