use sqlparser::ast::{
    AlterTableOperation, ColumnOption, CreateIndex, CreateTable, Expr, ObjectName, Statement,
    TableConstraint,
};
use sqlparser::dialect::{dialect_from_str, Dialect};
use sqlparser::parser::Parser;

use crate::error::CatalogError;

/// A `CREATE TABLE` reduced to what the catalog needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Primary key column names in declared order.
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    /// The column has a computed value expression.
    pub is_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub table: String,
    pub unique: bool,
    pub keys: Vec<String>,
    pub storing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDef {
    pub name: String,
    /// The full rendered `CREATE VIEW` statement, re-parsed on demand.
    pub sql: String,
}

/// The closed set of statements a DDL catalog accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdlStatement {
    CreateTable(TableDef),
    CreateIndex(IndexDef),
    CreateView(ViewDef),
    AlterTable(AlterTable),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTable {
    pub table: String,
    /// Every alteration in the statement adds a constraint.
    pub adds_constraint_only: bool,
}

/// A converted statement along with its rendered SQL, kept for error messages.
#[derive(Debug, Clone)]
pub struct ParsedStatement {
    pub sql: String,
    pub kind: DdlStatement,
}

/// Look up a `sqlparser` dialect by name (`generic`, `postgresql`, `bigquery`, ...).
pub fn resolve_dialect(name: &str) -> Result<Box<dyn Dialect>, CatalogError> {
    dialect_from_str(name).ok_or_else(|| CatalogError::UnsupportedDialect(name.to_string()))
}

/// Parse DDL text into the statement kinds the catalog understands.
pub fn parse_ddl(sql: &str, dialect: &str) -> Result<Vec<ParsedStatement>, CatalogError> {
    let dialect = resolve_dialect(dialect)?;
    let statements = Parser::parse_sql(dialect.as_ref(), sql)?;
    statements.iter().map(ParsedStatement::try_from).collect()
}

impl TryFrom<&Statement> for ParsedStatement {
    type Error = CatalogError;

    fn try_from(stmt: &Statement) -> Result<Self, Self::Error> {
        let sql = stmt.to_string();
        let kind = match stmt {
            Statement::CreateTable(create) => DdlStatement::CreateTable(table_def(create)),
            Statement::CreateIndex(create) => match index_def(create) {
                Some(index) => DdlStatement::CreateIndex(index),
                // Unnamed indexes cannot be addressed through the accessor contract
                None => return Err(CatalogError::UnsupportedStatement(sql)),
            },
            Statement::CreateView { name, .. } => DdlStatement::CreateView(ViewDef {
                name: object_name(name),
                sql: sql.clone(),
            }),
            Statement::AlterTable {
                name, operations, ..
            } => DdlStatement::AlterTable(AlterTable {
                table: object_name(name),
                adds_constraint_only: !operations.is_empty()
                    && operations
                        .iter()
                        .all(|op| matches!(op, AlterTableOperation::AddConstraint(_))),
            }),
            _ => return Err(CatalogError::UnsupportedStatement(sql)),
        };
        Ok(ParsedStatement { sql, kind })
    }
}

fn table_def(create: &CreateTable) -> TableDef {
    let mut inline_pk = Vec::new();
    let mut columns: Vec<ColumnDef> = create
        .columns
        .iter()
        .map(|col| {
            let mut def = ColumnDef {
                name: col.name.value.clone(),
                data_type: col.data_type.to_string(),
                not_null: false,
                is_generated: false,
            };
            for option in &col.options {
                match &option.option {
                    ColumnOption::NotNull => def.not_null = true,
                    ColumnOption::Unique {
                        is_primary: true, ..
                    } => inline_pk.push(def.name.clone()),
                    ColumnOption::Generated {
                        generation_expr: Some(_),
                        ..
                    } => def.is_generated = true,
                    _ => {}
                }
            }
            def
        })
        .collect();

    let table_pk = create.constraints.iter().find_map(|c| match c {
        TableConstraint::PrimaryKey { columns, .. } => {
            Some(columns.iter().map(|c| c.value.clone()).collect::<Vec<_>>())
        }
        _ => None,
    });

    let primary_key = table_pk.unwrap_or(inline_pk);
    // Primary key columns are implicitly NOT NULL
    for col in &mut columns {
        if primary_key.contains(&col.name) {
            col.not_null = true;
        }
    }

    TableDef {
        name: object_name(&create.name),
        columns,
        primary_key,
    }
}

fn index_def(create: &CreateIndex) -> Option<IndexDef> {
    let name = create.name.as_ref()?;
    Some(IndexDef {
        name: object_name(name),
        table: object_name(&create.table_name),
        unique: create.unique,
        keys: create.columns.iter().map(|c| column_name(&c.expr)).collect(),
        storing: create.include.iter().map(|c| c.value.clone()).collect(),
    })
}

/// The unqualified, unquoted name of a table, view or index.
pub fn object_name(name: &ObjectName) -> String {
    name.0
        .last()
        .map(|ident| ident.value.clone())
        .unwrap_or_else(|| name.to_string())
}

fn column_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(idents) => idents
            .last()
            .map(|ident| ident.value.clone())
            .unwrap_or_else(|| expr.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn parse_one(sql: &str) -> DdlStatement {
        let mut parsed = parse_ddl(sql, "generic").unwrap();
        assert_eq!(parsed.len(), 1);
        parsed.remove(0).kind
    }

    #[test]
    fn test_create_table_columns() {
        let stmt = parse_one(indoc! {"
            CREATE TABLE Singers (
                SingerId BIGINT NOT NULL,
                FirstName VARCHAR(1024),
                FullName VARCHAR(2048) GENERATED ALWAYS AS (FirstName) STORED,
                PRIMARY KEY (SingerId)
            )
        "});
        let DdlStatement::CreateTable(table) = stmt else {
            panic!("expected a table, got {stmt:?}");
        };
        assert_eq!(table.name, "Singers");
        assert_eq!(table.primary_key, vec!["SingerId"]);
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].data_type, "BIGINT");
        assert!(table.columns[0].not_null);
        assert_eq!(table.columns[1].data_type, "VARCHAR(1024)");
        assert!(!table.columns[1].not_null);
        assert!(!table.columns[1].is_generated);
        assert!(table.columns[2].is_generated);
    }

    #[test]
    fn test_inline_primary_key() {
        let stmt = parse_one("CREATE TABLE t (id BIGINT PRIMARY KEY, name TEXT)");
        let DdlStatement::CreateTable(table) = stmt else {
            panic!("expected a table, got {stmt:?}");
        };
        assert_eq!(table.primary_key, vec!["id"]);
    }

    #[test]
    fn test_primary_key_columns_are_not_null() {
        let stmt = parse_one("CREATE TABLE t (id BIGINT PRIMARY KEY, n TEXT)");
        let DdlStatement::CreateTable(table) = stmt else {
            panic!("expected a table, got {stmt:?}");
        };
        assert!(table.columns[0].not_null);
        assert!(!table.columns[1].not_null);

        let stmt = parse_one("CREATE TABLE t (a BIGINT, b TEXT, PRIMARY KEY (b))");
        let DdlStatement::CreateTable(table) = stmt else {
            panic!("expected a table, got {stmt:?}");
        };
        assert!(!table.columns[0].not_null);
        assert!(table.columns[1].not_null);
    }

    #[test]
    fn test_table_constraint_wins_over_inline_primary_key() {
        let stmt = parse_one("CREATE TABLE t (a BIGINT PRIMARY KEY, b BIGINT, PRIMARY KEY (b, a))");
        let DdlStatement::CreateTable(table) = stmt else {
            panic!("expected a table, got {stmt:?}");
        };
        assert_eq!(table.primary_key, vec!["b", "a"]);
    }

    #[test]
    fn test_create_index_with_storing_columns() {
        let stmt =
            parse_one("CREATE UNIQUE INDEX AlbumsByTitle ON Albums (Title, SingerId) INCLUDE (Year)");
        assert_eq!(
            stmt,
            DdlStatement::CreateIndex(IndexDef {
                name: "AlbumsByTitle".to_string(),
                table: "Albums".to_string(),
                unique: true,
                keys: vec!["Title".to_string(), "SingerId".to_string()],
                storing: vec!["Year".to_string()],
            })
        );
    }

    #[test]
    fn test_descending_index_key_keeps_column_name() {
        let stmt = parse_one("CREATE INDEX ByDate ON Events (CreatedAt DESC)");
        let DdlStatement::CreateIndex(index) = stmt else {
            panic!("expected an index, got {stmt:?}");
        };
        assert_eq!(index.keys, vec!["CreatedAt"]);
        assert!(!index.unique);
    }

    #[test]
    fn test_unnamed_index_is_unsupported() {
        let err = parse_ddl("CREATE INDEX ON t (a)", "postgresql").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedStatement(_)));
    }

    #[test]
    fn test_create_view_keeps_rendered_sql() {
        let stmt = parse_one("CREATE VIEW SingerNames AS SELECT SingerId, FirstName FROM Singers");
        let DdlStatement::CreateView(view) = stmt else {
            panic!("expected a view, got {stmt:?}");
        };
        assert_eq!(view.name, "SingerNames");
        assert!(view.sql.starts_with("CREATE VIEW SingerNames AS SELECT"));
    }

    #[test]
    fn test_alter_table_kinds() {
        let stmt = parse_one("ALTER TABLE Albums ADD CONSTRAINT FK_Singer FOREIGN KEY (SingerId) REFERENCES Singers (SingerId)");
        assert_eq!(
            stmt,
            DdlStatement::AlterTable(AlterTable {
                table: "Albums".to_string(),
                adds_constraint_only: true,
            })
        );

        let stmt = parse_one("ALTER TABLE Albums ADD COLUMN Rating BIGINT");
        assert_eq!(
            stmt,
            DdlStatement::AlterTable(AlterTable {
                table: "Albums".to_string(),
                adds_constraint_only: false,
            })
        );
    }

    #[test]
    fn test_non_ddl_statement_is_rejected() {
        let err = parse_ddl("INSERT INTO t VALUES (1)", "generic").unwrap_err();
        match err {
            CatalogError::UnsupportedStatement(sql) => assert!(sql.starts_with("INSERT INTO t")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_dialect() {
        let err = parse_ddl("CREATE TABLE t (a INT)", "nosuchdb").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedDialect(ref d) if d == "nosuchdb"));
    }

    #[test]
    fn test_parse_error_propagates() {
        let err = parse_ddl("CREATE TABLE (", "generic").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
