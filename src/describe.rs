use crate::error::CatalogError;
use crate::schema::{IndexColumn, SchemaSource, Table, PRIMARY_KEY};

/// What to include in the rendered description.
#[derive(Debug, Default)]
pub struct DescribeOptions {
    pub noindexes: bool,
    pub nocolumns: bool,
    pub noviews: bool,
    /// Only describe these tables and views. Empty means everything.
    pub tables: Vec<String>,
}

impl DescribeOptions {
    fn wants(&self, name: &str) -> bool {
        self.tables.is_empty() || self.tables.iter().any(|t| t == name)
    }
}

/// Render a schema source as stable plain text, tables first, then views.
///
/// Only accessor calls are used, so a DDL catalog and a live snapshot of
/// the same schema render identically.
pub fn describe(
    source: &dyn SchemaSource,
    options: &DescribeOptions,
) -> Result<String, CatalogError> {
    let mut blocks: Vec<String> = Vec::new();

    for table in source.table_list()? {
        if options.wants(&table.name) {
            blocks.push(describe_table(source, &table, options)?);
        }
    }

    if !options.noviews {
        for view in source.view_list()? {
            if !options.wants(&view) {
                continue;
            }
            let mut lines = vec![format!("view {view}")];
            push_primary_key(&mut lines, &source.index_column_list(&view, PRIMARY_KEY)?);
            blocks.push(lines.join("\n"));
        }
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    Ok(output)
}

fn describe_table(
    source: &dyn SchemaSource,
    table: &Table,
    options: &DescribeOptions,
) -> Result<String, CatalogError> {
    let mut lines: Vec<String> = Vec::new();

    if table.manual_pk {
        lines.push(format!("table {}", table.name));
    } else {
        lines.push(format!("table {} (generated primary key)", table.name));
    }

    if !options.nocolumns {
        for col in source.column_list(&table.name)? {
            let mut line = format!("  column {} {} {}", col.ordinal, col.name, col.data_type);
            if col.not_null {
                line.push_str(" NOT NULL");
            }
            if col.is_primary_key {
                line.push_str(" PRIMARY KEY");
            }
            if col.is_generated {
                line.push_str(" GENERATED");
            }
            lines.push(line);
        }
    }

    push_primary_key(
        &mut lines,
        &source.index_column_list(&table.name, PRIMARY_KEY)?,
    );

    if !options.noindexes {
        for index in source.index_list(&table.name)? {
            let cols = source.index_column_list(&table.name, &index.name)?;
            let unique = if index.is_unique { "unique " } else { "" };
            let mut line = format!(
                "  {unique}index {} ({})",
                index.name,
                column_names(cols.iter().filter(|c| !c.storing))
            );
            if cols.iter().any(|c| c.storing) {
                line.push_str(&format!(
                    " storing ({})",
                    column_names(cols.iter().filter(|c| c.storing))
                ));
            }
            lines.push(line);
        }
    }

    Ok(lines.join("\n"))
}

fn push_primary_key(lines: &mut Vec<String>, pk: &[IndexColumn]) {
    if !pk.is_empty() {
        lines.push(format!("  primary key ({})", column_names(pk.iter())));
    }
}

fn column_names<'a>(cols: impl Iterator<Item = &'a IndexColumn>) -> String {
    cols.map(|c| c.column_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
