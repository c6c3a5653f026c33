use crate::error::CatalogError;

/// Pseudo index name that selects a table's primary key in
/// [`SchemaSource::index_column_list`].
pub const PRIMARY_KEY: &str = "PRIMARY_KEY";

/// A table as listed by a schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    /// Primary key values are supplied by the caller rather than generated by the store.
    pub manual_pk: bool,
}

/// Metadata for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// 1-based position in declaration order.
    pub ordinal: usize,
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub is_primary_key: bool,
    pub is_generated: bool,
}

/// Metadata for a secondary index. Columns are fetched separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub is_unique: bool,
}

/// One column of an index or of the primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    /// 1-based for key columns, 0 for storing columns.
    pub seq_no: usize,
    pub column_name: String,
    pub storing: bool,
}

impl IndexColumn {
    pub fn key(seq_no: usize, column_name: &str) -> Self {
        Self {
            seq_no,
            column_name: column_name.to_string(),
            storing: false,
        }
    }

    pub fn storing(column_name: &str) -> Self {
        Self {
            seq_no: 0,
            column_name: column_name.to_string(),
            storing: true,
        }
    }
}

/// Read-only accessor contract shared by every catalog backend.
///
/// Lookups for names the source does not know return empty lists. Errors are
/// reserved for a malformed schema.
pub trait SchemaSource {
    /// Tables in a stable order. Views are not included.
    fn table_list(&self) -> Result<Vec<Table>, CatalogError>;

    /// View names in a stable order.
    fn view_list(&self) -> Result<Vec<String>, CatalogError>;

    fn column_list(&self, table: &str) -> Result<Vec<Column>, CatalogError>;

    fn index_list(&self, table: &str) -> Result<Vec<Index>, CatalogError>;

    /// Columns of `index` on `table`. Passing [`PRIMARY_KEY`] returns the
    /// primary key columns instead.
    fn index_column_list(&self, table: &str, index: &str)
        -> Result<Vec<IndexColumn>, CatalogError>;
}

/// Lay out index columns the way every backend reports them: storing
/// columns first with sequence 0, then key columns numbered from 1.
pub fn index_columns<K, S>(keys: K, storing: S) -> Vec<IndexColumn>
where
    K: IntoIterator,
    K::Item: AsRef<str>,
    S: IntoIterator,
    S::Item: AsRef<str>,
{
    let mut cols: Vec<IndexColumn> = storing
        .into_iter()
        .map(|c| IndexColumn::storing(c.as_ref()))
        .collect();
    cols.extend(primary_key_columns(keys));
    cols
}

/// Number primary key columns from 1 in declared order.
pub fn primary_key_columns<K>(keys: K) -> Vec<IndexColumn>
where
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    keys.into_iter()
        .enumerate()
        .map(|(i, c)| IndexColumn::key(i + 1, c.as_ref()))
        .collect()
}
