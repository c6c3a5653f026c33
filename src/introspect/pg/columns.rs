use std::collections::HashSet;

use sqlx::PgPool;

use crate::error::CatalogError;
use crate::schema::Column;

/// Query the columns of a table, returning them together with the
/// manual primary key flag.
pub async fn query_columns(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
    primary_key: &[String],
) -> Result<(Vec<Column>, bool), CatalogError> {
    let rows = sqlx::query_as::<_, ColumnRow>(
        r#"
        SELECT c.column_name, c.is_nullable = 'NO' AS not_null, c.data_type,
               c.column_default,
               c.is_identity = 'YES' AS is_identity,
               c.is_generated = 'ALWAYS' AS is_generated
        FROM information_schema.columns c
        WHERE c.table_schema = $1 AND c.table_name = $2
        ORDER BY c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    Ok(build_columns(rows, primary_key))
}

fn build_columns(rows: Vec<ColumnRow>, primary_key: &[String]) -> (Vec<Column>, bool) {
    let pk: HashSet<&str> = primary_key.iter().map(String::as_str).collect();
    let mut manual_pk = true;

    let columns = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let is_primary_key = pk.contains(row.column_name.as_str());
            if is_primary_key && (row.is_identity || is_serial_default(row.column_default.as_deref()))
            {
                manual_pk = false;
            }
            Column {
                ordinal: i + 1,
                name: row.column_name,
                data_type: row.data_type,
                not_null: row.not_null,
                is_primary_key,
                is_generated: row.is_generated,
            }
        })
        .collect();

    (columns, manual_pk)
}

/// Serial columns draw their default from a sequence.
fn is_serial_default(default: Option<&str>) -> bool {
    default.is_some_and(|d| d.starts_with("nextval("))
}

#[derive(sqlx::FromRow)]
struct ColumnRow {
    column_name: String,
    not_null: bool,
    data_type: String,
    column_default: Option<String>,
    is_identity: bool,
    is_generated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> ColumnRow {
        ColumnRow {
            column_name: name.to_string(),
            not_null: true,
            data_type: "bigint".to_string(),
            column_default: None,
            is_identity: false,
            is_generated: false,
        }
    }

    #[test]
    fn test_build_columns_ordinals_and_pk() {
        let rows = vec![
            row("id"),
            ColumnRow {
                not_null: false,
                data_type: "text".to_string(),
                ..row("name")
            },
            ColumnRow {
                is_generated: true,
                ..row("name_len")
            },
        ];
        let (cols, manual_pk) = build_columns(rows, &["id".to_string()]);
        assert!(manual_pk);
        assert_eq!(
            cols.iter().map(|c| c.ordinal).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(cols[0].is_primary_key);
        assert!(!cols[1].is_primary_key);
        assert!(!cols[1].not_null);
        assert!(cols[2].is_generated);
    }

    #[test]
    fn test_serial_primary_key_is_not_manual() {
        let rows = vec![ColumnRow {
            column_default: Some("nextval('users_id_seq'::regclass)".to_string()),
            ..row("id")
        }];
        let (_, manual_pk) = build_columns(rows, &["id".to_string()]);
        assert!(!manual_pk);
    }

    #[test]
    fn test_identity_primary_key_is_not_manual() {
        let rows = vec![ColumnRow {
            is_identity: true,
            ..row("id")
        }];
        let (_, manual_pk) = build_columns(rows, &["id".to_string()]);
        assert!(!manual_pk);
    }

    #[test]
    fn test_serial_non_key_column_keeps_manual_pk() {
        let rows = vec![
            row("id"),
            ColumnRow {
                column_default: Some("nextval('seq')".to_string()),
                ..row("counter")
            },
        ];
        let (_, manual_pk) = build_columns(rows, &["id".to_string()]);
        assert!(manual_pk);
    }
}
