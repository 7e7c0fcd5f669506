//! INSERT statement construction.
//!
//! Identifiers are backtick-quoted; values are always bound as positional
//! parameters and never appear in the SQL text.

use import_core::Record;
use mysql_async::{Params, Value};

/// Quote a single MySQL identifier, doubling any embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a possibly schema-qualified table name (`db.table`).
pub fn quote_table(table: &str) -> String {
    table
        .split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Build `INSERT INTO `table` (`c1`, `c2`) VALUES (?, ?)` for a record's columns.
pub fn insert_statement(table: &str, record: &Record) -> String {
    let columns: Vec<String> = record.columns().map(quote_identifier).collect();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_table(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Bound parameters matching [`insert_statement`], in column order.
pub fn insert_params(record: &Record) -> Params {
    if record.is_empty() {
        return Params::Empty;
    }
    let values: Vec<Value> = record
        .values()
        .map(|v| Value::Bytes(v.as_bytes().to_vec()))
        .collect();
    Params::Positional(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_statement() {
        let record = Record::new(2)
            .with("campaign_id", "17")
            .with("channel", "email")
            .with("spend", "120.50");

        let sql = insert_statement("marketing", &record);
        assert_eq!(
            sql,
            "INSERT INTO `marketing` (`campaign_id`, `channel`, `spend`) VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn test_values_are_not_in_sql() {
        let record = Record::new(2).with("name", "'); DROP TABLE marketing; --");

        let sql = insert_statement("marketing", &record);
        assert!(!sql.contains("DROP"));

        match insert_params(&record) {
            Params::Positional(values) => {
                assert_eq!(
                    values,
                    vec![Value::Bytes(b"'); DROP TABLE marketing; --".to_vec())]
                );
            }
            other => panic!("unexpected params: {other:?}"),
        }
    }

    #[test]
    fn test_quote_identifier_escapes_backticks() {
        assert_eq!(quote_identifier("plain"), "`plain`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(quote_identifier("with space"), "`with space`");
    }

    #[test]
    fn test_quote_table_with_schema() {
        assert_eq!(quote_table("marketing"), "`marketing`");
        assert_eq!(quote_table("marketing_data.marketing"), "`marketing_data`.`marketing`");
    }

    #[test]
    fn test_params_follow_column_order() {
        let record = Record::new(2).with("b", "2").with("a", "1");

        let sql = insert_statement("t", &record);
        assert_eq!(sql, "INSERT INTO `t` (`b`, `a`) VALUES (?, ?)");

        match insert_params(&record) {
            Params::Positional(values) => {
                assert_eq!(values, vec![Value::from("2"), Value::from("1")]);
            }
            other => panic!("unexpected params: {other:?}"),
        }
    }

    #[test]
    fn test_empty_record() {
        let record = Record::new(2);
        assert_eq!(insert_statement("t", &record), "INSERT INTO `t` () VALUES ()");
        assert!(matches!(insert_params(&record), Params::Empty));
    }

    #[test]
    fn test_empty_value_is_bound_as_empty_string() {
        let record = Record::new(2).with("note", "");
        match insert_params(&record) {
            Params::Positional(values) => assert_eq!(values, vec![Value::Bytes(Vec::new())]),
            other => panic!("unexpected params: {other:?}"),
        }
    }
}
