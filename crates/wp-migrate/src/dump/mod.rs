//! SQL dump encoder.
//!
//! Serializes a database's schema and rows into a portable, replayable SQL
//! script: per table a `DROP TABLE IF EXISTS`, the engine-reported creation
//! statement, then INSERT statements batched at a fixed row threshold to
//! bound statement size.

mod escape;

pub use escape::{escape_bytes, escape_str};

/// Rows per INSERT statement.
pub const INSERT_BATCH_ROWS: usize = 400;

/// Semantic column classification for dump rendering.
///
/// Only the two integer-family type codes the restore side expects are
/// treated as numeric; floats, decimals and date/time columns are dumped as
/// quoted text. Intentional scope narrowing, kept for output compatibility
/// with the restore trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Emitted unquoted.
    Numeric,
    /// Emitted quoted and escaped.
    Text,
}

impl FieldKind {
    /// Classify a column by the engine-reported type name.
    ///
    /// The numeric set is exactly the wire types LONG and LONGLONG; signed
    /// and unsigned variants share a type code.
    pub fn classify(type_name: &str) -> Self {
        match type_name {
            "INT" | "INT UNSIGNED" | "BIGINT" | "BIGINT UNSIGNED" => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }
}

/// Column descriptor: name plus dump classification.
#[derive(Debug, Clone)]
pub struct ColumnDesc {
    pub name: String,
    pub kind: FieldKind,
}

/// A single cell value as read from the source database.
#[derive(Debug, Clone, PartialEq)]
pub enum DumpValue {
    Null,
    Int(i64),
    UInt(u64),
    Text(String),
    Bytes(Vec<u8>),
}

impl DumpValue {
    /// Render the value as a SQL literal. The column's classification
    /// decides quoting: numeric columns emit the bare literal, everything
    /// else is quoted and escaped.
    fn render(&self, kind: FieldKind) -> String {
        let body = match self {
            DumpValue::Null => return "NULL".to_string(),
            DumpValue::Int(v) => v.to_string(),
            DumpValue::UInt(v) => v.to_string(),
            DumpValue::Text(v) => escape_str(v),
            DumpValue::Bytes(v) => escape_bytes(v),
        };
        match kind {
            FieldKind::Numeric => body,
            FieldKind::Text => format!("'{}'", body),
        }
    }
}

/// One table's worth of dump input: name, creation statement, column
/// descriptors and the full ordered row set.
#[derive(Debug, Clone)]
pub struct TableDump {
    pub name: String,
    pub create_sql: String,
    pub columns: Vec<ColumnDesc>,
    pub rows: Vec<Vec<DumpValue>>,
}

impl TableDump {
    /// Render this table's block: drop, create, batched inserts.
    pub fn render(&self, out: &mut String) {
        out.push_str(&format!("DROP TABLE IF EXISTS `{}`;\n", self.name));
        out.push_str(&self.create_sql);
        out.push_str(";\n\n");

        // Tables with no rows get creation statements only.
        if self.rows.is_empty() {
            return;
        }

        let header = self.insert_header();
        let count = self.rows.len();

        for (i, row) in self.rows.iter().enumerate() {
            if i % INSERT_BATCH_ROWS == 0 {
                out.push_str(&header);
                out.push('\n');
            }

            let tuple: Vec<String> = row
                .iter()
                .zip(self.columns.iter())
                .map(|(value, col)| value.render(col.kind))
                .collect();
            out.push('(');
            out.push_str(&tuple.join(", "));

            let closes_batch = (i + 1) % INSERT_BATCH_ROWS == 0 || i + 1 == count;
            if closes_batch {
                out.push_str(");\n\n");
            } else {
                out.push_str("),\n");
            }
        }
    }

    fn insert_header(&self) -> String {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("`{}`", c.name))
            .collect();
        format!("INSERT INTO `{}` ({}) VALUES", self.name, cols.join(", "))
    }
}

/// Concatenate per-table blocks in enumeration order into the final script.
pub fn render_dump(tables: &[TableDump]) -> String {
    let mut out = String::new();
    for table in tables {
        table.render(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_col(name: &str) -> ColumnDesc {
        ColumnDesc {
            name: name.to_string(),
            kind: FieldKind::Text,
        }
    }

    fn numeric_col(name: &str) -> ColumnDesc {
        ColumnDesc {
            name: name.to_string(),
            kind: FieldKind::Numeric,
        }
    }

    fn posts_table(rows: Vec<Vec<DumpValue>>) -> TableDump {
        TableDump {
            name: "posts".to_string(),
            create_sql: "CREATE TABLE `posts` (\n  `id` int NOT NULL,\n  `body` text\n)"
                .to_string(),
            columns: vec![numeric_col("id"), text_col("body")],
            rows,
        }
    }

    fn insert_headers(dump: &str) -> usize {
        dump.matches("INSERT INTO").count()
    }

    #[test]
    fn test_empty_table_has_no_insert() {
        let dump = render_dump(&[posts_table(vec![])]);
        assert!(dump.contains("DROP TABLE IF EXISTS `posts`;"));
        assert!(dump.contains("CREATE TABLE `posts`"));
        assert_eq!(insert_headers(&dump), 0);
    }

    #[test]
    fn test_insert_header_count_is_ceil_of_batches() {
        for (rows, expected) in [(1, 1), (399, 1), (400, 1), (401, 2), (800, 2), (801, 3)] {
            let rows: Vec<Vec<DumpValue>> = (0..rows)
                .map(|i| vec![DumpValue::Int(i as i64), DumpValue::Text("x".into())])
                .collect();
            let dump = render_dump(&[posts_table(rows)]);
            assert_eq!(insert_headers(&dump), expected);
        }
    }

    #[test]
    fn test_every_batch_is_a_terminated_statement() {
        let rows: Vec<Vec<DumpValue>> = (0..401)
            .map(|i| vec![DumpValue::Int(i), DumpValue::Text("x".into())])
            .collect();
        let dump = render_dump(&[posts_table(rows)]);
        // Both the full batch and the single-row tail end with `);` + blank line.
        assert_eq!(dump.matches(");\n\n").count(), 2);
        // Row 400 closes the first batch, so no dangling comma precedes the
        // second header.
        assert!(!dump.contains("),\n\nINSERT"));
        assert!(!dump.contains("),\nINSERT"));
    }

    #[test]
    fn test_three_rows_with_quote_and_newline() {
        let rows = vec![
            vec![DumpValue::Int(1), DumpValue::Text("plain".into())],
            vec![DumpValue::Int(2), DumpValue::Text("it's\nhere".into())],
            vec![DumpValue::Int(3), DumpValue::Null],
        ];
        let dump = render_dump(&[posts_table(rows)]);

        assert_eq!(insert_headers(&dump), 1);
        assert_eq!(dump.matches("),\n").count(), 2);
        assert!(dump.contains("(2, 'it\\'s\\nhere'),"));
        assert!(dump.contains("(3, NULL);"));
        // No raw newline byte inside any tuple.
        for line in dump.lines() {
            if line.starts_with('(') {
                assert!(!line.contains('\r'));
            }
        }
    }

    #[test]
    fn test_numeric_values_are_unquoted() {
        let rows = vec![vec![DumpValue::Int(42), DumpValue::Text("7".into())]];
        let dump = render_dump(&[posts_table(rows)]);
        assert!(dump.contains("(42, '7');"));
    }

    #[test]
    fn test_integers_in_textual_columns_render_quoted() {
        // A tinyint decodes as an integer but its column stays textual.
        let rows = vec![vec![DumpValue::Int(1), DumpValue::Int(5)]];
        let dump = render_dump(&[posts_table(rows)]);
        assert!(dump.contains("(1, '5');"));
    }

    #[test]
    fn test_tables_render_in_enumeration_order() {
        let a = TableDump {
            name: "a".into(),
            create_sql: "CREATE TABLE `a` (`n` int)".into(),
            columns: vec![numeric_col("n")],
            rows: vec![],
        };
        let b = TableDump {
            name: "b".into(),
            create_sql: "CREATE TABLE `b` (`n` int)".into(),
            columns: vec![numeric_col("n")],
            rows: vec![],
        };
        let dump = render_dump(&[a, b]);
        let pos_a = dump.find("CREATE TABLE `a`").unwrap();
        let pos_b = dump.find("CREATE TABLE `b`").unwrap();
        assert!(pos_a < pos_b);
    }

    #[test]
    fn test_classify_is_limited_to_two_type_codes() {
        assert_eq!(FieldKind::classify("INT"), FieldKind::Numeric);
        assert_eq!(FieldKind::classify("BIGINT"), FieldKind::Numeric);
        assert_eq!(FieldKind::classify("INT UNSIGNED"), FieldKind::Numeric);
        assert_eq!(FieldKind::classify("BIGINT UNSIGNED"), FieldKind::Numeric);
        // Floats, dates and the smaller integer families stay textual.
        for name in ["TINYINT", "SMALLINT", "MEDIUMINT", "FLOAT", "DOUBLE", "DECIMAL", "DATETIME", "VARCHAR"] {
            assert_eq!(FieldKind::classify(name), FieldKind::Text, "{}", name);
        }
    }
}
