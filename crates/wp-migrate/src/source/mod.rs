//! MySQL source database access.
//!
//! Reads the source installation's schema and rows over a single
//! connection: `SHOW TABLES`, `SHOW CREATE TABLE`, then a full-table
//! `SELECT *` per table, with per-column decoding driven by the
//! engine-reported type name.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::config::DbCredentials;
use crate::dump::{ColumnDesc, DumpValue, FieldKind, TableDump};
use crate::error::{MigrateError, Result};

/// MySQL source reader over a single connection (no pooling; the whole
/// export is strictly sequential).
pub struct MysqlSource {
    conn: MySqlConnection,
}

impl MysqlSource {
    /// Connect to the source database and apply its configured charset.
    pub async fn connect(creds: &DbCredentials) -> Result<Self> {
        let (host, port) = split_host_port(&creds.host);

        let mut options = MySqlConnectOptions::new()
            .host(host)
            .username(&creds.user)
            .database(&creds.name);
        if !creds.password.is_empty() {
            options = options.password(&creds.password);
        }
        if let Some(port) = port {
            options = options.port(port);
        }

        let mut conn = options.connect().await.map_err(|e| {
            MigrateError::connection(
                format!("mysql {}@{}", creds.user, creds.host),
                e.to_string(),
            )
        })?;

        conn.execute(format!("SET NAMES {}", creds.charset).as_str())
            .await?;

        info!("Connected to source database {}", creds.name);
        Ok(Self { conn })
    }

    /// Enumerate all tables in the source database, in engine order.
    pub async fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows: Vec<MySqlRow> = sqlx::query("SHOW TABLES")
            .fetch_all(&mut self.conn)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(MigrateError::from))
            .collect()
    }

    /// Fetch the engine-reported creation statement for a table.
    pub async fn show_create(&mut self, table: &str) -> Result<String> {
        let row: MySqlRow = sqlx::query(&format!("SHOW CREATE TABLE {}", quote_ident(table)))
            .fetch_one(&mut self.conn)
            .await?;

        Ok(row.try_get::<String, _>(1)?)
    }

    /// Read one table in full: creation statement, column descriptors and
    /// every row decoded for dump rendering.
    pub async fn dump_table(&mut self, table: &str) -> Result<TableDump> {
        info!("Extracting table {}", table);

        let create_sql = self.show_create(table).await?;

        let rows: Vec<MySqlRow> = sqlx::query(&format!("SELECT * FROM {}", quote_ident(table)))
            .fetch_all(&mut self.conn)
            .await?;

        if rows.is_empty() {
            debug!("{}: no rows to extract", table);
            return Ok(TableDump {
                name: table.to_string(),
                create_sql,
                columns: Vec::new(),
                rows: Vec::new(),
            });
        }

        let first = &rows[0];
        let columns: Vec<ColumnDesc> = first
            .columns()
            .iter()
            .map(|col| ColumnDesc {
                name: col.name().to_string(),
                kind: FieldKind::classify(col.type_info().name()),
            })
            .collect();
        let type_names: Vec<String> = first
            .columns()
            .iter()
            .map(|col| col.type_info().name().to_string())
            .collect();

        debug!("{}: extracting {} rows", table, rows.len());

        let data = rows
            .iter()
            .map(|row| {
                type_names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| decode_value(row, i, name))
                    .collect()
            })
            .collect();

        Ok(TableDump {
            name: table.to_string(),
            create_sql,
            columns,
            rows: data,
        })
    }

    /// Dump every table, in enumeration order.
    pub async fn export(&mut self) -> Result<Vec<TableDump>> {
        let tables = self.list_tables().await?;
        info!("Found {} tables to extract", tables.len());

        let mut dumps = Vec::with_capacity(tables.len());
        for table in &tables {
            dumps.push(self.dump_table(table).await?);
        }
        Ok(dumps)
    }

    /// Close the connection cleanly.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

/// Quote a MySQL identifier.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Split a WordPress-style `host:port` value.
fn split_host_port(host: &str) -> (&str, Option<u16>) {
    match host.rsplit_once(':') {
        Some((h, p)) => match p.parse::<u16>() {
            Ok(port) => (h, Some(port)),
            Err(_) => (host, None),
        },
        None => (host, None),
    }
}

/// Decode one cell into a [`DumpValue`] based on the column's type name.
///
/// Values that fail to decode as their reported type fall back to raw bytes,
/// then to NULL; a dump row never aborts the export once the query itself
/// has succeeded.
fn decode_value(row: &MySqlRow, i: usize, type_name: &str) -> DumpValue {
    let is_null = row.try_get_raw(i).map(|v| v.is_null()).unwrap_or(true);
    if is_null {
        return DumpValue::Null;
    }

    match type_name {
        // The two numeric wire types; everything else is dumped as text.
        "INT" | "BIGINT" => row
            .try_get::<i64, _>(i)
            .map(DumpValue::Int)
            .unwrap_or(DumpValue::Null),
        "INT UNSIGNED" | "BIGINT UNSIGNED" => row
            .try_get::<u64, _>(i)
            .map(DumpValue::UInt)
            .unwrap_or(DumpValue::Null),

        // Smaller integer families decode naturally; their columns are
        // classified textual, so they render quoted.
        "TINYINT" | "SMALLINT" | "MEDIUMINT" => row
            .try_get::<i64, _>(i)
            .map(DumpValue::Int)
            .unwrap_or(DumpValue::Null),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" => row
            .try_get::<u64, _>(i)
            .map(DumpValue::UInt)
            .unwrap_or(DumpValue::Null),
        "BOOLEAN" => row
            .try_get::<bool, _>(i)
            .map(|v| DumpValue::Int(v as i64))
            .unwrap_or(DumpValue::Null),

        "FLOAT" => row
            .try_get::<f32, _>(i)
            .map(|v| DumpValue::Text(v.to_string()))
            .unwrap_or(DumpValue::Null),
        "DOUBLE" => row
            .try_get::<f64, _>(i)
            .map(|v| DumpValue::Text(v.to_string()))
            .unwrap_or(DumpValue::Null),
        "DECIMAL" => row
            .try_get::<rust_decimal::Decimal, _>(i)
            .map(|v| DumpValue::Text(v.to_string()))
            .unwrap_or_else(|_| text_or_bytes(row, i)),

        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(i)
            .map(|v| DumpValue::Text(v.format("%Y-%m-%d").to_string()))
            .unwrap_or(DumpValue::Null),
        "DATETIME" => row
            .try_get::<chrono::NaiveDateTime, _>(i)
            .map(|v| DumpValue::Text(v.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(DumpValue::Null),
        "TIMESTAMP" => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(i)
            .map(|v| DumpValue::Text(v.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(DumpValue::Null),
        "TIME" => row
            .try_get::<chrono::NaiveTime, _>(i)
            .map(|v| DumpValue::Text(v.format("%H:%M:%S").to_string()))
            .unwrap_or_else(|_| text_or_bytes(row, i)),
        "YEAR" => row
            .try_get::<u16, _>(i)
            .map(|v| DumpValue::Text(v.to_string()))
            .unwrap_or_else(|_| text_or_bytes(row, i)),

        "BIT" => row
            .try_get::<u64, _>(i)
            .map(|v| DumpValue::Text(v.to_string()))
            .unwrap_or_else(|_| text_or_bytes(row, i)),

        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Vec<u8>, _>(i)
            .map(DumpValue::Bytes)
            .unwrap_or(DumpValue::Null),

        // CHAR/VARCHAR/TEXT/ENUM/SET/JSON and anything unrecognized.
        _ => text_or_bytes(row, i),
    }
}

fn text_or_bytes(row: &MySqlRow, i: usize) -> DumpValue {
    match row.try_get::<String, _>(i) {
        Ok(s) => DumpValue::Text(s),
        Err(_) => row
            .try_get::<Vec<u8>, _>(i)
            .map(DumpValue::Bytes)
            .unwrap_or(DumpValue::Null),
    }
}
