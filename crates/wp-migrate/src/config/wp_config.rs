//! Database credential extraction from `wp-config.php`.
//!
//! WordPress keeps its database settings as `define('KEY', 'value')` pairs.
//! The extractor pattern-matches those quoted pairs as plain text rather
//! than parsing PHP.

use crate::error::{MigrateError, Result};
use regex::Regex;
use std::collections::HashMap;

/// Connection parameters for the source database.
#[derive(Debug, Clone)]
pub struct DbCredentials {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub charset: String,
}

/// Matches `'KEY', 'value'` with a single space (or pipe) after the comma.
const PAIR_PATTERN: &str = r"'(.*?)',[| ]'(.*?)'";

/// Extract database credentials from the text of a `wp-config.php` file.
///
/// `DB_HOST`, `DB_USER`, `DB_PASSWORD` and `DB_NAME` are required.
/// `DB_CHARSET` falls back to `utf8` when absent.
pub fn extract_credentials(contents: &str) -> Result<DbCredentials> {
    let pattern = Regex::new(PAIR_PATTERN).expect("pair pattern is valid");

    let mut pairs: HashMap<&str, &str> = HashMap::new();
    for caps in pattern.captures_iter(contents) {
        let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let value = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        // First definition wins, like PHP's define().
        pairs.entry(key).or_insert(value);
    }

    let required = |key: &str| -> Result<String> {
        pairs.get(key).map(|v| v.to_string()).ok_or_else(|| {
            MigrateError::Config(format!("wp-config.php does not define {}", key))
        })
    };

    Ok(DbCredentials {
        host: required("DB_HOST")?,
        user: required("DB_USER")?,
        password: required("DB_PASSWORD")?,
        name: required("DB_NAME")?,
        charset: pairs
            .get("DB_CHARSET")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "utf8".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?php
define( 'DB_NAME', 'wordpress' );
define( 'DB_USER', 'wp_user' );
define( 'DB_PASSWORD', 'hunter2' );
define( 'DB_HOST', 'db.internal' );
define( 'DB_CHARSET', 'utf8mb4' );
define( 'DB_COLLATE', '' );
$table_prefix = 'wp_';
"#;

    #[test]
    fn test_extracts_all_credentials() {
        let creds = extract_credentials(SAMPLE).unwrap();
        assert_eq!(creds.host, "db.internal");
        assert_eq!(creds.user, "wp_user");
        assert_eq!(creds.password, "hunter2");
        assert_eq!(creds.name, "wordpress");
        assert_eq!(creds.charset, "utf8mb4");
    }

    #[test]
    fn test_charset_falls_back_to_utf8() {
        let contents = SAMPLE.replace("define( 'DB_CHARSET', 'utf8mb4' );\n", "");
        let creds = extract_credentials(&contents).unwrap();
        assert_eq!(creds.charset, "utf8");
    }

    #[test]
    fn test_empty_password_is_allowed() {
        let contents = SAMPLE.replace("'hunter2'", "''");
        let creds = extract_credentials(&contents).unwrap();
        assert_eq!(creds.password, "");
    }

    #[test]
    fn test_missing_name_is_a_config_error() {
        let contents = SAMPLE.replace("define( 'DB_NAME', 'wordpress' );\n", "");
        let err = extract_credentials(&contents).unwrap_err();
        assert!(err.to_string().contains("DB_NAME"));
    }

    #[test]
    fn test_tight_define_spacing() {
        let contents = "define('DB_NAME', 'site');define('DB_USER', 'u');\
define('DB_PASSWORD', 'p');define('DB_HOST', 'localhost');";
        let creds = extract_credentials(contents).unwrap();
        assert_eq!(creds.name, "site");
        assert_eq!(creds.host, "localhost");
    }
}
