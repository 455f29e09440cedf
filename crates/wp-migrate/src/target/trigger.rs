//! Remote restore trigger: the uploaded companion script and the HTTP
//! request that runs it.

use async_trait::async_trait;

use super::{STAGING_DIR, TRIGGER_FILE};
use crate::error::Result;

/// The companion script deployed next to the dump. It reads the adjacent
/// `db.sql`, applies it against the target's own database using the
/// credentials from the target's `wp-config.php`, and prints `1` on
/// success or the engine's last error message on failure.
pub const RESTORE_TRIGGER_PHP: &str = r#"<?php
error_reporting(E_ALL);

try {
    require_once __DIR__ . "/../wp-config.php";

    $sql = file_get_contents(__DIR__ . "/db.sql");
    $db = new mysqli(DB_HOST, DB_USER, DB_PASSWORD, DB_NAME);

    if ($db->connect_errno > 0) {
        echo $db->connect_error;
    } elseif ($db->multi_query($sql)) {
        echo "1";
    } else {
        echo $db->error;
    }
} catch (Throwable $e) {
    echo $e->getMessage();
}
"#;

/// Invokes the uploaded restore trigger and reports its response body.
///
/// The body is the whole contract: `"1"` means success, anything else is
/// the failure diagnostic. An HTTP-layer error is reported as that error's
/// text, exactly as a failure body would be.
#[async_trait]
pub trait RestoreTrigger {
    async fn execute(&self) -> String;
}

/// HTTP GET against the trigger's public URL.
pub struct HttpTrigger {
    client: reqwest::Client,
    url: String,
}

impl HttpTrigger {
    /// Build a trigger client for a target site base URL (no trailing
    /// slash).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url: format!("{}/{}/{}", base_url, STAGING_DIR, TRIGGER_FILE),
        })
    }

    async fn request(&self) -> std::result::Result<String, reqwest::Error> {
        let response = self.client.get(&self.url).send().await?;
        let body = response.text().await?;
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl RestoreTrigger for HttpTrigger {
    async fn execute(&self) -> String {
        match self.request().await {
            Ok(body) => body,
            Err(e) => e.to_string(),
        }
    }
}
