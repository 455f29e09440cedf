//! Interactive fallback prompting for the migration configuration keys.
//!
//! Every descriptor key is confirmed on the console with its current value
//! as the default; pressing enter keeps it. The password prompt is masked
//! and keeps the current value when left empty.

use dialoguer::{Input, Password};
use std::path::PathBuf;
use wp_migrate::ConfigDraft;

/// Prompt for each configurable key, updating the draft in place.
pub fn fill_draft(draft: &mut ConfigDraft) -> Result<(), dialoguer::Error> {
    let source_dir: String = Input::new()
        .with_prompt("Source Wordpress installation directory")
        .default(draft.source_dir.display().to_string())
        .interact_text()?;
    draft.source_dir = PathBuf::from(source_dir);

    draft.target_url = Input::new()
        .with_prompt("Remote Wordpress site URL")
        .default(draft.target_url.clone())
        .interact_text()?;

    draft.ftp_host = Input::new()
        .with_prompt("Remote FTP host")
        .default(draft.ftp_host.clone())
        .interact_text()?;

    draft.ftp_user = Input::new()
        .with_prompt("Remote FTP user")
        .default(draft.ftp_user.clone())
        .interact_text()?;

    let password = Password::new()
        .with_prompt("Remote FTP password")
        .allow_empty_password(true)
        .interact()?;
    if !password.is_empty() {
        draft.ftp_password = password;
    }

    draft.ftp_dir = Input::new()
        .with_prompt("Remote FTP directory")
        .default(draft.ftp_dir.clone())
        .interact_text()?;

    Ok(())
}
