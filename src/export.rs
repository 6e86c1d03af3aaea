//! Export orchestration: accounts -> runbooks -> content -> files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::azure::{MgmtClient, TokenCache};
use crate::error::Error;
use crate::models::{ExtensionMap, Runbook};
use crate::output::StatusSink;

/// Export every readable runbook in one subscription to `download_dir`.
///
/// Listing failures and unfetchable runbooks are reported and skipped
/// inside; an error returned here (directory creation, file write) aborts
/// only this subscription's pass — the caller decides whether to continue
/// with the next one.
pub async fn export_runbooks(
    client: &MgmtClient,
    subscription_id: &str,
    download_dir: &Path,
    extensions: &ExtensionMap,
    tokens: &mut TokenCache,
    status: &StatusSink,
) -> Result<(), Error> {
    let accounts = client.list_automation_accounts(subscription_id, status).await;

    let mut runbooks = Vec::new();
    for account in &accounts {
        runbooks.extend(
            client
                .list_runbooks(subscription_id, &account.resource_group, &account.name, status)
                .await,
        );
    }

    fs::create_dir_all(download_dir)?;

    for runbook in &runbooks {
        let content = match client
            .fetch_content(subscription_id, runbook, tokens, status)
            .await
        {
            Some(content) => content,
            None => continue,
        };

        let path = write_runbook(download_dir, subscription_id, runbook, &content, extensions)?;
        status.success(&format!("Exported '{}' to {}", runbook.name, path.display()));
    }

    Ok(())
}

/// Persist one runbook body as `<dir>/<subscription>_<name>.<ext>`.
///
/// Same-named runbooks from different accounts of one subscription land on
/// the same path and overwrite each other.
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err` - If the write fails
pub fn write_runbook(
    download_dir: &Path,
    subscription_id: &str,
    runbook: &Runbook,
    content: &str,
    extensions: &ExtensionMap,
) -> Result<PathBuf, Error> {
    let file_name = format!(
        "{subscription_id}_{name}.{ext}",
        name = runbook.name,
        ext = extensions.extension(&runbook.runbook_type)
    );
    let path = download_dir.join(file_name);
    fs::write(&path, content)?;
    log::debug!("wrote {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runbook(name: &str, runbook_type: &str) -> Runbook {
        Runbook {
            account_name: "acct1".to_string(),
            resource_group: "rg1".to_string(),
            runbook_type: runbook_type.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_write_runbook_python3() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extensions = ExtensionMap::default();

        let path = write_runbook(
            dir.path(),
            "sub-1",
            &runbook("rb1", "Python3"),
            "print(1)",
            &extensions,
        )
        .expect("write should succeed");

        assert_eq!(path, dir.path().join("sub-1_rb1.py"));
        let content = fs::read_to_string(&path).expect("file should exist");
        assert_eq!(content, "print(1)");
    }

    #[test]
    fn test_write_runbook_unknown_type_defaults_to_ps1() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extensions = ExtensionMap::default();

        let path = write_runbook(
            dir.path(),
            "sub-1",
            &runbook("cleanup", "Workflow"),
            "Get-Date",
            &extensions,
        )
        .expect("write should succeed");

        assert_eq!(path, dir.path().join("sub-1_cleanup.ps1"));
    }

    #[test]
    fn test_write_runbook_same_name_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extensions = ExtensionMap::default();

        let mut other_account = runbook("rb1", "Powershell");
        other_account.account_name = "acct2".to_string();

        write_runbook(dir.path(), "sub-1", &runbook("rb1", "Powershell"), "first", &extensions)
            .expect("write should succeed");
        let path =
            write_runbook(dir.path(), "sub-1", &other_account, "second", &extensions)
                .expect("write should succeed");

        let content = fs::read_to_string(&path).expect("file should exist");
        assert_eq!(content, "second");
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 1);
    }
}
