//! Automation management-plane calls.
//!
//! Listing calls and the primary content fetch authenticate with the
//! interactive CLI credential. Content retrieval keeps a second path: some
//! runbook content endpoints are inconsistently exposed to the session
//! credential, so a typed failure on the primary call triggers a direct
//! GET authorized with the application-credential bearer token instead.

use std::sync::Arc;

use azure_core::auth::TokenCredential;
use azure_identity::AzureCliCredential;
use serde::Deserialize;

use super::credentials::{self, TokenCache, MANAGEMENT_ENDPOINT, MANAGEMENT_SCOPE};
use crate::error::Error;
use crate::models::{AutomationAccount, Runbook};
use crate::output::StatusSink;

const API_VERSION: &str = "2023-11-01";

/// Client for the automation management plane.
pub struct MgmtClient {
    http: reqwest::Client,
    credential: Arc<AzureCliCredential>,
}

/// One page of a management list response.
#[derive(Deserialize)]
struct ListPage<T> {
    value: Vec<T>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

#[derive(Deserialize)]
struct AccountEntry {
    id: String,
}

#[derive(Deserialize)]
struct RunbookEntry {
    name: String,
    #[serde(default)]
    properties: RunbookProperties,
}

#[derive(Deserialize, Default)]
struct RunbookProperties {
    #[serde(rename = "runbookType")]
    runbook_type: Option<String>,
}

impl MgmtClient {
    pub fn new() -> Self {
        MgmtClient {
            http: reqwest::Client::new(),
            credential: credentials::cli_credential(),
        }
    }

    /// Confirm the local CLI session can mint a management token.
    pub async fn ensure_login(&self) -> Result<(), Error> {
        self.credential
            .get_token(&[MANAGEMENT_SCOPE])
            .await
            .map(|_| ())
            .map_err(|e| Error::AuthenticationFailed(e.to_string()))
    }

    /// List all automation accounts visible in `subscription_id`.
    ///
    /// A failed listing call or zero results is reported on `status` and
    /// yields an empty vec; neither aborts the pipeline.
    pub async fn list_automation_accounts(
        &self,
        subscription_id: &str,
        status: &StatusSink,
    ) -> Vec<AutomationAccount> {
        status.info(&format!(
            "Listing automation accounts (ResourceGroup:AutomationAccountName) within subscription '{subscription_id}'"
        ));

        let url = format!(
            "{MANAGEMENT_ENDPOINT}/subscriptions/{subscription_id}/providers/Microsoft.Automation/automationAccounts?api-version={API_VERSION}"
        );
        let entries: Vec<AccountEntry> = match self.get_all_pages(&url).await {
            Ok(entries) => entries,
            Err(err) => {
                status.error(&err.to_string());
                return Vec::new();
            }
        };

        let mut accounts = Vec::new();
        for entry in entries {
            match AutomationAccount::from_resource_id(&entry.id) {
                Ok(account) => {
                    status.success(&format!("{}:{}", account.resource_group, account.name));
                    accounts.push(account);
                }
                Err(err) => status.error(&err.to_string()),
            }
        }

        if accounts.is_empty() {
            status.info("No automation accounts found");
        }

        accounts
    }

    /// List all runbooks registered to one automation account.
    ///
    /// Same failure contract as [`Self::list_automation_accounts`].
    pub async fn list_runbooks(
        &self,
        subscription_id: &str,
        resource_group: &str,
        account_name: &str,
        status: &StatusSink,
    ) -> Vec<Runbook> {
        status.info(&format!(
            "Finding runbooks within automation account '{account_name}'"
        ));

        let url = format!(
            "{MANAGEMENT_ENDPOINT}/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Automation/automationAccounts/{account_name}/runbooks?api-version={API_VERSION}"
        );
        let entries: Vec<RunbookEntry> = match self.get_all_pages(&url).await {
            Ok(entries) => entries,
            Err(err) => {
                status.error(&err.to_string());
                return Vec::new();
            }
        };

        let mut runbooks = Vec::new();
        for entry in entries {
            let runbook_type = entry.properties.runbook_type.unwrap_or_default();
            status.success(&format!("{} - {}", entry.name, runbook_type));
            runbooks.push(Runbook {
                account_name: account_name.to_string(),
                resource_group: resource_group.to_string(),
                runbook_type,
                name: entry.name,
            });
        }

        if runbooks.is_empty() {
            status.info("No runbooks found");
        }

        runbooks
    }

    /// Download one runbook's script body.
    ///
    /// Tries the interactive-credential call first; on a typed failure,
    /// retries with the application-credential token for this subscription.
    /// `None` means both paths failed and the runbook must be skipped.
    pub async fn fetch_content(
        &self,
        subscription_id: &str,
        runbook: &Runbook,
        tokens: &mut TokenCache,
        status: &StatusSink,
    ) -> Option<String> {
        status.info(&format!("Attempting to export '{}'", runbook.name));

        let url = content_url(
            subscription_id,
            &runbook.resource_group,
            &runbook.account_name,
            &runbook.name,
        );

        let primary = match self.get(&url).await {
            Ok(content) => return Some(content),
            Err(err) => err,
        };
        log::warn!(
            "primary content fetch failed for '{}': {primary}",
            runbook.name
        );

        match self.fetch_content_fallback(subscription_id, &url, tokens).await {
            Ok(content) => Some(content),
            Err(fallback) => {
                status.fatal(&format!(
                    "'{}' export failed: {primary}; fallback: {fallback}",
                    runbook.name
                ));
                None
            }
        }
    }

    /// Fallback content retrieval against the versioned REST endpoint,
    /// authorized with a raw bearer token.
    async fn fetch_content_fallback(
        &self,
        subscription_id: &str,
        url: &str,
        tokens: &mut TokenCache,
    ) -> Result<String, Error> {
        let token = tokens.bearer_token(subscription_id).await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;
        let code = response.status();
        let body = response.text().await?;
        if !code.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                code: code.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Authorized GET with the CLI-session token, returning the body.
    async fn get(&self, url: &str) -> Result<String, Error> {
        let token = self
            .credential
            .get_token(&[MANAGEMENT_SCOPE])
            .await
            .map_err(|e| Error::AuthenticationFailed(e.to_string()))?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token.token.secret())
            .send()
            .await?;
        let code = response.status();
        let body = response.text().await?;
        if !code.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                code: code.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Follow `nextLink` pagination until the collection is exhausted.
    async fn get_all_pages<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        let mut page_count = 0;

        while let Some(page_url) = next {
            let body = self.get(&page_url).await?;
            let page: ListPage<T> = parse_json(&body)?;
            items.extend(page.value);
            next = page.next_link;
            page_count += 1;
        }

        log::debug!("fetched {} item(s) over {page_count} page(s)", items.len());
        Ok(items)
    }
}

/// Versioned REST endpoint for one runbook's script body.
fn content_url(
    subscription_id: &str,
    resource_group: &str,
    account_name: &str,
    runbook_name: &str,
) -> String {
    format!(
        "{MANAGEMENT_ENDPOINT}/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Automation/automationAccounts/{account_name}/runbooks/{runbook_name}/content?api-version={API_VERSION}"
    )
}

/// Deserialize a management response, reporting the JSON path on mismatch.
fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, Error> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| Error::Parse {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_url() {
        let url = content_url("sub-1", "rg1", "acct1", "rb1");
        assert_eq!(
            url,
            "https://management.azure.com/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Automation/automationAccounts/acct1/runbooks/rb1/content?api-version=2023-11-01"
        );
    }

    #[test]
    fn test_parse_account_page() {
        let body = r#"{
            "value": [
                {
                    "id": "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Automation/automationAccounts/acct1",
                    "name": "acct1",
                    "type": "Microsoft.Automation/AutomationAccounts",
                    "location": "eastus"
                }
            ]
        }"#;
        let page: ListPage<AccountEntry> = parse_json(body).expect("page should parse");
        assert_eq!(page.value.len(), 1);
        assert!(page.next_link.is_none());
        assert!(page.value[0].id.ends_with("automationAccounts/acct1"));
    }

    #[test]
    fn test_parse_account_page_with_next_link() {
        let body = r#"{
            "value": [],
            "nextLink": "https://management.azure.com/subscriptions/sub-1/providers/Microsoft.Automation/automationAccounts?api-version=2023-11-01&$skiptoken=abc"
        }"#;
        let page: ListPage<AccountEntry> = parse_json(body).expect("page should parse");
        assert!(page.value.is_empty());
        assert!(page.next_link.expect("next link").contains("$skiptoken=abc"));
    }

    #[test]
    fn test_parse_runbook_page() {
        let body = r#"{
            "value": [
                {
                    "id": "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Automation/automationAccounts/acct1/runbooks/rb1",
                    "name": "rb1",
                    "properties": {
                        "runbookType": "Python3",
                        "state": "Published"
                    }
                },
                {
                    "id": "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Automation/automationAccounts/acct1/runbooks/rb2",
                    "name": "rb2",
                    "properties": {}
                }
            ]
        }"#;
        let page: ListPage<RunbookEntry> = parse_json(body).expect("page should parse");
        assert_eq!(page.value.len(), 2);
        assert_eq!(page.value[0].name, "rb1");
        assert_eq!(page.value[0].properties.runbook_type.as_deref(), Some("Python3"));
        assert!(page.value[1].properties.runbook_type.is_none());
    }

    #[test]
    fn test_parse_json_reports_path() {
        let body = r#"{ "value": [ { "id": 42 } ] }"#;
        let err = parse_json::<ListPage<AccountEntry>>(body).unwrap_err();
        match err {
            Error::Parse { path, .. } => assert_eq!(path, "value[0].id"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
