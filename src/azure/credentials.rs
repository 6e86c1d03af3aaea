//! Credential acquisition for the management plane.
//!
//! Two paths, mirroring how operators run the tool:
//! - the interactive path reuses the locally authenticated CLI session
//!   (`az login`) for all listing calls and the primary content fetch;
//! - the application path exchanges a client secret from the environment
//!   for a raw bearer token, used only by the content-fetch fallback.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use azure_core::auth::TokenCredential;
use azure_core::Url;
use azure_identity::{AzureCliCredential, ClientSecretCredential};

use crate::error::Error;

/// Management-plane endpoint all listing and content calls target.
pub const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// OAuth scope for management-plane tokens.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Credential for the locally authenticated CLI session.
pub fn cli_credential() -> Arc<AzureCliCredential> {
    Arc::new(AzureCliCredential::new())
}

/// Bearer tokens from the application credential, keyed by subscription id.
///
/// Each subscription's token is exchanged at most once per run and reused
/// afterwards. Keying by subscription keeps a multi-tenant run from
/// serving one tenant's token to another subscription.
#[derive(Debug, Default)]
pub struct TokenCache {
    tokens: HashMap<String, String>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the bearer token for `subscription_id`, exchanging the client
    /// secret from the environment on first use.
    pub async fn bearer_token(&mut self, subscription_id: &str) -> Result<&str, Error> {
        match self.tokens.entry(subscription_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_str()),
            Entry::Vacant(entry) => {
                log::info!("requesting application token for subscription '{subscription_id}'");
                let token = application_token().await?;
                Ok(entry.insert(token).as_str())
            }
        }
    }
}

/// Exchange the client secret from the environment for a management token.
///
/// Requires `AZURE_DIRECTORY_ID`, `AZURE_APPLICATION_ID` and
/// `AZURE_KEY_VALUE` to be set (a `.env` file is honored).
async fn application_token() -> Result<String, Error> {
    let tenant = require_env("AZURE_DIRECTORY_ID")?;
    let app_id = require_env("AZURE_APPLICATION_ID")?;
    let secret = require_env("AZURE_KEY_VALUE")?;

    let authority = Url::parse(AUTHORITY_HOST)
        .map_err(|e| Error::AuthenticationFailed(format!("invalid authority host: {e}")))?;
    let credential = ClientSecretCredential::new(
        azure_core::new_http_client(),
        authority,
        tenant,
        app_id,
        secret,
    );

    let token = credential
        .get_token(&[MANAGEMENT_SCOPE])
        .await
        .map_err(|e| Error::AuthenticationFailed(e.to_string()))?;

    Ok(token.token.secret().to_string())
}

fn require_env(name: &'static str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::MissingEnv(name))
}
