//! Azure identity and management-plane interaction.
//!
//! This module handles all Azure-related operations:
//! - [`credentials`] - CLI-session credential and client-secret token cache
//! - [`mgmt`] - automation account, runbook, and content calls against the
//!   management endpoint

mod credentials;
mod mgmt;

// Re-export public types and functions
pub use credentials::{TokenCache, MANAGEMENT_ENDPOINT, MANAGEMENT_SCOPE};
pub use mgmt::MgmtClient;
