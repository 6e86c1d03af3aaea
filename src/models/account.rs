//! Automation account data model.

use crate::error::Error;

/// An automation account discovered within one subscription.
///
/// Accounts are never mutated after listing; the resource group and name
/// together locate the account for all later runbook calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationAccount {
    /// Account name.
    pub name: String,
    /// Resource group the account lives in.
    pub resource_group: String,
}

impl AutomationAccount {
    /// Extract the resource group and account name from a hierarchical
    /// resource id.
    ///
    /// The id is split on `/` and the segments following the literal
    /// `resourceGroups` and `automationAccounts` markers are taken as the
    /// values, wherever in the path they appear.
    pub fn from_resource_id(id: &str) -> Result<Self, Error> {
        let segments: Vec<&str> = id.split('/').collect();
        let resource_group = segment_after(&segments, "resourceGroups").ok_or_else(|| {
            Error::ResourceId {
                marker: "resourceGroups",
                id: id.to_string(),
            }
        })?;
        let name = segment_after(&segments, "automationAccounts").ok_or_else(|| {
            Error::ResourceId {
                marker: "automationAccounts",
                id: id.to_string(),
            }
        })?;

        Ok(AutomationAccount {
            name: name.to_string(),
            resource_group: resource_group.to_string(),
        })
    }
}

fn segment_after<'a>(segments: &[&'a str], marker: &str) -> Option<&'a str> {
    let idx = segments.iter().position(|s| *s == marker)?;
    segments.get(idx + 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_resource_id() {
        let id = "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Automation/automationAccounts/acct1";
        let account = AutomationAccount::from_resource_id(id).expect("id should parse");
        assert_eq!(account.resource_group, "rg1");
        assert_eq!(account.name, "acct1");
    }

    #[test]
    fn test_from_resource_id_trailing_segments() {
        let id = "/subscriptions/sub-1/resourceGroups/my-rg/providers/Microsoft.Automation/automationAccounts/my-acct/runbooks/rb1";
        let account = AutomationAccount::from_resource_id(id).expect("id should parse");
        assert_eq!(account.resource_group, "my-rg");
        assert_eq!(account.name, "my-acct");
    }

    #[test]
    fn test_from_resource_id_missing_resource_group() {
        let id = "/subscriptions/sub-1/providers/Microsoft.Automation/automationAccounts/acct1";
        let err = AutomationAccount::from_resource_id(id).unwrap_err();
        assert!(matches!(
            err,
            Error::ResourceId {
                marker: "resourceGroups",
                ..
            }
        ));
    }

    #[test]
    fn test_from_resource_id_marker_is_last_segment() {
        let id = "/subscriptions/sub-1/resourceGroups/rg1/automationAccounts";
        let err = AutomationAccount::from_resource_id(id).unwrap_err();
        assert!(matches!(
            err,
            Error::ResourceId {
                marker: "automationAccounts",
                ..
            }
        ));
    }
}
