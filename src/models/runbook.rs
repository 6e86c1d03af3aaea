//! Runbook data model and export extension lookup.

use std::collections::HashMap;

/// A named, typed automation script registered to one automation account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runbook {
    /// Automation account the runbook is published to.
    pub account_name: String,
    /// Resource group of the owning account.
    pub resource_group: String,
    /// Runbook type as reported by the management api (e.g. `Powershell`,
    /// `Python3`). Unknown values are allowed.
    pub runbook_type: String,
    /// Runbook name.
    pub name: String,
}

/// Runbook type to file extension lookup used when persisting exports.
///
/// The mapping is deliberately lossy (several types share `ps1`, both
/// Python generations share `py`); unknown types fall back to `ps1`.
#[derive(Debug, Clone)]
pub struct ExtensionMap {
    table: HashMap<String, String>,
    fallback: String,
}

impl Default for ExtensionMap {
    fn default() -> Self {
        let table = [
            ("Powershell", "ps1"),
            ("GraphPowershell", "ps1"),
            ("Script", "ps1"),
            ("Python3", "py"),
            ("Python2", "py"),
        ]
        .into_iter()
        .map(|(t, e)| (t.to_string(), e.to_string()))
        .collect();

        ExtensionMap {
            table,
            fallback: "ps1".to_string(),
        }
    }
}

impl ExtensionMap {
    /// Look up the export extension for a runbook type.
    pub fn extension(&self, runbook_type: &str) -> &str {
        self.table
            .get(runbook_type)
            .unwrap_or(&self.fallback)
            .as_str()
    }

    /// Override or extend the table with a custom mapping.
    pub fn insert(&mut self, runbook_type: &str, extension: &str) {
        self.table
            .insert(runbook_type.to_string(), extension.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_python3() {
        let map = ExtensionMap::default();
        assert_eq!(map.extension("Python3"), "py");
        assert_eq!(map.extension("Python2"), "py");
    }

    #[test]
    fn test_extension_powershell() {
        let map = ExtensionMap::default();
        assert_eq!(map.extension("Powershell"), "ps1");
        assert_eq!(map.extension("GraphPowershell"), "ps1");
        assert_eq!(map.extension("Script"), "ps1");
    }

    #[test]
    fn test_extension_unknown_defaults_to_ps1() {
        let map = ExtensionMap::default();
        assert_eq!(map.extension("PowerShellWorkflow"), "ps1");
        assert_eq!(map.extension(""), "ps1");
    }

    #[test]
    fn test_extension_insert_override() {
        let mut map = ExtensionMap::default();
        map.insert("PowerShell72", "ps1");
        map.insert("Python3", "python");
        assert_eq!(map.extension("PowerShell72"), "ps1");
        assert_eq!(map.extension("Python3"), "python");
    }
}
