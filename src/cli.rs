//! Command line argument handling.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::Error;
use crate::output::StatusSink;

/// Enumerate automation accounts within Azure subscriptions and export
/// their runbook sources to local files.
#[derive(Parser, Debug)]
#[command(name = "runbook-exporter", version, about)]
pub struct Args {
    /// Single subscription id to retrieve runbooks from [exclusive with --subscription-file]
    #[arg(short = 's', long = "subscription-id", value_name = "ID")]
    pub subscription_id: Option<String>,

    /// File containing subscription ids to inspect, one per line [exclusive with -s]
    #[arg(long = "subscription-file", alias = "sf", value_name = "FILE")]
    pub subscription_file: Option<PathBuf>,

    /// File to append console output to
    #[arg(short = 'o', long = "outfile", value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Directory to export runbook files to
    #[arg(
        short = 'd',
        long = "download-directory",
        value_name = "DIR",
        default_value = "./Testing"
    )]
    pub download_directory: PathBuf,
}

impl Args {
    /// Resolve the list of subscriptions to export.
    ///
    /// A single `-s` id wins over `--subscription-file` when both are
    /// given (with a warning); neither given is an error the caller turns
    /// into usage output.
    pub fn subscriptions(&self, status: &StatusSink) -> Result<Vec<String>, Error> {
        match (&self.subscription_id, &self.subscription_file) {
            (Some(id), Some(_)) => {
                status.warn(
                    "Both subscription id and input file specified, defaulting to single subscription!",
                );
                Ok(vec![id.clone()])
            }
            (Some(id), None) => Ok(vec![id.clone()]),
            (None, Some(path)) => read_subscription_file(path),
            (None, None) => Err(Error::NoSubscriptionInput),
        }
    }
}

/// Read newline-delimited subscription ids from a file.
///
/// # Arguments
/// * `path` - File with one subscription id per line
///
/// # Returns
/// * `Ok(Vec<String>)` - The ids, trimmed, blank lines skipped
/// * `Err` - If the file cannot be read
pub fn read_subscription_file(path: &Path) -> Result<Vec<String>, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
