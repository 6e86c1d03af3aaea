//! Status line output with bracketed markers.
//!
//! Every user-facing line carries a colored marker: `[+]` success, `[-]`
//! error, `[x]` fatal error, `[!]` warning, `[*]` info. A [`StatusSink`] is
//! passed explicitly to each pipeline stage and can duplicate every line to
//! an outfile (plain text, no color codes).

use chrono::Local;
use colored::{ColoredString, Colorize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Marker class for a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `[+]` green
    Success,
    /// `[-]` red
    Error,
    /// `[x]` magenta
    Fatal,
    /// `[!]` yellow
    Warn,
    /// `[*]` blue
    Info,
}

impl Status {
    /// Plain marker text, as written to the outfile.
    pub fn marker(self) -> &'static str {
        match self {
            Status::Success => "[+]",
            Status::Error => "[-]",
            Status::Fatal => "[x]",
            Status::Warn => "[!]",
            Status::Info => "[*]",
        }
    }

    fn colored_marker(self) -> ColoredString {
        match self {
            Status::Success => self.marker().green(),
            Status::Error => self.marker().red(),
            Status::Fatal => self.marker().magenta(),
            Status::Warn => self.marker().yellow(),
            Status::Info => self.marker().blue(),
        }
    }
}

/// Console status writer, optionally duplicating every line to a file.
pub struct StatusSink {
    outfile: Option<Mutex<File>>,
}

impl StatusSink {
    /// Sink that writes to the console only.
    pub fn console_only() -> Self {
        StatusSink { outfile: None }
    }

    /// Sink that also appends every line to `path`, starting with a
    /// timestamped session header.
    pub fn with_outfile(path: &Path) -> std::io::Result<Self> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(
            file,
            "# runbook export session {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        Ok(StatusSink {
            outfile: Some(Mutex::new(file)),
        })
    }

    /// Print one status line, write-through to the outfile if configured.
    pub fn emit(&self, status: Status, text: &str) {
        println!("{} {}", status.colored_marker(), text);

        if let Some(outfile) = &self.outfile {
            if let Ok(mut file) = outfile.lock() {
                // Outfile write failures must not take down the export
                let _ = writeln!(file, "{} {}", status.marker(), text);
            }
        }
    }

    pub fn success(&self, text: &str) {
        self.emit(Status::Success, text);
    }

    pub fn error(&self, text: &str) {
        self.emit(Status::Error, text);
    }

    pub fn fatal(&self, text: &str) {
        self.emit(Status::Fatal, text);
    }

    pub fn warn(&self, text: &str) {
        self.emit(Status::Warn, text);
    }

    pub fn info(&self, text: &str) {
        self.emit(Status::Info, text);
    }
}
