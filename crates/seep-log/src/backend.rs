//! Named log backends.
//!
//! A backend is a sink plus the policy applied before anything reaches it:
//! a severity filter, a print limiter, and a formatter.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use seep_core::{Severity, SeverityMask};

use crate::error::LogError;
use crate::format::MessageFormatter;
use crate::limiter::{LimitDecision, MessageLimiter};

/// Where a backend's output goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// A log file.
    File(PathBuf),
    /// The process's standard output.
    Stdout,
    /// A caller-supplied writer.
    Writer,
}

/// One named log backend.
pub struct LogBackend {
    name: String,
    destination: Destination,
    sink: Box<dyn Write + Send>,
    mask: SeverityMask,
    limiter: MessageLimiter,
    formatter: MessageFormatter,
    counts: [usize; 7],
    summary: bool,
}

impl std::fmt::Debug for LogBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogBackend")
            .field("name", &self.name)
            .field("destination", &self.destination)
            .field("mask", &self.mask)
            .field("formatter", &self.formatter)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl LogBackend {
    /// A backend writing to a newly created (truncated) file.
    pub fn file(
        name: impl Into<String>,
        path: &Path,
        mask: SeverityMask,
    ) -> Result<Self, LogError> {
        let file = File::create(path).map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(
            name.into(),
            Destination::File(path.to_path_buf()),
            Box::new(BufWriter::new(file)),
            mask,
            MessageFormatter::plain(),
        ))
    }

    /// A backend writing to standard output, coloured when it is a terminal.
    pub fn stdout(name: impl Into<String>, mask: SeverityMask) -> Self {
        let colour = io::stdout().is_terminal();
        Self::new(
            name.into(),
            Destination::Stdout,
            Box::new(io::stdout()),
            mask,
            MessageFormatter::stream(colour),
        )
    }

    /// A backend writing to an arbitrary writer, without colour.
    pub fn writer(
        name: impl Into<String>,
        sink: Box<dyn Write + Send>,
        mask: SeverityMask,
    ) -> Self {
        Self::new(
            name.into(),
            Destination::Writer,
            sink,
            mask,
            MessageFormatter::stream(false),
        )
    }

    fn new(
        name: String,
        destination: Destination,
        sink: Box<dyn Write + Send>,
        mask: SeverityMask,
        formatter: MessageFormatter,
    ) -> Self {
        Self {
            name,
            destination,
            sink,
            mask,
            limiter: MessageLimiter::unlimited(),
            formatter,
            counts: [0; 7],
            summary: false,
        }
    }

    /// Replace the print limiter.
    pub fn with_limiter(mut self, limiter: MessageLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Append a per-severity count summary when a file backend is closed.
    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    /// Backend name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where output goes.
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Severity filter.
    pub fn mask(&self) -> SeverityMask {
        self.mask
    }

    /// Messages of `severity` that passed the filter, printed or suppressed.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity as usize]
    }

    /// Filter, limit, format, and write one message.
    pub fn add_message(
        &mut self,
        severity: Severity,
        tag: Option<&str>,
        text: &str,
    ) -> io::Result<()> {
        if !self.mask.contains(severity) {
            return Ok(());
        }
        self.counts[severity as usize] += 1;
        let line = match self.limiter.check(severity, tag) {
            LimitDecision::Print => self.formatter.format(severity, text),
            LimitDecision::Notice(notice) => self.formatter.format(severity, &notice),
            LimitDecision::Suppress => return Ok(()),
        };
        writeln!(self.sink, "{line}")
    }

    /// Write the summary (if enabled for a file backend), then flush and
    /// release the sink.
    pub fn close(mut self) -> io::Result<()> {
        if self.summary && matches!(self.destination, Destination::File(_)) {
            self.write_summary()?;
        }
        self.sink.flush()
    }

    fn write_summary(&mut self) -> io::Result<()> {
        writeln!(self.sink)?;
        writeln!(self.sink, "Message summary:")?;
        for severity in Severity::ALL {
            if self.mask.contains(severity) {
                writeln!(
                    self.sink,
                    "  {:<10}{:>10}",
                    severity.label(),
                    self.counts[severity as usize]
                )?;
            }
        }
        Ok(())
    }
}
