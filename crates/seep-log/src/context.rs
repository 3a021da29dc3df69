//! The driver-owned logging context.

use std::fs;
use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;
use seep_config::OutputLayout;
use seep_core::{DeckMessage, MessageLimits, ProcessTopology, Severity, SeverityMask};

use crate::backend::LogBackend;
use crate::error::LogError;
use crate::limiter::MessageLimiter;
use crate::naming::{log_base_name, LogFileNames};

/// Where the stream backend writes.
pub enum StreamTarget {
    /// Standard output, coloured when it is a terminal.
    Stdout,
    /// A caller-supplied writer.
    Writer(Box<dyn Write + Send>),
    /// No stream backend.
    Disabled,
}

impl std::fmt::Debug for StreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Writer(_) => f.write_str("Writer(..)"),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}

/// A set of named backends that every message is offered to.
///
/// Backends stay open until [`remove_all_backends`](Self::remove_all_backends)
/// or drop, whichever comes first.
#[derive(Debug, Default)]
pub struct LoggingContext {
    backends: IndexMap<String, LogBackend>,
    files: Option<LogFileNames>,
}

impl LoggingContext {
    /// Name of the primary report log backend.
    pub const PRIMARY: &'static str = "ECLIPSEPRTLOG";
    /// Name of the standard-output backend.
    pub const STREAM: &'static str = "STREAMLOG";
    /// Name of the debug log backend.
    pub const DEBUG: &'static str = "DEBUGLOG";
    /// Per-tag print limit on the stream backend.
    pub const STREAM_TAG_LIMIT: usize = 10;

    /// An empty context with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the standard backends for this process.
    ///
    /// The output directory is created if needed: ranks other than the
    /// output rank write their fragments there even when they do not write
    /// any other output.
    pub fn setup(
        topology: &ProcessTopology,
        layout: &OutputLayout,
        deck_filename: &Path,
        limits: MessageLimits,
        stream: StreamTarget,
    ) -> Result<Self, LogError> {
        let dir = layout.output_dir();
        fs::create_dir_all(dir).map_err(|source| LogError::Open {
            path: dir.to_path_buf(),
            source,
        })?;
        let base = log_base_name(deck_filename);
        let files = LogFileNames::for_process(dir, &base, topology);
        let summary = topology.is_output_rank();

        let mut ctx = Self::new();
        ctx.add_backend(
            LogBackend::file(Self::PRIMARY, &files.prt, SeverityMask::NO_DEBUG)?
                .with_limiter(MessageLimiter::with_limits(limits))
                .with_summary(summary),
        )?;
        let stream = match stream {
            StreamTarget::Stdout => Some(LogBackend::stdout(Self::STREAM, SeverityMask::STDOUT)),
            StreamTarget::Writer(sink) => {
                Some(LogBackend::writer(Self::STREAM, sink, SeverityMask::STDOUT))
            }
            StreamTarget::Disabled => None,
        };
        if let Some(stream) = stream {
            ctx.add_backend(stream.with_limiter(
                MessageLimiter::with_limits(limits).with_tag_limit(Self::STREAM_TAG_LIMIT),
            ))?;
        }
        ctx.add_backend(
            LogBackend::file(Self::DEBUG, &files.debug, SeverityMask::ALL)?.with_summary(summary),
        )?;

        tracing::debug!(
            prt = %files.prt.display(),
            debug = %files.debug.display(),
            "log backends opened",
        );
        ctx.files = Some(files);
        Ok(ctx)
    }

    /// Register a backend under its name.
    pub fn add_backend(&mut self, backend: LogBackend) -> Result<(), LogError> {
        if self.backends.contains_key(backend.name()) {
            return Err(LogError::DuplicateBackend {
                name: backend.name().to_string(),
            });
        }
        self.backends.insert(backend.name().to_string(), backend);
        Ok(())
    }

    /// Whether a backend named `name` is open.
    pub fn has_backend(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// The backend named `name`, if open.
    pub fn backend(&self, name: &str) -> Option<&LogBackend> {
        self.backends.get(name)
    }

    /// Whether any backend is open.
    pub fn is_established(&self) -> bool {
        !self.backends.is_empty()
    }

    /// Paths of the primary and debug logs opened by [`setup`](Self::setup).
    pub fn files(&self) -> Option<&LogFileNames> {
        self.files.as_ref()
    }

    /// Offer a message to every backend.
    pub fn log(&mut self, severity: Severity, text: &str) {
        self.log_tagged(severity, None, text);
    }

    /// Offer a tagged message to every backend. Tags are subject to the
    /// per-tag limit of backends that have one.
    pub fn log_tagged(&mut self, severity: Severity, tag: Option<&str>, text: &str) {
        for backend in self.backends.values_mut() {
            if let Err(error) = backend.add_message(severity, tag, text) {
                tracing::warn!(backend = backend.name(), %error, "log write failed");
            }
        }
    }

    /// Log a deck diagnostic, with its source location if known.
    pub fn deck_message(&mut self, message: &DeckMessage) {
        self.log(message.severity, &message.render());
    }

    /// Log at [`Severity::Debug`].
    pub fn debug(&mut self, text: &str) {
        self.log(Severity::Debug, text);
    }

    /// Log at [`Severity::Note`].
    pub fn note(&mut self, text: &str) {
        self.log(Severity::Note, text);
    }

    /// Log at [`Severity::Info`].
    pub fn info(&mut self, text: &str) {
        self.log(Severity::Info, text);
    }

    /// Log at [`Severity::Warning`].
    pub fn warning(&mut self, text: &str) {
        self.log(Severity::Warning, text);
    }

    /// Log at [`Severity::Error`].
    pub fn error(&mut self, text: &str) {
        self.log(Severity::Error, text);
    }

    /// Log at [`Severity::Problem`].
    pub fn problem(&mut self, text: &str) {
        self.log(Severity::Problem, text);
    }

    /// Log at [`Severity::Bug`].
    pub fn bug(&mut self, text: &str) {
        self.log(Severity::Bug, text);
    }

    /// Close every backend, writing summaries where configured.
    ///
    /// Every backend is closed even if an earlier one fails; the first
    /// failure is returned. Calling this again is a no-op.
    pub fn remove_all_backends(&mut self) -> Result<(), LogError> {
        let mut first_error = None;
        for (name, backend) in self.backends.drain(..) {
            if let Err(source) = backend.close() {
                tracing::warn!(backend = %name, error = %source, "closing log backend failed");
                first_error.get_or_insert(LogError::Close { name, source });
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for LoggingContext {
    fn drop(&mut self) {
        if self.is_established() {
            // Errors were already reported through tracing.
            let _ = self.remove_all_backends();
        }
    }
}
