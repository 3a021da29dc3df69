//! Where the driver's direct console output goes.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use seep_log::StreamTarget;

type WriterFactory = Arc<dyn Fn() -> Box<dyn Write + Send> + Send + Sync>;

/// Destination for the banner, pre-logging errors, the unused-parameter
/// report, and the stream log backend.
#[derive(Clone, Default)]
pub enum Console {
    /// Standard output.
    #[default]
    Stdout,
    /// A fresh writer from the factory for every use.
    Writer(WriterFactory),
}

impl Console {
    /// Send console output to clones of `writer`.
    pub fn capture<W>(writer: W) -> Self
    where
        W: Write + Send + Clone + Sync + 'static,
    {
        Self::Writer(Arc::new(move || Box::new(writer.clone())))
    }

    /// A writer for direct output.
    pub fn writer(&self) -> Box<dyn Write + Send> {
        match self {
            Self::Stdout => Box::new(io::stdout()),
            Self::Writer(factory) => factory(),
        }
    }

    /// The matching target for the stream log backend.
    pub fn stream_target(&self) -> StreamTarget {
        match self {
            Self::Stdout => StreamTarget::Stdout,
            Self::Writer(factory) => StreamTarget::Writer(factory()),
        }
    }

    /// Write `text` followed by a newline. Console failures are not fatal.
    pub fn print(&self, text: &str) {
        let mut out = self.writer();
        if let Err(error) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            tracing::warn!(%error, "console write failed");
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}
