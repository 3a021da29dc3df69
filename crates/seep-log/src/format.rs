//! Message formatting: severity prefixes and terminal colour.

use seep_core::Severity;

const RESET: &str = "\x1b[0m";
const BOLD_BLUE: &str = "\x1b[1;34m";
const BOLD_MAGENTA: &str = "\x1b[1;35m";
const BOLD_RED: &str = "\x1b[1;31m";

/// Turns a message into the text a backend writes.
///
/// Every severity except [`Severity::Info`] gets a `Label: ` prefix;
/// continuation lines of multi-line messages are indented to line up with
/// the first. With colour enabled, the prefix and text are wrapped in ANSI
/// escapes chosen by severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageFormatter {
    use_prefix: bool,
    use_colour: bool,
}

impl MessageFormatter {
    /// Prefixes, no colour. Used for files.
    pub fn plain() -> Self {
        Self {
            use_prefix: true,
            use_colour: false,
        }
    }

    /// Prefixes, with colour when `colour` is true. Used for streams.
    pub fn stream(colour: bool) -> Self {
        Self {
            use_prefix: true,
            use_colour: colour,
        }
    }

    /// Text exactly as given.
    pub fn raw() -> Self {
        Self::default()
    }

    /// Whether ANSI colour escapes are emitted.
    pub fn uses_colour(&self) -> bool {
        self.use_colour
    }

    /// Format `text` for `severity`. The result has no trailing newline.
    pub fn format(&self, severity: Severity, text: &str) -> String {
        let prefix = if self.use_prefix {
            prefix(severity)
        } else {
            String::new()
        };
        let mut out = prefix.clone();
        let indent = " ".repeat(prefix.len());
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                out.push('\n');
                out.push_str(&indent);
            }
            out.push_str(line);
        }
        match colour(severity).filter(|_| self.use_colour) {
            Some(code) => format!("{code}{out}{RESET}"),
            None => out,
        }
    }
}

fn prefix(severity: Severity) -> String {
    match severity {
        Severity::Info => String::new(),
        other => format!("{}: ", other.label()),
    }
}

fn colour(severity: Severity) -> Option<&'static str> {
    match severity {
        Severity::Debug | Severity::Note | Severity::Info => None,
        Severity::Warning => Some(BOLD_BLUE),
        Severity::Error | Severity::Problem => Some(BOLD_RED),
        Severity::Bug => Some(BOLD_MAGENTA),
    }
}
