//! Message severities, severity filters, and the print-limit policy.
//!
//! Shared by the deck layer (which produces [`DeckMessage`]s) and the log
//! backends (which filter and limit them).

use std::fmt;
use std::path::PathBuf;

/// Severity class of a log message, in increasing order of seriousness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Developer detail; only the debug log records it.
    Debug,
    /// Commentary that is less than informational.
    Note,
    /// Normal progress information.
    Info,
    /// Something suspicious that does not stop the run.
    Warning,
    /// An input error.
    Error,
    /// A numerical or physical problem encountered during the run.
    Problem,
    /// An internal inconsistency in the simulator itself.
    Bug,
}

impl Severity {
    /// All severities in increasing order.
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Note,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Problem,
        Severity::Bug,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Human-readable label ("Warning", "Bug", ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Note => "Note",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Problem => "Problem",
            Self::Bug => "Bug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of severities accepted by a log backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeverityMask(u8);

impl SeverityMask {
    /// Every severity.
    pub const ALL: SeverityMask = SeverityMask(0b0111_1111);
    /// Every severity except [`Severity::Debug`].
    pub const NO_DEBUG: SeverityMask = SeverityMask(0b0111_1110);
    /// Informational and above.
    pub const STDOUT: SeverityMask = SeverityMask(0b0111_1100);
    /// Nothing.
    pub const NONE: SeverityMask = SeverityMask(0);

    /// All severities at or above `min`.
    pub fn at_least(min: Severity) -> Self {
        Severity::ALL
            .iter()
            .filter(|&&s| s >= min)
            .fold(Self::NONE, |mask, &s| mask.with(s))
    }

    /// This mask plus `severity`.
    pub fn with(self, severity: Severity) -> Self {
        Self(self.0 | severity.bit())
    }

    /// Whether `severity` passes the filter.
    pub fn contains(self, severity: Severity) -> bool {
        self.0 & severity.bit() != 0
    }
}

/// Where in the input a message originated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// Input file containing the offending text.
    pub file: PathBuf,
    /// One-based line number.
    pub line: usize,
}

/// A diagnostic produced while reading the input deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckMessage {
    /// Severity class.
    pub severity: Severity,
    /// Message text.
    pub text: String,
    /// Source location, when the parser knows it.
    pub location: Option<SourceLocation>,
}

impl DeckMessage {
    /// A message without a source location.
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            location: None,
        }
    }

    /// Attach a source location.
    pub fn at(mut self, file: impl Into<PathBuf>, line: usize) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line,
        });
        self
    }

    /// The text as it should appear in the logs, with location if known.
    pub fn render(&self) -> String {
        match &self.location {
            Some(loc) => format!(
                "{}\nIn file {}, line {}",
                self.text,
                loc.file.display(),
                loc.line
            ),
            None => self.text.clone(),
        }
    }
}

/// Per-severity print limits configured by the simulation case.
///
/// One integer per severity class. Debug messages are never limited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageLimits {
    /// Limit for [`Severity::Note`].
    pub note: usize,
    /// Limit for [`Severity::Info`].
    pub info: usize,
    /// Limit for [`Severity::Warning`].
    pub warning: usize,
    /// Limit for [`Severity::Error`].
    pub error: usize,
    /// Limit for [`Severity::Problem`].
    pub problem: usize,
    /// Limit for [`Severity::Bug`].
    pub bug: usize,
}

impl MessageLimits {
    /// Default comment (note) print limit.
    pub const DEFAULT_NOTE: usize = 1_000_000;
    /// Default message (info) print limit.
    pub const DEFAULT_INFO: usize = 1_000_000;
    /// Default warning print limit.
    pub const DEFAULT_WARNING: usize = 10_000;
    /// Default error print limit.
    pub const DEFAULT_ERROR: usize = 100;
    /// Default problem print limit.
    pub const DEFAULT_PROBLEM: usize = 100;
    /// Default bug print limit.
    pub const DEFAULT_BUG: usize = 100;

    /// The same limit for every severity class.
    pub fn uniform(limit: usize) -> Self {
        Self {
            note: limit,
            info: limit,
            warning: limit,
            error: limit,
            problem: limit,
            bug: limit,
        }
    }

    /// The limit applying to `severity`, or `None` if it is unlimited.
    pub fn limit_for(&self, severity: Severity) -> Option<usize> {
        match severity {
            Severity::Debug => None,
            Severity::Note => Some(self.note),
            Severity::Info => Some(self.info),
            Severity::Warning => Some(self.warning),
            Severity::Error => Some(self.error),
            Severity::Problem => Some(self.problem),
            Severity::Bug => Some(self.bug),
        }
    }
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            note: Self::DEFAULT_NOTE,
            info: Self::DEFAULT_INFO,
            warning: Self::DEFAULT_WARNING,
            error: Self::DEFAULT_ERROR,
            problem: Self::DEFAULT_PROBLEM,
            bug: Self::DEFAULT_BUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_mask_is_info_and_above() {
        assert_eq!(SeverityMask::at_least(Severity::Info), SeverityMask::STDOUT);
        assert!(!SeverityMask::STDOUT.contains(Severity::Note));
        assert!(!SeverityMask::STDOUT.contains(Severity::Debug));
        assert!(SeverityMask::STDOUT.contains(Severity::Bug));
    }

    #[test]
    fn no_debug_mask_excludes_only_debug() {
        for s in Severity::ALL {
            assert_eq!(SeverityMask::NO_DEBUG.contains(s), s != Severity::Debug);
            assert!(SeverityMask::ALL.contains(s));
            assert!(!SeverityMask::NONE.contains(s));
        }
    }

    #[test]
    fn debug_is_never_limited() {
        let limits = MessageLimits::uniform(0);
        assert_eq!(limits.limit_for(Severity::Debug), None);
        assert_eq!(limits.limit_for(Severity::Warning), Some(0));
    }

    #[test]
    fn located_message_renders_file_and_line() {
        let msg = DeckMessage::new(Severity::Warning, "unsupported keyword").at("CASE.DATA", 12);
        assert_eq!(
            msg.render(),
            "unsupported keyword\nIn file CASE.DATA, line 12"
        );
    }

    // ── Property tests ─────────────────────────────────────────────

    use proptest::prelude::*;

    fn any_severity() -> impl Strategy<Value = Severity> {
        (0..Severity::ALL.len()).prop_map(|i| Severity::ALL[i])
    }

    proptest! {
        #[test]
        fn at_least_matches_ordering(min in any_severity(), probe in any_severity()) {
            prop_assert_eq!(SeverityMask::at_least(min).contains(probe), probe >= min);
        }

        #[test]
        fn with_only_adds(a in any_severity(), b in any_severity()) {
            let mask = SeverityMask::NONE.with(a).with(b);
            for s in Severity::ALL {
                prop_assert_eq!(mask.contains(s), s == a || s == b);
            }
        }
    }
}
