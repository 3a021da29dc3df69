//! Per-backend print limits.
//!
//! A limiter counts the messages a backend has been asked to print, per
//! severity and optionally per tag. Once a count passes its limit the
//! next message is replaced by a one-line notice and every later one is
//! dropped. Limiters are owned by a single backend, so suppression never
//! leaks across backends.

use std::collections::HashMap;

use seep_core::{MessageLimits, Severity};

/// What a backend should do with one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitDecision {
    /// Print the message.
    Print,
    /// Print this notice instead of the message.
    Notice(String),
    /// Drop the message.
    Suppress,
}

/// Print-count limiter for one backend.
#[derive(Clone, Debug, Default)]
pub struct MessageLimiter {
    severity_limits: Option<MessageLimits>,
    tag_limit: Option<usize>,
    severity_counts: [usize; 7],
    tag_counts: HashMap<String, usize>,
}

impl MessageLimiter {
    /// A limiter that never suppresses anything.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// A limiter applying `limits` per severity.
    pub fn with_limits(limits: MessageLimits) -> Self {
        Self {
            severity_limits: Some(limits),
            ..Self::default()
        }
    }

    /// Also limit each message tag to `limit` prints.
    pub fn with_tag_limit(mut self, limit: usize) -> Self {
        self.tag_limit = Some(limit);
        self
    }

    /// Count one message and decide whether it is printed.
    ///
    /// The tag limit is checked first; a message suppressed by its tag does
    /// not count against its severity.
    pub fn check(&mut self, severity: Severity, tag: Option<&str>) -> LimitDecision {
        if let (Some(limit), Some(tag)) = (self.tag_limit, tag) {
            let count = self.tag_counts.entry(tag.to_string()).or_insert(0);
            *count += 1;
            match Budget::of(*count, limit) {
                Budget::Within => {}
                Budget::JustExceeded => {
                    return LimitDecision::Notice(format!(
                        "Message limit reached for message tag: {tag}"
                    ));
                }
                Budget::Exhausted => return LimitDecision::Suppress,
            }
        }

        let Some(limit) = self
            .severity_limits
            .and_then(|limits| limits.limit_for(severity))
        else {
            return LimitDecision::Print;
        };
        let count = &mut self.severity_counts[severity as usize];
        *count += 1;
        match Budget::of(*count, limit) {
            Budget::Within => LimitDecision::Print,
            Budget::JustExceeded => LimitDecision::Notice(format!(
                "Message limit reached for message type: {severity}"
            )),
            Budget::Exhausted => LimitDecision::Suppress,
        }
    }

    /// Messages of `severity` counted so far, printed or not.
    pub fn count(&self, severity: Severity) -> usize {
        self.severity_counts[severity as usize]
    }
}

enum Budget {
    Within,
    JustExceeded,
    Exhausted,
}

impl Budget {
    fn of(count: usize, limit: usize) -> Self {
        if count <= limit {
            Self::Within
        } else if count == limit + 1 {
            Self::JustExceeded
        } else {
            Self::Exhausted
        }
    }
}
