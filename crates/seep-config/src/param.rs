//! `key=value` run parameters with usage tracking.
//!
//! [`ParameterGroup`] keeps parameters in insertion order and records which
//! keys downstream stages actually read. Keys nobody read are reported at
//! the end of a run so users notice typos such as `outptu_dir=...`.

use std::cell::Cell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::ConfigError;

/// Conversion from a raw parameter string.
pub trait FromParam: Sized {
    /// Type name used in error messages.
    const EXPECTED: &'static str;

    /// Parse `value`, or `None` if it is not a valid representation.
    fn from_param(value: &str) -> Option<Self>;
}

impl FromParam for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

impl FromParam for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_param(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl FromParam for usize {
    const EXPECTED: &'static str = "non-negative integer";

    fn from_param(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl FromParam for f64 {
    const EXPECTED: &'static str = "number";

    fn from_param(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl FromParam for String {
    const EXPECTED: &'static str = "string";

    fn from_param(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

impl FromParam for PathBuf {
    const EXPECTED: &'static str = "path";

    fn from_param(value: &str) -> Option<Self> {
        Some(PathBuf::from(value))
    }
}

#[derive(Debug)]
struct Entry {
    value: String,
    used: Cell<bool>,
}

/// Ordered `key=value` parameters with per-key usage tracking.
///
/// Re-inserting a key replaces its value but keeps its original position,
/// and resets its usage flag.
#[derive(Debug, Default)]
pub struct ParameterGroup {
    entries: IndexMap<String, Entry>,
}

impl ParameterGroup {
    /// An empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                used: Cell::new(false),
            },
        );
    }

    /// Parse a `key=value` argument and insert it.
    pub fn insert_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, value) = split_assignment(assignment).ok_or_else(|| {
            ConfigError::argument(format!("expected key=value, got {assignment:?}"))
        })?;
        self.insert(key, value);
        Ok(())
    }

    /// Whether `key` is present. Does not count as a use.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Read and convert `key`, marking it used.
    pub fn get<T: FromParam>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };
        entry.used.set(true);
        T::from_param(&entry.value)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: entry.value.clone(),
                expected: T::EXPECTED,
            })
    }

    /// Read `key`, falling back to `default` when absent.
    pub fn get_or<T: FromParam>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Keys that were never read, in insertion order.
    pub fn unused(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.used.get())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// All parameters in insertion order. Does not count as a use.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, e)| (k.as_str(), e.value.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every parameter from a `.param` file.
    pub fn read_param_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::ParamFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.parse_param_text(&text, path)
    }

    /// Load parameters from `.param` text. `source` is used for messages.
    ///
    /// One `key=value` per line; blank lines and lines starting with `#`
    /// are ignored.
    pub fn parse_param_text(&mut self, text: &str, source: &Path) -> Result<(), ConfigError> {
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = split_assignment(line).ok_or_else(|| ConfigError::ParamFile {
                path: source.to_path_buf(),
                reason: format!("line {}: expected key=value, got {line:?}", index + 1),
            })?;
            self.insert(key, value);
        }
        Ok(())
    }

    /// Write every parameter as `key=value` lines, readable by
    /// [`read_param_file`](Self::read_param_file).
    pub fn write_param<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "# Parameters used by seep {}", env!("CARGO_PKG_VERSION"))?;
        for (key, value) in self.iter() {
            writeln!(out, "{key}={value}")?;
        }
        out.flush()
    }
}

fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let (key, value) = text.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}
