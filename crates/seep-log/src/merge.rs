//! Post-run merge of per-rank log fragments.
//!
//! Ranks other than 0 of a distributed run write `<base>.<rank>.PRT` and
//! `.<base>.<rank>.DEBUG`. Once every backend is closed, the output rank
//! appends each fragment to the matching canonical file and deletes it.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use seep_core::ProcessTopology;

use crate::error::LogError;
use crate::naming::{LogFileNames, DEBUG_EXTENSION, PRT_EXTENSION};

/// What one merge pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Non-empty fragments appended to a canonical file.
    pub merged: usize,
    /// Empty fragments deleted without being read.
    pub removed_empty: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum LogKind {
    Prt,
    Debug,
}

/// Merge fragments if this process is the output rank of a distributed run.
///
/// Must only be called after this process has closed its own backends.
pub fn merge_parallel_logs(
    topology: &ProcessTopology,
    dir: &Path,
    base: &str,
) -> Result<MergeReport, LogError> {
    if !topology.is_output_rank() || !topology.must_distribute() {
        return Ok(MergeReport::default());
    }
    merge_log_fragments(dir, base, topology.size())
}

/// Append every fragment for `base` in `dir` to its canonical file, in
/// ascending rank order, and delete the fragments.
///
/// Only ranks `1..size` are fragments of this run. Files with other rank
/// suffixes belong to another run or another case and are left alone.
/// Running it again finds no fragments and changes nothing.
pub fn merge_log_fragments(
    dir: &Path,
    base: &str,
    size: usize,
) -> Result<MergeReport, LogError> {
    let mut fragments = BTreeMap::new();
    for entry in fs::read_dir(dir).map_err(merge_err(dir))? {
        let entry = entry.map_err(merge_err(dir))?;
        let name = entry.file_name();
        if let Some(key) = name
            .to_str()
            .and_then(|name| parse_fragment(name, base))
            .filter(|&(_, rank)| rank < size)
        {
            fragments.insert(key, entry.path());
        }
    }

    let canonical = LogFileNames::for_rank(dir, base, None);
    let mut report = MergeReport::default();
    for ((kind, rank), fragment) in fragments {
        let target = match kind {
            LogKind::Prt => &canonical.prt,
            LogKind::Debug => &canonical.debug,
        };
        if append_fragment(target, &fragment, rank)? {
            report.merged += 1;
        } else {
            report.removed_empty += 1;
        }
        fs::remove_file(&fragment).map_err(merge_err(&fragment))?;
    }
    if report != MergeReport::default() {
        tracing::debug!(
            merged = report.merged,
            removed_empty = report.removed_empty,
            dir = %dir.display(),
            "log fragments merged",
        );
    }
    Ok(report)
}

/// Returns `false` if the fragment was empty and nothing was appended.
fn append_fragment(target: &Path, fragment: &Path, rank: usize) -> Result<bool, LogError> {
    let len = fs::metadata(fragment).map_err(merge_err(fragment))?.len();
    if len == 0 {
        return Ok(false);
    }
    let contents = fs::read(fragment).map_err(merge_err(fragment))?;
    let file_name = fragment
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(target)
        .map_err(merge_err(target))?;
    write!(
        out,
        "\n\n-------------------- Log output of rank {rank} ({file_name}) --------------------\n\n"
    )
    .and_then(|()| out.write_all(&contents))
    .and_then(|()| out.flush())
    .map_err(merge_err(target))?;
    Ok(true)
}

fn merge_err(path: &Path) -> impl FnOnce(io::Error) -> LogError {
    let path = path.to_path_buf();
    move |source| LogError::Merge { path, source }
}

/// Recognise `<base>.<n>.PRT` and `.<base>.<n>.DEBUG` with `n > 0`.
fn parse_fragment(name: &str, base: &str) -> Option<(LogKind, usize)> {
    let (kind, rest) = if let Some(rest) = name.strip_prefix('.') {
        (LogKind::Debug, rest.strip_suffix(DEBUG_EXTENSION)?)
    } else {
        (LogKind::Prt, name.strip_suffix(PRT_EXTENSION)?)
    };
    let rank = rest
        .strip_prefix(base)?
        .strip_prefix('.')?
        .strip_suffix('.')?;
    if rank.is_empty() || !rank.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let rank: usize = rank.parse().ok()?;
    (rank > 0).then_some((kind, rank))
}
