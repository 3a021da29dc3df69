//! Log file naming.
//!
//! For a case `NORNE.DATA` run on 4 processes the files are:
//!
//! | rank | primary log      | debug log            |
//! |------|------------------|----------------------|
//! | 0    | `NORNE.PRT`      | `.NORNE.DEBUG`       |
//! | 2    | `NORNE.2.PRT`    | `.NORNE.2.DEBUG`     |

use std::path::{Path, PathBuf};

use seep_core::ProcessTopology;

/// Extension of the primary log.
pub const PRT_EXTENSION: &str = "PRT";

/// Extension of the debug log.
pub const DEBUG_EXTENSION: &str = "DEBUG";

/// Base name of the log files for `deck_filename`.
///
/// The file name with a `.DATA` extension (any case) stripped; any other
/// extension is kept.
pub fn log_base_name(deck_filename: &Path) -> String {
    let Some(file_name) = deck_filename.file_name() else {
        return String::new();
    };
    let path = Path::new(file_name);
    let is_data = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("data"));
    let name = if is_data {
        path.file_stem().unwrap_or(file_name)
    } else {
        file_name
    };
    name.to_string_lossy().into_owned()
}

/// The primary and debug log paths for one process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFileNames {
    /// Primary log (`<base>[.<rank>].PRT`).
    pub prt: PathBuf,
    /// Debug log (`.<base>[.<rank>].DEBUG`).
    pub debug: PathBuf,
}

impl LogFileNames {
    /// Log paths inside `dir` for this process.
    ///
    /// Non-zero ranks of a distributed run get a `.<rank>` suffix.
    pub fn for_process(dir: &Path, base: &str, topology: &ProcessTopology) -> Self {
        let rank = (topology.must_distribute() && !topology.is_output_rank())
            .then_some(topology.rank());
        Self::for_rank(dir, base, rank)
    }

    /// Log paths inside `dir`, with a rank suffix when `rank` is given.
    pub fn for_rank(dir: &Path, base: &str, rank: Option<usize>) -> Self {
        let stem = match rank {
            Some(rank) => format!("{base}.{rank}"),
            None => base.to_string(),
        };
        Self {
            prt: dir.join(format!("{stem}.{PRT_EXTENSION}")),
            debug: dir.join(format!(".{stem}.{DEBUG_EXTENSION}")),
        }
    }
}
