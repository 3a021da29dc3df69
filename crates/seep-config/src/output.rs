//! Output directory layout and the parameter snapshot.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use seep_core::ProcessTopology;

use crate::error::ConfigError;
use crate::resolve::ResolvedConfig;

/// Where, and whether, this process writes output files.
///
/// Only the output rank ever writes canonical files; every other rank gets
/// `output_to_files == false` regardless of the `output` parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    output_to_files: bool,
    output_dir: PathBuf,
}

impl OutputLayout {
    /// File name of the parameter snapshot inside the output directory.
    pub const PARAM_FILE: &'static str = "simulation.param";

    /// Default output directory.
    pub const DEFAULT_DIR: &'static str = ".";

    /// Decide the layout and, when output is enabled, create the directory
    /// and write the parameter snapshot.
    pub fn prepare(
        config: &ResolvedConfig,
        topology: &ProcessTopology,
    ) -> Result<Self, ConfigError> {
        let output = config.get_or("output", true)?;
        let output_dir: PathBuf = config.get_or("output_dir", PathBuf::from(Self::DEFAULT_DIR))?;
        let layout = Self {
            output_to_files: topology.is_output_rank() && output,
            output_dir,
        };

        if layout.output_to_files {
            fs::create_dir_all(&layout.output_dir).map_err(|source| {
                ConfigError::OutputDirectory {
                    path: layout.output_dir.clone(),
                    source,
                }
            })?;
            let snapshot = layout.path_for(Self::PARAM_FILE);
            File::create(&snapshot)
                .and_then(|file| config.params().write_param(BufWriter::new(file)))
                .map_err(|source| ConfigError::Snapshot {
                    path: snapshot.clone(),
                    source,
                })?;
            tracing::debug!(path = %snapshot.display(), "parameter snapshot written");
        }
        Ok(layout)
    }

    /// A layout that writes nothing, rooted at `output_dir`.
    pub fn disabled(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_to_files: false,
            output_dir: output_dir.into(),
        }
    }

    /// Whether this process writes output files.
    pub fn output_to_files(&self) -> bool {
        self.output_to_files
    }

    /// The output directory. Log files go here on every rank.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of `file_name` inside the output directory.
    pub fn path_for(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ConfigResolver;

    fn config(args: &[&str]) -> ResolvedConfig {
        ConfigResolver::resolve(args.iter().copied()).unwrap()
    }

    #[test]
    fn output_rank_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let dir_arg = format!("output_dir={}", out.display());
        let cfg = config(&["deck_filename=CASE.DATA", &dir_arg, "gravity=9.0"]);
        let layout = OutputLayout::prepare(&cfg, &ProcessTopology::serial()).unwrap();
        assert!(layout.output_to_files());
        let text = fs::read_to_string(out.join(OutputLayout::PARAM_FILE)).unwrap();
        let body: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(
            body,
            vec![
                "deck_filename=CASE.DATA".to_string(),
                dir_arg.clone(),
                "gravity=9.0".to_string(),
            ]
        );
    }

    #[test]
    fn other_ranks_never_write() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let dir_arg = format!("output_dir={}", out.display());
        let cfg = config(&["deck_filename=CASE.DATA", &dir_arg]);
        let topology = ProcessTopology::new(1, 2, 1).unwrap();
        let layout = OutputLayout::prepare(&cfg, &topology).unwrap();
        assert!(!layout.output_to_files());
        assert_eq!(layout.output_dir(), out);
        assert!(!out.exists());
    }

    #[test]
    fn output_false_disables_files() {
        let cfg = config(&["deck_filename=CASE.DATA", "output=false"]);
        let layout = OutputLayout::prepare(&cfg, &ProcessTopology::serial()).unwrap();
        assert!(!layout.output_to_files());
        assert_eq!(layout.output_dir(), Path::new("."));
    }

    #[test]
    fn uncreatable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        File::create(&blocker).unwrap();
        let dir_arg = format!("output_dir={}", blocker.join("sub").display());
        let cfg = config(&["deck_filename=CASE.DATA", &dir_arg]);
        match OutputLayout::prepare(&cfg, &ProcessTopology::serial()) {
            Err(ConfigError::OutputDirectory { path, .. }) => {
                assert_eq!(path, blocker.join("sub"));
            }
            other => panic!("expected OutputDirectory, got {other:?}"),
        }
    }
}
