//! Command-line resolution: parameters, parameter files, and the input case.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::param::{FromParam, ParameterGroup};

/// Parameter key holding the resolved input case.
pub const DECK_FILENAME: &str = "deck_filename";

/// Suffix that marks an argument as a parameter file.
const PARAM_FILE_SUFFIX: &str = ".param";

/// Extensions tried, in order, when the case path does not exist as given.
const CASE_EXTENSIONS: [&str; 2] = ["data", "DATA"];

/// How one command-line argument is interpreted.
#[derive(Debug, PartialEq, Eq)]
enum Argument<'a> {
    Assignment(&'a str),
    ParamFile(&'a Path),
    Positional(&'a Path),
}

fn classify(arg: &str) -> Argument<'_> {
    if arg.contains('=') {
        Argument::Assignment(arg)
    } else if arg.ends_with(PARAM_FILE_SUFFIX) {
        Argument::ParamFile(Path::new(arg))
    } else {
        Argument::Positional(Path::new(arg))
    }
}

/// Resolve a case path to an existing regular file.
///
/// Tries the path as given, then with its extension replaced by `.data`,
/// then by `.DATA`. Symlinks are followed.
pub fn resolve_case(case: &Path) -> Result<PathBuf, ConfigError> {
    let candidates = std::iter::once(case.to_path_buf())
        .chain(CASE_EXTENSIONS.iter().map(|ext| case.with_extension(ext)));
    for candidate in candidates {
        if fs::metadata(&candidate).is_ok_and(|m| m.is_file()) {
            if candidate != case {
                tracing::debug!(
                    case = %case.display(),
                    resolved = %candidate.display(),
                    "input case resolved by extension",
                );
            }
            return Ok(candidate);
        }
    }
    Err(ConfigError::DeckResolution {
        case: case.to_path_buf(),
    })
}

/// Builds a [`ResolvedConfig`] from raw arguments.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    params: ParameterGroup,
    positional: Vec<PathBuf>,
}

impl ConfigResolver {
    /// Resolve `args` (without the program name) in one pass.
    pub fn resolve<I, S>(args: I) -> Result<ResolvedConfig, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolver = Self::default();
        for arg in args {
            resolver.apply(arg.as_ref())?;
        }
        resolver.finish()
    }

    fn apply(&mut self, arg: &str) -> Result<(), ConfigError> {
        match classify(arg) {
            Argument::Assignment(text) => self.params.insert_assignment(text),
            Argument::ParamFile(path) => self.params.read_param_file(path),
            Argument::Positional(path) => {
                self.positional.push(path.to_path_buf());
                Ok(())
            }
        }
    }

    fn finish(mut self) -> Result<ResolvedConfig, ConfigError> {
        match self.positional.as_slice() {
            [] => {}
            [case] => {
                let deck = resolve_case(case)?;
                self.params
                    .insert(DECK_FILENAME, deck.to_string_lossy().into_owned());
            }
            many => {
                return Err(ConfigError::argument(format!(
                    "expected at most one input case, got {}: {}",
                    many.len(),
                    many.iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                )));
            }
        }

        let Some(deck_filename) = self.params.get::<PathBuf>(DECK_FILENAME)? else {
            return Err(ConfigError::argument(
                "no input case specified; give it as the sole positional argument, \
                 as deck_filename=<path> on the command line, \
                 or as deck_filename=<path> in a .param file",
            ));
        };
        Ok(ResolvedConfig {
            params: self.params,
            deck_filename,
        })
    }
}

/// The run's parameters plus its single input case.
///
/// Built once; getters record which keys were consulted so the driver can
/// report the rest via [`unused`](Self::unused).
#[derive(Debug)]
pub struct ResolvedConfig {
    params: ParameterGroup,
    deck_filename: PathBuf,
}

impl ResolvedConfig {
    /// The input case file.
    pub fn deck_filename(&self) -> &Path {
        &self.deck_filename
    }

    /// Read and convert `key`, marking it used.
    pub fn get<T: FromParam>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.params.get(key)
    }

    /// Read `key`, falling back to `default` when absent.
    pub fn get_or<T: FromParam>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        self.params.get_or(key, default)
    }

    /// Keys never consulted, in insertion order.
    pub fn unused(&self) -> Vec<&str> {
        self.params.unused()
    }

    /// The underlying parameters.
    pub fn params(&self) -> &ParameterGroup {
        &self.params
    }
}
