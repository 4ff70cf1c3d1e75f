//! Brewing grammar files on disk
//!
//! A recipe locates the newest versioned grammar source (`Caramel_v3.g4`
//! beats `Caramel_v2.g4`), skips the work when the generated grammar is
//! newer than that source, and otherwise writes a freshly brewed grammar.

use crate::brewer::Brewer;
use crate::error::BrewError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Errors from the file side of brewing
#[derive(Debug)]
pub enum RecipeError {
    /// IO error on a specific path
    Io { path: PathBuf, message: String },
    /// No file in the grammar directory matches the source pattern
    NoSource { dir: PathBuf, pattern: String },
    /// The source pattern is not a valid regex
    InvalidPattern(String),
    /// The source could not be brewed
    Brew { path: PathBuf, error: BrewError },
}

impl fmt::Display for RecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeError::Io { path, message } => {
                write!(f, "IO error on {}: {}", path.display(), message)
            }
            RecipeError::NoSource { dir, pattern } => write!(
                f,
                "There is no grammar file matching `{}` in {}",
                pattern,
                dir.display()
            ),
            RecipeError::InvalidPattern(msg) => write!(f, "Invalid source pattern: {}", msg),
            RecipeError::Brew { path, error } => write!(f, "{}: {}", path.display(), error),
        }
    }
}

impl std::error::Error for RecipeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecipeError::Brew { error, .. } => Some(error),
            _ => None,
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RecipeError + '_ {
    move |err| RecipeError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Sort key of a candidate source file name
///
/// Versions are kept as digit strings without leading zeros, so any length
/// compares correctly: shorter is smaller, equal lengths compare by digits.
#[derive(Debug, PartialEq, Eq)]
struct SourceVersion<'a> {
    digits: Option<&'a str>,
    name: &'a str,
}

impl Ord for SourceVersion<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |v: &Self| v.digits.map(|d| (d.len(), d));
        key(self)
            .cmp(&key(other))
            .then_with(|| self.name.cmp(other.name))
    }
}

impl PartialOrd for SourceVersion<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn source_version<'a>(pattern: &Regex, name: &'a str) -> Option<SourceVersion<'a>> {
    let captures = pattern.captures(name)?;
    let digits = captures
        .get(1)
        .map(|m| m.as_str().trim_start_matches(|c: char| !c.is_ascii_digit()))
        .filter(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
        .map(|d| {
            let trimmed = d.trim_start_matches('0');
            if trimmed.is_empty() {
                "0"
            } else {
                trimmed
            }
        });
    Some(SourceVersion { digits, name })
}

/// Find the newest grammar source in `dir` whose file name fully matches
/// `pattern`.
///
/// The first capture group, when present, is compared as a number.
pub fn find_latest_source(dir: &Path, pattern: &str) -> Result<PathBuf, RecipeError> {
    let regex = Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| RecipeError::InvalidPattern(e.to_string()))?;

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        if !entry.file_type().map_err(io_error(dir))?.is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    tracing::debug!(dir = %dir.display(), candidates = names.len(), "scanned grammar directory");

    names
        .iter()
        .filter_map(|name| source_version(&regex, name))
        .max()
        .map(|version| dir.join(version.name))
        .ok_or_else(|| RecipeError::NoSource {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        })
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Whether `output` has to be regenerated from `source`.
///
/// A missing output is stale; a missing source never is.
pub fn is_stale(source: &Path, output: &Path) -> bool {
    match (modified(source), modified(output)) {
        (Some(source_time), Some(output_time)) => source_time > output_time,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Where a source comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelector {
    /// Newest file in `dir` matching `pattern`
    Latest { dir: PathBuf, pattern: String },
    /// A fixed file
    Path(PathBuf),
}

impl SourceSelector {
    pub fn resolve(&self) -> Result<PathBuf, RecipeError> {
        match self {
            SourceSelector::Latest { dir, pattern } => find_latest_source(dir, pattern),
            SourceSelector::Path(path) => Ok(path.clone()),
        }
    }
}

/// What [`Recipe::cook`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Brewed {
        source: PathBuf,
        output: PathBuf,
        macros: usize,
        passes: usize,
    },
    UpToDate {
        source: PathBuf,
        output: PathBuf,
    },
}

/// Brews one source into one generated grammar
#[derive(Debug, Clone)]
pub struct Recipe {
    brewer: Brewer,
    source: SourceSelector,
    output: PathBuf,
}

impl Recipe {
    pub fn new(brewer: Brewer, source: SourceSelector, output: impl Into<PathBuf>) -> Self {
        Recipe {
            brewer,
            source,
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Read the selected source, returning its path and text.
    pub fn read_source(&self) -> Result<(PathBuf, String), RecipeError> {
        let path = self.source.resolve()?;
        let text = fs::read_to_string(&path).map_err(io_error(&path))?;
        Ok((path, text))
    }

    /// Render the selected source without touching the output file.
    pub fn render(&self) -> Result<String, RecipeError> {
        let (path, text) = self.read_source()?;
        self.brewer
            .render(&text)
            .map_err(|error| RecipeError::Brew { path, error })
    }

    /// Brew the source into the output, unless the output is already newer
    /// and `force` is off.
    pub fn cook(&self, force: bool) -> Result<Outcome, RecipeError> {
        let source = self.source.resolve()?;
        let output = self.output.clone();
        tracing::debug!(source = %source.display(), output = %output.display(), "selected grammar");
        fs::metadata(&source).map_err(io_error(&source))?;

        if !force && !is_stale(&source, &output) {
            tracing::info!("The brewed grammar is up-to-date.");
            return Ok(Outcome::UpToDate { source, output });
        }

        let text = fs::read_to_string(&source).map_err(io_error(&source))?;
        let brew = self
            .brewer
            .brew_with_report(&text)
            .map_err(|error| RecipeError::Brew {
                path: source.clone(),
                error,
            })?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&output, self.brewer.with_header(&brew.body)).map_err(io_error(&output))?;

        tracing::info!(macros = brew.macros.len(), passes = brew.passes, "Grammar file brewed.");
        Ok(Outcome::Brewed {
            source,
            output,
            macros: brew.macros.len(),
            passes: brew.passes,
        })
    }
}
