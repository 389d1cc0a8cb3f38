use crate::errors::InputError;
use crate::summarize::Engine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_PATTERN: &str = "*.txt";

/// Per-source results in the order the sources were processed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    entries: Vec<(PathBuf, String)>,
    positions: HashMap<PathBuf, usize>,
}

impl BatchReport {
    /// Records a result. A source seen before keeps its position and takes
    /// the new value.
    pub fn record(&mut self, source: PathBuf, result: String) {
        match self.positions.get(&source) {
            Some(&i) => self.entries[i].1 = result,
            None => {
                self.positions.insert(source.clone(), self.entries.len());
                self.entries.push((source, result));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, source: &Path) -> Option<&str> {
        self.positions
            .get(source)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries.iter().map(|(p, r)| (p.as_path(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, r)| r.starts_with(ERROR_PREFIX))
            .count()
    }
}

const ERROR_PREFIX: &str = "Error: ";

/// Summarizes every source in order. A source that cannot be read is
/// recorded as an error string and never stops the batch.
pub fn process_collection<I, P>(items: I, target_length: usize, engine: &Engine) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut report = BatchReport::default();
    for item in items {
        let path = item.into();
        tracing::info!(path = %path.display(), "processing");
        let result = match engine.summarize_source(&path, target_length) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to summarize");
                format!("{ERROR_PREFIX}{e}")
            }
        };
        report.record(path, result);
    }
    report
}

/// Summarizes the regular files in `dir` matching the glob `pattern`,
/// in lexicographic order.
pub fn process_directory(
    dir: &Path,
    pattern: &str,
    target_length: usize,
    engine: &Engine,
) -> Result<BatchReport, InputError> {
    let files = matching_files(dir, pattern)?;
    if files.is_empty() {
        tracing::info!(dir = %dir.display(), %pattern, "no files found matching pattern");
        return Ok(BatchReport::default());
    }
    Ok(process_collection(files, target_length, engine))
}

fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, InputError> {
    if !dir.is_dir() {
        return Err(InputError::InvalidDirectory(dir.to_path_buf()));
    }
    // only the pattern part may carry wildcards
    let full = PathBuf::from(glob::Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let full = full.to_string_lossy();
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let paths = glob::glob_with(&full, options).map_err(|e| InputError::Pattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })?;
    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
