//! Most-recent-file resolution over `<root>/<date>/<file>` trees.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hivegatt_protocol::constants::DATED_DIR_FORMAT;

use crate::ResolveError;

/// Which file to pick inside the most recent dated directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// The directory must hold exactly one regular file, of any kind.
    Single,
    /// Files with `extension`; the newest by the timestamp token embedded
    /// in the filename (see [`recording_key`]).
    LatestRecording { extension: String },
    /// Files with `extension`; the last one in name order.
    LastByName { extension: String },
}

impl FileSelection {
    pub fn latest_recording(extension: &str) -> Self {
        Self::LatestRecording {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn last_by_name(extension: &str) -> Self {
        Self::LastByName {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }
}

/// A subdirectory whose name parsed as a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedDir {
    pub date: NaiveDate,
    /// Directory name as found on disk.
    pub name: String,
    pub path: PathBuf,
}

/// Resolves the most recent file under a dated root.
///
/// Pure read of directory metadata; every call lists the tree again, so a
/// resolver can be kept for the life of a characteristic.
#[derive(Debug, Clone)]
pub struct MostRecentFileResolver {
    root: PathBuf,
    date_format: String,
    selection: FileSelection,
}

impl MostRecentFileResolver {
    /// Creates a resolver using the `YYYY-MM-DD` directory format.
    pub fn new(root: impl Into<PathBuf>, selection: FileSelection) -> Self {
        Self {
            root: root.into(),
            date_format: DATED_DIR_FORMAT.to_string(),
            selection,
        }
    }

    /// Overrides the `chrono` format used to parse directory names.
    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    /// Returns the path of the most recent matching file.
    pub fn resolve(&self) -> Result<PathBuf, ResolveError> {
        self.resolve_dated().map(|(_, path)| path)
    }

    /// Like [`resolve`](Self::resolve), also returning the dated directory.
    pub fn resolve_dated(&self) -> Result<(DatedDir, PathBuf), ResolveError> {
        let dir = latest_dated_dir(&self.root, &self.date_format)?;
        let file = select_file(&dir.path, &self.selection)?;
        tracing::trace!(
            root = %self.root.display(),
            file = %file.display(),
            "resolved most recent file"
        );
        Ok((dir, file))
    }
}

/// Finds the subdirectory of `root` with the greatest parsed date.
///
/// Entries that are not directories or do not parse with `date_format`
/// are skipped. Equal dates resolve to the greatest directory name.
pub fn latest_dated_dir(root: &Path, date_format: &str) -> Result<DatedDir, ResolveError> {
    let entries = std::fs::read_dir(root)?;

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let date = NaiveDate::parse_from_str(&name, date_format).ok()?;
            Some(DatedDir {
                date,
                path: entry.path(),
                name,
            })
        })
        .max_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)))
        .ok_or_else(|| ResolveError::NoDatedDirectories(root.to_path_buf()))
}

/// Picks a file inside `dir` according to `selection`.
pub fn select_file(dir: &Path, selection: &FileSelection) -> Result<PathBuf, ResolveError> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    // read_dir order is filesystem-defined.
    names.sort_unstable();

    let chosen = match selection {
        FileSelection::Single => {
            if names.len() > 1 {
                return Err(ResolveError::AmbiguousFile {
                    dir: dir.to_path_buf(),
                    count: names.len(),
                });
            }
            names.pop()
        }
        FileSelection::LatestRecording { extension } => names
            .into_iter()
            .filter(|n| has_extension(n, extension))
            .max_by(|a, b| recording_key(a).cmp(&recording_key(b)).then_with(|| a.cmp(b))),
        FileSelection::LastByName { extension } => names
            .into_iter()
            .filter(|n| has_extension(n, extension))
            .next_back(),
    };

    chosen
        .map(|name| dir.join(name))
        .ok_or_else(|| ResolveError::NoMatchingFile(dir.to_path_buf()))
}

/// Sort key for recordings named like `hive@2024-03-05@14-30-07.h264`.
///
/// Takes the token after the last `@`, drops everything from the first
/// `.`, and splits the rest on `-`. Keys compare component-wise as strings.
pub fn recording_key(file_name: &str) -> Vec<&str> {
    let token = file_name.rsplit('@').next().unwrap_or(file_name);
    let stem = token.split('.').next().unwrap_or(token);
    stem.split('-').collect()
}

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension)
}
