//! Input directory enumeration
//!
//! Lists the regular files directly under the input directory. Directories,
//! sockets and entries whose metadata cannot be read are skipped silently.
//! Symlinks are followed. The list is sorted by file name so that source
//! ordinals (and with them the tie-break between equal values) are stable
//! from run to run.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{MergeError, Result};
use crate::merge::SourceCandidate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name, used as the source id in diagnostics
    pub name: String,
}

impl SourceFile {
    pub fn open(&self, capacity: usize) -> io::Result<BufReader<File>> {
        File::open(&self.path).map(|f| BufReader::with_capacity(capacity, f))
    }
}

/// List the regular files in `dir`, skipping any path in `exclude`.
///
/// `exclude` keeps the output file (and its temp file) out of the inputs when
/// the output lives inside the input directory.
pub fn list_sources(dir: &Path, exclude: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let entries = fs::read_dir(dir).map_err(|error| MergeError::Enumerate {
        path: dir.to_path_buf(),
        error,
    })?;

    let excluded: Vec<PathBuf> = exclude.iter().filter_map(|p| p.canonicalize().ok()).collect();

    let mut sources = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();

        let is_regular = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_regular {
            continue;
        }
        if let Ok(canonical) = path.canonicalize() {
            if excluded.contains(&canonical) {
                continue;
            }
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        sources.push(SourceFile { path, name });
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

/// Open every source lazily as the engine pulls candidates
pub fn open_all(
    sources: Vec<SourceFile>,
    capacity: usize,
) -> impl Iterator<Item = SourceCandidate<BufReader<File>>> {
    sources.into_iter().map(move |source| {
        let opened = source.open(capacity);
        (source.name, opened)
    })
}
