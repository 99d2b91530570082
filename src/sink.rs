//! Output sink with atomic commit
//!
//! Merged values go to a temp file next to the destination. `commit` flushes
//! and renames it into place; dropping an uncommitted sink removes the temp
//! file, so a failed or cancelled merge never leaves a partial output.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{MergeError, Result};

pub struct OutputSink {
    writer: BufWriter<NamedTempFile>,
    path: PathBuf,
}

impl OutputSink {
    /// Create the temp file for `path`. Fails if the destination directory is
    /// missing or not writable.
    pub fn create(path: &Path, capacity: usize) -> Result<Self> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file = tempfile::Builder::new()
            .prefix(".kway-merge-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|error| MergeError::SinkOpen {
                path: path.to_path_buf(),
                error,
            })?;

        Ok(Self {
            writer: BufWriter::with_capacity(capacity, file),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temp file currently receiving data
    pub fn temp_path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    /// Flush and move the temp file over the destination
    pub fn commit(self) -> Result<PathBuf> {
        let path = self.path;
        let file = self
            .writer
            .into_inner()
            .map_err(|e| MergeError::SinkWrite {
                target: path.display().to_string(),
                error: e.into_error(),
            })?;
        file.as_file().sync_all().map_err(|error| MergeError::SinkWrite {
            target: path.display().to_string(),
            error,
        })?;
        file.persist(&path).map_err(|e| MergeError::SinkWrite {
            target: path.display().to_string(),
            error: e.error,
        })?;
        Ok(path)
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_commit_moves_data_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.txt");

        let mut sink = OutputSink::create(&path, 64).unwrap();
        assert_eq!(sink.path(), path.as_path());
        assert_eq!(sink.temp_path().parent(), Some(dir.path()));
        writeln!(sink, "1").unwrap();
        writeln!(sink, "2").unwrap();
        assert!(!path.exists());

        let committed = sink.commit().unwrap();
        assert_eq!(committed, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n");
    }

    #[test]
    fn test_dropped_sink_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.txt");

        let mut sink = OutputSink::create(&path, 64).unwrap();
        writeln!(sink, "1").unwrap();
        let temp = sink.temp_path().to_path_buf();
        assert!(temp.exists());
        drop(sink);

        assert!(!temp.exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("merged.txt");
        let err = OutputSink::create(&path, 64).err().unwrap();
        assert!(matches!(err, MergeError::SinkOpen { .. }));
    }

    #[test]
    fn test_commit_replaces_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.txt");
        fs::write(&path, "stale\n").unwrap();

        let mut sink = OutputSink::create(&path, 64).unwrap();
        writeln!(sink, "7").unwrap();
        sink.commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "7\n");
    }
}
