//! Error taxonomy for the merge engine
//!
//! Source-level errors (`EmptySource`, `SourceOpen`, `SourceRead`) are local:
//! the engine logs them and carries on with the remaining sources. Sink,
//! enumeration and cancellation errors abort the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MergeError>;

#[derive(Debug, Error)]
pub enum MergeError {
    /// Source had no readable value at open time
    #[error("source {source_id} is empty")]
    EmptySource { source_id: String },

    /// Source file could not be opened for reading
    #[error("failed to open source {source_id}: {error}")]
    SourceOpen {
        source_id: String,
        #[source]
        error: io::Error,
    },

    /// End of data, malformed token or I/O failure while reading a source
    #[error("read failure in {source_id}: {reason}")]
    SourceRead { source_id: String, reason: String },

    #[error("failed to open output {}: {error}", path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to write output {target}: {error}")]
    SinkWrite {
        target: String,
        #[source]
        error: io::Error,
    },

    #[error("failed to enumerate input directory {}: {error}", path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("merge cancelled after {values_written} values")]
    Cancelled { values_written: u64 },

    /// Designed termination of the merge loop; callers check `is_empty` first
    #[error("frontier is empty")]
    EmptyFrontier,
}

impl MergeError {
    /// Whether this error ends the whole merge rather than a single source
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            MergeError::EmptySource { .. }
                | MergeError::SourceOpen { .. }
                | MergeError::SourceRead { .. }
                | MergeError::EmptyFrontier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_are_local() {
        let empty = MergeError::EmptySource {
            source_id: "c.txt".to_string(),
        };
        assert!(!empty.is_fatal());
        assert_eq!(empty.to_string(), "source c.txt is empty");

        let read = MergeError::SourceRead {
            source_id: "a.txt".to_string(),
            reason: "malformed token \"x\"".to_string(),
        };
        assert!(!read.is_fatal());
        assert!(!MergeError::EmptyFrontier.is_fatal());
    }

    #[test]
    fn test_sink_errors_are_fatal() {
        let err = MergeError::SinkOpen {
            path: PathBuf::from("/nonexistent/out.txt"),
            error: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/nonexistent/out.txt"));
        assert!(MergeError::Cancelled { values_written: 3 }.is_fatal());
    }
}
