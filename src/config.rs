//! Merge run configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::merge::DEFAULT_PROGRESS_INTERVAL;

pub const DEFAULT_INPUT_DIR: &str = "TestFiles_AhmedAbdelkader";
pub const DEFAULT_OUTPUT: &str = "merged_output.txt";

/// Per-source read buffer
pub const DEFAULT_READ_BUFFER: usize = 64 * 1024;
/// Output write buffer
pub const DEFAULT_WRITE_BUFFER: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Directory holding the sorted input files
    pub input_dir: PathBuf,
    /// Destination of the merged output
    pub output: PathBuf,
    /// Values between progress events (0 disables them)
    pub progress_interval: u64,
    pub read_buffer: usize,
    pub write_buffer: usize,
}

impl MergeConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
            ..Self::default()
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            read_buffer: DEFAULT_READ_BUFFER,
            write_buffer: DEFAULT_WRITE_BUFFER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_default_tuning() {
        let config = MergeConfig::new("inputs", "out.txt");
        assert_eq!(config.input_dir, PathBuf::from("inputs"));
        assert_eq!(config.output, PathBuf::from("out.txt"));
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
        assert_eq!(config.read_buffer, DEFAULT_READ_BUFFER);
    }

    #[test]
    fn test_defaults_match_cli_defaults() {
        let config = MergeConfig::default();
        assert_eq!(config.input_dir, PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(DEFAULT_INPUT_DIR, "TestFiles_AhmedAbdelkader");
        assert_eq!(DEFAULT_OUTPUT, "merged_output.txt");
    }
}
