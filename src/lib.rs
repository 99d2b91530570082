//! kway-merge - streaming external k-way merge of sorted integer files
//!
//! Given a directory of files that each hold ascending, whitespace-separated
//! integers, produces one output file with every value in ascending order.
//! Memory is bounded by the number of input files, not their size.

pub mod config;
pub mod error;
pub mod merge;
pub(crate) mod observability;
pub mod report;
pub mod sink;
pub mod sources;
/// Formatting helpers
pub mod utils;
/// Output verification
pub mod verify;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub use config::MergeConfig;
pub use error::{MergeError, Result};
pub use merge::{merge_readers, MergeEngine};
pub use report::MergeReport;

use observability::{log_debug, log_info};
use sink::OutputSink;

/// Merge every regular file in `config.input_dir` into `config.output`
pub fn merge_directory(config: &MergeConfig) -> Result<MergeReport> {
    merge_directory_with_cancel(config, None)
}

/// Like `merge_directory`, stopping early with `MergeError::Cancelled` once
/// `cancel` is set. Nothing is written to `config.output` in that case.
pub fn merge_directory_with_cancel(
    config: &MergeConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<MergeReport> {
    let sources = sources::list_sources(&config.input_dir, std::slice::from_ref(&config.output))?;
    log_info!(
        event = "sources_listed",
        input_dir = %config.input_dir.display(),
        count = sources.len(),
        "Enumerated input directory"
    );

    let mut sink = OutputSink::create(&config.output, config.write_buffer)?;
    log_debug!(
        event = "sink_opened",
        output = %sink.path().display(),
        temp = %sink.temp_path().display(),
        "Output staged in temp file"
    );

    let mut engine = MergeEngine::new()
        .with_progress_interval(config.progress_interval)
        .with_sink_label(sink.path().display().to_string());
    if let Some(flag) = cancel {
        engine = engine.with_cancel_flag(flag);
    }

    let mut report = engine.run(sources::open_all(sources, config.read_buffer), &mut sink)?;
    let output = sink.commit()?;
    log_info!(
        event = "output_committed",
        output = %output.display(),
        values_written = report.values_written,
        "Output written"
    );
    report.output = Some(output);

    Ok(report)
}
