//! Streaming k-way merge loop
//!
//! Initializing: one cursor per source, empty or unreadable sources skipped.
//! Merging: pop the smallest cursor, write its value, advance, push it back
//! while it still has data. Done: frontier empty, sink flushed.
//!
//! Every extracted value is <= the head of every other active cursor, and
//! heads never decrease for sorted input, so the output is sorted.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::cursor::{Advance, Cursor};
use super::frontier::Frontier;
use crate::error::{MergeError, Result};
use crate::observability::{log_debug, log_info, log_trace, log_warn};
use crate::report::{ExhaustedSource, MergeReport, SkippedSource};

/// Values between progress events
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// A named candidate source. The open result is carried so that a file that
/// failed to open is reported alongside empty ones instead of aborting.
pub type SourceCandidate<R> = (String, io::Result<R>);

#[derive(Debug, Clone)]
pub struct MergeEngine {
    progress_interval: u64,
    sink_label: String,
    cancel: Option<Arc<AtomicBool>>,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            sink_label: "output".to_string(),
            cancel: None,
        }
    }

    /// Emit a progress event every `interval` values (0 disables it)
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Name used for the sink in diagnostics and write errors
    pub fn with_sink_label(mut self, label: impl Into<String>) -> Self {
        self.sink_label = label.into();
        self
    }

    /// Flag polled once per merged value; when set the run stops with
    /// `MergeError::Cancelled`
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Merge `sources` into `sink`, one value per line.
    ///
    /// The sink is flushed but not closed; committing it is the caller's job.
    pub fn run<R, I, W>(&self, sources: I, sink: &mut W) -> Result<MergeReport>
    where
        R: BufRead,
        I: IntoIterator<Item = SourceCandidate<R>>,
        W: Write,
    {
        let start_time = Instant::now();
        let mut report = MergeReport::default();

        let mut frontier = self.initialize(sources, &mut report);
        report.peak_open_sources = frontier.len();

        log_info!(
            event = "merge_started",
            active_sources = frontier.len(),
            skipped = report.skipped.len(),
            "Starting merge process"
        );

        while !frontier.is_empty() {
            if self.is_cancelled() {
                log_warn!(
                    event = "merge_cancelled",
                    values_written = report.values_written,
                    "Merge cancelled"
                );
                return Err(MergeError::Cancelled {
                    values_written: report.values_written,
                });
            }

            let cursor = frontier.extract_min()?;
            let value = cursor.peek();
            writeln!(sink, "{}", value).map_err(|error| self.write_error(error))?;
            report.values_written += 1;
            log_trace!(
                event = "value_written",
                value,
                source_id = cursor.source_id(),
                "Writing value to output"
            );

            match cursor.advance() {
                Advance::Active(cursor) => {
                    log_trace!(
                        event = "cursor_advanced",
                        value = cursor.peek(),
                        source_id = cursor.source_id(),
                        values_read = cursor.values_read(),
                        "Read next value"
                    );
                    frontier.insert(cursor);
                }
                Advance::Exhausted(done) => {
                    if let Some(ref failure) = done.failure {
                        log_warn!(
                            event = "cursor_failed",
                            source_id = %done.source_id,
                            values_read = done.values_read,
                            failure = %failure,
                            "Source ended on a read failure, closed"
                        );
                    } else {
                        log_debug!(
                            event = "cursor_exhausted",
                            source_id = %done.source_id,
                            values_read = done.values_read,
                            "No more data, closed source"
                        );
                    }
                    report.exhausted.push(ExhaustedSource {
                        source_id: done.source_id,
                        values_read: done.values_read,
                        failure: done.failure,
                    });
                }
            }

            if self.progress_interval > 0 && report.values_written % self.progress_interval == 0 {
                log_info!(
                    event = "merge_progress",
                    values_written = report.values_written,
                    active_sources = frontier.len(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Merge progress"
                );
            }
        }

        sink.flush().map_err(|error| self.write_error(error))?;

        report.elapsed_ms = start_time.elapsed().as_millis() as u64;
        log_info!(
            event = "merge_completed",
            values_written = report.values_written,
            sources_opened = report.sources_opened,
            sink = %self.sink_label,
            elapsed_ms = report.elapsed_ms,
            "Merge process completed"
        );

        Ok(report)
    }

    fn initialize<R, I>(&self, sources: I, report: &mut MergeReport) -> Frontier<R>
    where
        R: BufRead,
        I: IntoIterator<Item = SourceCandidate<R>>,
    {
        let sources = sources.into_iter();
        let mut frontier = Frontier::with_capacity(sources.size_hint().0);

        log_info!(event = "merge_initializing", "Opening sources and initializing frontier");

        for (ordinal, (source_id, opened)) in sources.enumerate() {
            report.sources_seen += 1;

            let opened = opened.map_err(|error| MergeError::SourceOpen {
                source_id: source_id.clone(),
                error,
            });
            match opened.and_then(|reader| Cursor::open(source_id.clone(), ordinal, reader)) {
                Ok(cursor) => {
                    log_debug!(
                        event = "cursor_opened",
                        source_id = cursor.source_id(),
                        first_value = cursor.peek(),
                        "Added source to frontier"
                    );
                    frontier.insert(cursor);
                    report.sources_opened += 1;
                }
                Err(err) => {
                    log_info!(
                        event = "source_skipped",
                        source_id = %source_id,
                        reason = %err,
                        "Skipping source"
                    );
                    report.skipped.push(SkippedSource {
                        source_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        frontier
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    fn write_error(&self, error: io::Error) -> MergeError {
        MergeError::SinkWrite {
            target: self.sink_label.clone(),
            error,
        }
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}
