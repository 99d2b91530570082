//! Diagnostics side channel for the merge engine.
//!
//! All events use target "kway_merge" and carry an `event` field. The library
//! never installs a subscriber; the `kway-merge` binary does.
//!
//! Diagnostics are informational only: nothing here feeds back into control
//! flow or output content.
//!
//! - `event`: snake_case event name (required)
//! - `source_id`: file name of the input involved, when there is one
//! - per-value events are `trace`, cursor lifecycle is `debug`, run-level
//!   milestones are `info`

/// Target for all merge diagnostics.
pub(crate) const MERGE_TARGET: &str = "kway_merge";

macro_rules! log_info {
    ($($field:tt)*) => {
        ::tracing::info!(target: $crate::observability::MERGE_TARGET, $($field)*)
    };
}

macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::MERGE_TARGET, $($field)*)
    };
}

macro_rules! log_trace {
    ($($field:tt)*) => {
        ::tracing::trace!(target: $crate::observability::MERGE_TARGET, $($field)*)
    };
}

macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::MERGE_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_trace;
pub(crate) use log_warn;
