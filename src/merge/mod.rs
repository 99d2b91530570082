//! Streaming K-Way Merge
//!
//! Merges k pre-sorted integer sources into one sorted stream while holding
//! only one lookahead value per source.
//!
//! ## Strategy
//!
//! 1. **Open**: one `Cursor` per source, reading its first value
//! 2. **Seed**: every cursor that produced a value enters the `Frontier`
//! 3. **Merge**: pop the minimum, write it, advance, push back if not exhausted
//! 4. **Finish**: frontier empty, flush the sink
//!
//! ## Memory Usage
//!
//! O(k): one cursor (reader buffer plus one i64) per source still active.
//! Open input handles equal `Frontier::len()` plus the cursor being written.

pub mod cursor;
pub mod engine;
pub mod frontier;

pub use cursor::{Advance, Cursor, Exhausted};
pub use engine::{MergeEngine, SourceCandidate, DEFAULT_PROGRESS_INTERVAL};
pub use frontier::Frontier;

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::report::MergeReport;

/// Merge named in-memory or streaming readers with default engine settings
pub fn merge_readers<R, W>(sources: Vec<(String, R)>, sink: &mut W) -> Result<MergeReport>
where
    R: BufRead,
    W: Write,
{
    MergeEngine::new().run(sources.into_iter().map(|(id, r)| (id, Ok(r))), sink)
}
