//! Sortedness check for merged output
//!
//! Streams a merged file once and reports whether it is ascending. Cheaper
//! than re-merging when all you want to know is whether an output is sound.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// First adjacent pair that breaks ascending order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderViolation {
    /// 1-based line of the smaller, later value
    pub line: u64,
    pub previous: i64,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifySummary {
    pub values: u64,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub first_violation: Option<OrderViolation>,
}

impl VerifySummary {
    pub fn is_sorted(&self) -> bool {
        self.first_violation.is_none()
    }
}

/// Check a merged file. Blank lines are ignored; any other unparsable line is
/// an error since merged output is always one integer per line.
pub fn verify_sorted(path: &Path) -> Result<VerifySummary> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    verify_reader(BufReader::with_capacity(1024 * 1024, file))
}

pub fn verify_reader<R: BufRead>(reader: R) -> Result<VerifySummary> {
    let mut summary = VerifySummary::default();
    let mut previous: Option<i64> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line_no = idx as u64 + 1;
        let value: i64 = trimmed
            .parse()
            .with_context(|| format!("Line {} is not an integer: {:?}", line_no, trimmed))?;

        if let Some(prev) = previous {
            if value < prev && summary.first_violation.is_none() {
                summary.first_violation = Some(OrderViolation {
                    line: line_no,
                    previous: prev,
                    value,
                });
            }
        }

        summary.values += 1;
        summary.min = Some(summary.min.map_or(value, |m| m.min(value)));
        summary.max = Some(summary.max.map_or(value, |m| m.max(value)));
        previous = Some(value);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_output() {
        let summary = verify_reader("1\n2\n2\n4\n5\n9\n".as_bytes()).unwrap();
        assert!(summary.is_sorted());
        assert_eq!(summary.values, 6);
        assert_eq!(summary.min, Some(1));
        assert_eq!(summary.max, Some(9));
    }

    #[test]
    fn test_reports_first_violation() {
        let summary = verify_reader("1\n5\n3\n2\n".as_bytes()).unwrap();
        assert_eq!(
            summary.first_violation,
            Some(OrderViolation {
                line: 3,
                previous: 5,
                value: 3,
            })
        );
        assert_eq!(summary.values, 4);
    }

    #[test]
    fn test_empty_output_is_sorted() {
        let summary = verify_reader("".as_bytes()).unwrap();
        assert!(summary.is_sorted());
        assert_eq!(summary.values, 0);
        assert_eq!(summary.min, None);
    }

    #[test]
    fn test_garbage_line_is_error() {
        assert!(verify_reader("1\nnope\n".as_bytes()).is_err());
    }
}
