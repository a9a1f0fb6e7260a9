//! Suppression filtering, deduplication and ordering of findings.

use std::collections::HashSet;

use tracing::debug;

use crate::suppression::SuppressionIndex;
use crate::types::{Report, Violation};

/// Findings of one file after suppression filtering.
#[derive(Debug, Default)]
pub struct FileFindings {
    /// Surviving violations, in no particular order.
    pub violations: Vec<Violation>,
    /// Number of findings removed by suppression directives.
    pub suppressed: usize,
}

/// Drops suppressed findings of one file.
#[must_use]
pub fn filter_file(raw: Vec<Violation>, index: &SuppressionIndex) -> FileFindings {
    let mut out = FileFindings::default();
    for v in raw {
        if index.is_suppressed(&v.rule, v.location.line) {
            debug!(
                "Suppressed {} at {}:{}",
                v.rule,
                v.location.file.display(),
                v.location.line
            );
            out.suppressed += 1;
        } else {
            out.violations.push(v);
        }
    }
    out
}

/// Merges per-file buffers into one deduplicated, ordered report.
#[must_use]
pub fn merge<I>(files: I, files_checked: usize) -> Report
where
    I: IntoIterator<Item = FileFindings>,
{
    let mut seen = HashSet::new();
    let mut violations: Vec<Violation> = files
        .into_iter()
        .flat_map(|f| f.violations)
        .filter(|v| {
            seen.insert((
                v.rule.clone(),
                v.location.file.clone(),
                v.location.line,
                v.location.column,
                v.message.clone(),
            ))
        })
        .collect();

    violations.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.rule.cmp(&b.rule))
            .then(a.location.column.cmp(&b.location.column))
    });

    Report {
        violations,
        files_checked,
    }
}
