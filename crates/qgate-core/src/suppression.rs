//! Inline suppression directives.
//!
//! Supports comments like:
//! ```text
//! // @checkstyle declaration-order (3 lines)
//! int[] x = {1}; // @checkstyle brace-structure (1 line)
//! /* @checkstyle record-shape|mandatory-final-class (10 lines) */
//! ```
//!
//! A directive suppresses the named rules on its own line and the following
//! `N - 1` lines.

use std::collections::HashMap;
use tracing::warn;

/// Marker that introduces a directive inside a comment.
pub const MARKER: &str = "@checkstyle";

/// A parsed suppression directive for a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionDirective {
    /// Rule name the directive applies to.
    pub rule: String,
    /// Line the directive is written on (1-indexed).
    pub anchor: usize,
    /// Number of lines covered, starting at the anchor.
    pub length: usize,
}

impl SuppressionDirective {
    /// Last line covered by this directive.
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.anchor + self.length - 1
    }

    /// Returns true if `line` falls in the window.
    #[must_use]
    pub fn covers(&self, line: usize) -> bool {
        (self.anchor..=self.last_line()).contains(&line)
    }
}

/// Why a directive was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// No rule token after the marker.
    #[error("missing rule name")]
    MissingRule,
    /// No `(N lines)` clause.
    #[error("missing parenthesized line count")]
    MissingCount,
    /// Count is not a positive integer.
    #[error("invalid line count `{0}`")]
    InvalidCount(String),
    /// Unit word is neither `line` nor `lines`.
    #[error("unknown unit `{0}`, expected `line` or `lines`")]
    UnknownUnit(String),
}

/// Per-file map from rule name to suppressed line windows.
#[derive(Debug, Clone, Default)]
pub struct SuppressionIndex {
    windows: HashMap<String, Vec<SuppressionDirective>>,
}

impl SuppressionIndex {
    /// Scans raw source text and indexes every well-formed directive.
    ///
    /// Malformed directives are logged and skipped.
    #[must_use]
    pub fn build(content: &str) -> Self {
        let mut index = Self::default();
        for (i, line) in content.lines().enumerate() {
            let line_no = i + 1;
            match parse_directive(line, line_no) {
                Some(Ok(directives)) => {
                    for d in directives {
                        index.windows.entry(d.rule.clone()).or_default().push(d);
                    }
                }
                Some(Err(e)) => {
                    warn!("Ignoring malformed suppression at line {}: {}", line_no, e);
                }
                None => {}
            }
        }
        index
    }

    /// Returns true iff a window for exactly `rule` contains `line`.
    #[must_use]
    pub fn is_suppressed(&self, rule: &str, line: usize) -> bool {
        self.windows
            .get(rule)
            .is_some_and(|ws| ws.iter().any(|w| w.covers(line)))
    }

    /// Number of indexed directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.values().map(Vec::len).sum()
    }

    /// Returns true if no directive was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Extracts the comment portion of a line, if it has one.
fn comment_text(line: &str) -> Option<&str> {
    if let Some(pos) = comment_start(line) {
        return Some(&line[pos + 2..]);
    }
    line.trim_start().strip_prefix('*')
}

/// Byte offset of the first `//` or `/*` outside string and char literals.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'/' && matches!(bytes.get(i + 1), Some(b'/' | b'*')) => {
                return Some(i);
            }
            None => {}
        }
        i += 1;
    }
    None
}

/// Parses a directive from one source line.
///
/// Returns `None` when the line carries no marker at all.
fn parse_directive(
    line: &str,
    line_no: usize,
) -> Option<Result<Vec<SuppressionDirective>, DirectiveError>> {
    let comment = comment_text(line)?;
    let pos = comment.find(MARKER)?;
    let rest = &comment[pos + MARKER.len()..];
    Some(parse_body(rest, line_no))
}

fn parse_body(rest: &str, line_no: usize) -> Result<Vec<SuppressionDirective>, DirectiveError> {
    let rest = rest.trim_start();
    let token_end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    let token = &rest[..token_end];
    let rules: Vec<&str> = token.split('|').filter(|s| !s.is_empty()).collect();
    if rules.is_empty() {
        return Err(DirectiveError::MissingRule);
    }

    let clause = rest[token_end..]
        .trim_start()
        .strip_prefix('(')
        .ok_or(DirectiveError::MissingCount)?;
    let close = clause.find(')').ok_or(DirectiveError::MissingCount)?;
    let mut words = clause[..close].split_whitespace();

    let count = words.next().ok_or(DirectiveError::MissingCount)?;
    let length: usize = match count.parse() {
        Ok(n) if n > 0 => n,
        _ => return Err(DirectiveError::InvalidCount(count.to_string())),
    };

    let unit = words.next().unwrap_or("");
    if !matches!(unit, "line" | "lines") || words.next().is_some() {
        return Err(DirectiveError::UnknownUnit(unit.to_string()));
    }

    Ok(rules
        .into_iter()
        .map(|rule| SuppressionDirective {
            rule: rule.to_string(),
            anchor: line_no,
            length,
        })
        .collect())
}
