//! Rule checking the brace layout of array initializers.
//!
//! # Accepted Layouts
//!
//! ```java
//! int[] a = {1, 2, 3};
//!
//! int[] b = {
//!     1,
//!     2,
//! };
//!
//! int[] c = {
//!     1, 2,
//!     3};
//! ```
//!
//! A multi-line initializer opens on the line of its `=` or `new T[]`, has
//! nothing after the opening brace, indents every element that starts a
//! line by one level past the anchor (the indentation of the brace line), and
//! closes either right after the last element or on its own line at the
//! anchor column.
//!
//! # Configuration
//!
//! - `indent`: Columns per indentation level (default: 4)

use qgate_core::{
    ArrayInit, ConfigError, FileContext, NodeId, NodeKind, Rule, RuleConfig, Severity, Span,
    Suggestion, Violation,
};

/// Rule code for brace-structure.
pub const CODE: &str = "QG002";

/// Rule name for brace-structure.
pub const NAME: &str = "brace-structure";

const DEFAULT_INDENT: usize = 4;

/// Checks the layout of array initializer braces.
#[derive(Debug, Clone)]
pub struct BraceStructure {
    indent: usize,
    severity: Severity,
}

impl Default for BraceStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl BraceStructure {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            severity: Severity::Error,
        }
    }

    /// Sets the number of columns per indentation level.
    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Creates the rule from its `[rules.brace-structure]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if `indent` is not a positive integer.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let mut rule = Self::new();
        if let Some(value) = config.options.get("indent") {
            let indent = value
                .as_integer()
                .and_then(|i| usize::try_from(i).ok())
                .filter(|i| *i > 0)
                .ok_or_else(|| ConfigError::InvalidOption {
                    rule: NAME.to_string(),
                    key: "indent".to_string(),
                    message: format!("expected a positive integer, got {value}"),
                })?;
            rule = rule.indent(indent);
        }
        Ok(rule)
    }

    fn violation(
        &self,
        ctx: &FileContext<'_>,
        line: usize,
        column: usize,
        message: String,
    ) -> Violation {
        Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location_at(line, column),
            message,
        )
        .with_suggestion(Suggestion::new(
            "Keep the initializer on one line, or open it after `=` and put each \
             element line one indentation level deeper",
        ))
    }

    /// Returns the first layout problem of a multi-line initializer.
    fn first_problem(
        &self,
        ctx: &FileContext<'_>,
        span: Span,
        layout: &ArrayInit,
    ) -> Option<Violation> {
        let line_text = |line: usize| ctx.content.lines().nth(line.saturating_sub(1));

        if let Some(intro) = layout.intro_line {
            if intro != span.line {
                return Some(self.violation(
                    ctx,
                    span.line,
                    span.column,
                    format!("opening brace must be on line {intro}, with its `=` or `new`"),
                ));
            }
        }

        let after_brace = line_text(span.line)
            .and_then(|l| l.get(span.column..))
            .unwrap_or("");
        if !after_brace.trim().is_empty() {
            return Some(self.violation(
                ctx,
                span.line,
                span.column + 1 + (after_brace.len() - after_brace.trim_start().len()),
                "nothing may follow the opening brace on its line".to_string(),
            ));
        }

        let expected = layout.anchor_column + self.indent;
        let mut previous_end = span.line;
        for element in &layout.elements {
            if element.line > previous_end && element.column != expected {
                return Some(self.violation(
                    ctx,
                    element.line,
                    element.column,
                    format!(
                        "element at column {} should be at column {expected}",
                        element.column
                    ),
                ));
            }
            previous_end = element.end_line;
        }

        let closes_after_last = layout
            .elements
            .last()
            .is_some_and(|last| last.end_line == span.end_line);
        if closes_after_last {
            return None;
        }

        let close_column = span.end_column;
        let before_close = line_text(span.end_line)
            .and_then(|l| l.get(..close_column.saturating_sub(1)))
            .unwrap_or("");
        let own_line = before_close.trim().is_empty();
        if own_line && close_column == layout.anchor_column {
            return None;
        }

        let message = if own_line {
            format!(
                "closing brace at column {close_column} should be at column {}",
                layout.anchor_column
            )
        } else {
            "closing brace must follow the last element or sit on its own line".to_string()
        };
        Some(self.violation(ctx, span.end_line, close_column, message))
    }
}

impl Rule for BraceStructure {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Array initializer braces follow the single-line or block layout"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::ArrayInit]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let Some(init) = ctx.tree.get(node) else {
            return Vec::new();
        };
        let Some(layout) = init.array_init() else {
            return Vec::new();
        };
        if init.span.is_single_line() {
            return Vec::new();
        }
        self.first_problem(ctx, init.span, layout)
            .into_iter()
            .collect()
    }
}
