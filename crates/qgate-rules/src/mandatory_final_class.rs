//! Rule requiring every class to be either `final` or `abstract`.
//!
//! Interfaces, enums and records are not checked. Nested classes are checked
//! on their own.

use qgate_core::{FileContext, NodeId, NodeKind, Rule, Severity, Suggestion, Violation};

/// Rule code for mandatory-final-class.
pub const CODE: &str = "QG008";

/// Rule name for mandatory-final-class.
pub const NAME: &str = "mandatory-final-class";

/// Requires classes to be final or abstract.
#[derive(Debug, Clone)]
pub struct MandatoryFinalClass {
    severity: Severity,
}

impl Default for MandatoryFinalClass {
    fn default() -> Self {
        Self::new()
    }
}

impl MandatoryFinalClass {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for MandatoryFinalClass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Classes must be declared final or abstract"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::Class]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let class = &ctx.tree[node];
        let Some(decl) = class.decl() else {
            return Vec::new();
        };
        if decl.modifiers.is_final || decl.modifiers.is_abstract {
            return Vec::new();
        }

        vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(class.span),
            format!("class `{}` must be final or abstract", decl.name),
        )
        .with_suggestion(Suggestion::new(
            "Declare the class final, or abstract if it is meant to be extended",
        ))]
    }
}
