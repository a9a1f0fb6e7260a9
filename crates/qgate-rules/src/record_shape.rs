//! Rule enforcing the shape of record declarations.
//!
//! A record must be declared `final`, must have at least one component and
//! must not declare instance fields. Compact constructors are fine.

use qgate_core::{FileContext, NodeId, NodeKind, Rule, Severity, Suggestion, Violation};

/// Rule code for record-shape.
pub const CODE: &str = "QG004";

/// Rule name for record-shape.
pub const NAME: &str = "record-shape";

/// Checks record declarations.
#[derive(Debug, Clone)]
pub struct RecordShape {
    severity: Severity,
}

impl Default for RecordShape {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordShape {
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

impl Rule for RecordShape {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Records must be final, have components and hold no instance fields"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::Record]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let tree = ctx.tree;
        let record = &tree[node];
        let Some(decl) = record.decl() else {
            return Vec::new();
        };
        let mut violations = Vec::new();

        if !decl.modifiers.is_final {
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(record.span),
                    format!("record `{}` must be declared final", decl.name),
                )
                .with_suggestion(Suggestion::new("Add the `final` modifier")),
            );
        }

        if decl.components.is_empty() {
            violations.push(Violation::new(
                CODE,
                NAME,
                self.severity,
                ctx.location(record.span),
                format!("record `{}` declares no components", decl.name),
            ));
        }

        for (_, member) in tree.members(node) {
            let is_instance_field = member.kind == NodeKind::Field
                && member.decl().is_some_and(|d| !d.modifiers.is_static);
            if is_instance_field {
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(member.span),
                        format!(
                            "record `{}` declares instance field `{}`",
                            decl.name,
                            member.name()
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Turn the field into a record component or make it static",
                    )),
                );
            }
        }

        violations
    }
}
