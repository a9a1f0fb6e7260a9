//! Rule flagging protected members of final classes.
//!
//! Nothing can subclass a final class, so `protected` only widens access to
//! the package. Methods marked `@Override` keep the visibility they inherit
//! and are exempt.

use qgate_core::{
    AccessLevel, FileContext, NodeId, NodeKind, Rule, Severity, Suggestion, Violation,
};

/// Rule code for protected-in-final.
pub const CODE: &str = "QG007";

/// Rule name for protected-in-final.
pub const NAME: &str = "protected-in-final";

/// Flags `protected` members declared in a `final` type.
#[derive(Debug, Clone)]
pub struct ProtectedInFinal {
    severity: Severity,
}

impl Default for ProtectedInFinal {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtectedInFinal {
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

impl Rule for ProtectedInFinal {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Final classes must not declare protected members"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[
            NodeKind::Method,
            NodeKind::Field,
            NodeKind::Constructor,
            NodeKind::Class,
            NodeKind::Interface,
            NodeKind::Enum,
            NodeKind::Record,
        ]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let tree = ctx.tree;
        let member = &tree[node];
        let Some(decl) = member.decl() else {
            return Vec::new();
        };
        if decl.modifiers.access != AccessLevel::Protected {
            return Vec::new();
        }
        if member.kind == NodeKind::Method && decl.modifiers.has_annotation("Override") {
            return Vec::new();
        }

        let Some(owner) = member.parent.filter(|p| tree[*p].kind.is_type_declaration()) else {
            return Vec::new();
        };
        let Some(owner_decl) = tree[owner].decl() else {
            return Vec::new();
        };
        if !owner_decl.modifiers.is_final || owner_decl.modifiers.is_abstract {
            return Vec::new();
        }

        vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(member.span),
            format!(
                "protected {} `{}` in final {} `{}`",
                member.kind,
                decl.name,
                tree[owner].kind,
                owner_decl.name
            ),
        )
        .with_suggestion(Suggestion::new("Make it private or package-private"))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, lines};

    #[test]
    fn test_protected_members_of_final_class() {
        let violations = check(
            &ProtectedInFinal::new(),
            r"
public final class Vault {
    protected int balance;
    protected Vault() {}
    protected void open() {}
    protected static class Key {}
    private void close() {}
}
",
        );
        assert_eq!(lines(&violations), vec![3, 4, 5, 6]);
        assert!(violations[0].message.contains("field `balance`"));
        assert!(violations[3].message.contains("class `Key`"));
    }

    #[test]
    fn test_override_is_exempt() {
        let violations = check(
            &ProtectedInFinal::new(),
            r"
final class Impl extends Base {
    @Override
    protected void hook() {}
}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_non_final_class_is_ignored() {
        let violations = check(
            &ProtectedInFinal::new(),
            r"
class Open {
    protected void hook() {}
}
abstract class Base {
    protected abstract void run();
}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_nested_final_class() {
        let violations = check(
            &ProtectedInFinal::new(),
            r"
class Outer {
    protected void fine() {}
    static final class Inner {
        protected int count;
    }
}
",
        );
        assert_eq!(lines(&violations), vec![5]);
    }
}
