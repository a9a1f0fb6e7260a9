//! Rule flagging private constructors that nothing calls.
//!
//! A private constructor of a class is used when another constructor
//! delegates to it with `this(...)`, or a static method of the class calls
//! `new Name(...)`, with a matching argument count.

use qgate_core::{
    AccessLevel, FileContext, NodeId, NodeKind, Rule, Severity, Suggestion, Violation,
};

/// Rule code for unused-private-constructor.
pub const CODE: &str = "QG006";

/// Rule name for unused-private-constructor.
pub const NAME: &str = "unused-private-constructor";

/// Flags private constructors without callers.
#[derive(Debug, Clone)]
pub struct UnusedPrivateConstructor {
    severity: Severity,
}

impl Default for UnusedPrivateConstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl UnusedPrivateConstructor {
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

impl Rule for UnusedPrivateConstructor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Private constructors must be called from within their class"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::Constructor]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let tree = ctx.tree;
        let ctor = &tree[node];
        let Some(decl) = ctor.decl() else {
            return Vec::new();
        };
        if decl.is_compact || decl.modifiers.access != AccessLevel::Private {
            return Vec::new();
        }
        let Some(owner) = ctor.parent.filter(|p| tree[*p].kind == NodeKind::Class) else {
            return Vec::new();
        };
        let class_name = tree[owner].name();
        let arity = decl.params.len();

        let used = tree.members(owner).any(|(id, member)| {
            let Some(body) = member.decl().and_then(|d| d.body.as_ref()) else {
                return false;
            };
            match member.kind {
                NodeKind::Constructor => id != node && body.delegations.contains(&arity),
                NodeKind::Method => {
                    member.decl().is_some_and(|d| d.modifiers.is_static)
                        && body
                            .instantiations
                            .iter()
                            .any(|i| i.type_name == class_name && i.arity == arity)
                }
                _ => false,
            }
        });
        if used {
            return Vec::new();
        }

        vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(ctor.span),
            format!(
                "private constructor `{class_name}` with {arity} parameter(s) is never called"
            ),
        )
        .with_suggestion(Suggestion::new(
            "Remove the constructor, or call it from a static factory or another constructor",
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, lines};

    #[test]
    fn test_unused_private_constructor() {
        let violations = check(
            &UnusedPrivateConstructor::new(),
            r"
final class Money {
    private final long cents;
    private Money(long cents) {
        this.cents = cents;
    }
    public Money() {
        this.cents = 0;
    }
}
",
        );
        assert_eq!(lines(&violations), vec![4]);
        assert_eq!(violations[0].code, CODE);
    }

    #[test]
    fn test_delegation_with_matching_arity() {
        let violations = check(
            &UnusedPrivateConstructor::new(),
            r"
final class Money {
    private final long cents;
    private Money(long cents) {
        this.cents = cents;
    }
    public Money() {
        this(0L);
    }
}
",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_static_factory() {
        let violations = check(
            &UnusedPrivateConstructor::new(),
            r"
final class Money {
    private Money(long cents, String currency) {}
    private Money(long cents) {}
    public static Money of(long cents) {
        return new Money(cents, 1);
    }
    public Money copy() {
        return new Money(1);
    }
}
",
        );
        // Instance methods do not count, so the one-argument constructor is unused.
        assert_eq!(lines(&violations), vec![4]);
    }

    #[test]
    fn test_arity_must_match() {
        let violations = check(
            &UnusedPrivateConstructor::new(),
            r"
final class Pair {
    private Pair(int a, int b) {}
    public Pair() {
        this(1);
    }
    private Pair(int a) {
        this(a, a);
    }
}
",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_non_private_and_enum_constructors_are_ignored() {
        let violations = check(
            &UnusedPrivateConstructor::new(),
            r"
final class Open {
    Open() {}
}
enum Level {
    LOW(1);
    private Level(int value) {}
}
",
        );
        assert!(violations.is_empty());
    }
}
