//! Rule enforcing member declaration order.
//!
//! # Rationale
//!
//! Readers expect to find how an object is built before what it does, and
//! the public surface before the internals. Constructors come first, then
//! methods; within each group members go from public to private.
//!
//! Fields, initializer blocks and nested types are not ranked.

use qgate_core::{
    AccessLevel, FileContext, NodeId, NodeKind, Rule, Severity, Suggestion, Violation,
};

/// Rule code for declaration-order.
pub const CODE: &str = "QG001";

/// Rule name for declaration-order.
pub const NAME: &str = "declaration-order";

/// (kind rank, access rank); smaller sorts first.
type Rank = (u8, u8);

/// Checks that constructors and methods appear in rank order.
#[derive(Debug, Clone)]
pub struct DeclarationOrder {
    severity: Severity,
}

impl Default for DeclarationOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationOrder {
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

fn rank(kind: NodeKind, access: AccessLevel) -> Option<Rank> {
    let kind_rank = match kind {
        NodeKind::Constructor => 0,
        NodeKind::Method => 1,
        _ => return None,
    };
    Some((kind_rank, access.rank()))
}

impl Rule for DeclarationOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Constructors before methods, each group ordered public to private"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[
            NodeKind::Class,
            NodeKind::Interface,
            NodeKind::Enum,
            NodeKind::Record,
        ]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let tree = ctx.tree;
        let mut violations = Vec::new();
        let mut highest: Option<(Rank, NodeId)> = None;

        for (id, member) in tree.members(node) {
            if member.recovered {
                continue;
            }
            let Some(decl) = member.decl() else {
                continue;
            };
            let Some(current) = rank(member.kind, decl.modifiers.access) else {
                continue;
            };

            match highest {
                Some((max, max_id)) if current < max => {
                    let previous = &tree[max_id];
                    let previous_access = previous
                        .decl()
                        .map_or(AccessLevel::default(), |d| d.modifiers.access);
                    violations.push(
                        Violation::new(
                            CODE,
                            NAME,
                            self.severity,
                            ctx.location(member.span),
                            format!(
                                "{} {} `{}` is declared after {} {} `{}` (line {})",
                                decl.modifiers.access,
                                member.kind,
                                decl.name,
                                previous_access,
                                previous.kind,
                                previous.name(),
                                previous.span.line,
                            ),
                        )
                        .with_suggestion(Suggestion::new(
                            "Declare constructors before methods, and order each group \
                             public, protected, package-private, private",
                        )),
                    );
                }
                Some((max, _)) if current == max => {}
                _ => highest = Some((current, id)),
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, lines};

    #[test]
    fn test_sorted_class_passes() {
        let violations = check(
            &DeclarationOrder::new(),
            r"
class Sorted {
    private int field;
    public Sorted() {}
    Sorted(int x) {}
    private Sorted(long x) {}
    public void a() {}
    protected void b() {}
    void c() {}
    private void d() {}
}
",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_constructor_after_method() {
        let violations = check(
            &DeclarationOrder::new(),
            r"
class Foo {
    private void helper() {}
    public Foo() {}
}
",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(lines(&violations), vec![4]);
        assert!(violations[0].message.contains("constructor `Foo`"));
        assert!(violations[0].message.contains("line 3"));
    }

    #[test]
    fn test_reversed_order_passes() {
        let violations = check(
            &DeclarationOrder::new(),
            r"
class Foo {
    public Foo() {}
    private void helper() {}
}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_adjacent_transposition_reports_once() {
        let violations = check(
            &DeclarationOrder::new(),
            r"
class Foo {
    public void a() {}
    void c() {}
    protected void b() {}
    private void d() {}
}
",
        );
        assert_eq!(lines(&violations), vec![5]);
    }

    #[test]
    fn test_fields_and_nested_types_are_not_ranked() {
        let violations = check(
            &DeclarationOrder::new(),
            r"
class Foo {
    private void a() {}
    public static final int X = 1;
    public static class Inner {}
    private void b() {}
}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_nested_container_has_own_maximum() {
        let violations = check(
            &DeclarationOrder::new(),
            r"
class Outer {
    private void last() {}
    static class Inner {
        public Inner() {}
        public void run() {}
    }
    private void alsoLast() {}
}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_interface_members_are_public_by_default() {
        let violations = check(
            &DeclarationOrder::new(),
            r"
interface Api {
    private void helper() {}
    void run();
}
",
        );
        assert_eq!(lines(&violations), vec![4]);
    }
}
