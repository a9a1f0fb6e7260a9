//! Single-pass traversal that dispatches nodes to subscribed rules.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error};

use crate::context::SourceUnit;
use crate::registry::RuleRegistry;
use crate::types::{Severity, Violation};

/// Code of the diagnostic emitted when a rule panics.
pub const RULE_FAILURE_CODE: &str = "QG900";

/// Name of the diagnostic emitted when a rule panics.
pub const RULE_FAILURE_NAME: &str = "rule-failure";

/// Walks syntax trees and collects raw (unfiltered) findings.
#[derive(Debug, Clone, Copy)]
pub struct TraversalEngine<'r> {
    registry: &'r RuleRegistry,
}

impl<'r> TraversalEngine<'r> {
    /// Creates an engine dispatching to `registry`.
    #[must_use]
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    /// Walks one file in pre-order and returns every raw finding.
    ///
    /// Parse-recovered nodes are not dispatched, but their children are.
    /// A panicking rule yields one `rule-failure` finding for that node and
    /// the walk continues.
    #[must_use]
    pub fn walk(&self, unit: &SourceUnit) -> Vec<Violation> {
        let ctx = unit.context();
        let mut findings = Vec::new();

        for id in unit.tree.pre_order() {
            let node = &unit.tree[id];
            if node.recovered {
                debug!(
                    "Skipping recovered {} at {}:{}",
                    node.kind,
                    unit.path.display(),
                    node.span.line
                );
                continue;
            }

            for rule in self.registry.subscribers(node.kind) {
                match catch_unwind(AssertUnwindSafe(|| rule.check_node(&ctx, id))) {
                    Ok(found) => findings.extend(found),
                    Err(payload) => {
                        let reason = panic_message(payload.as_ref());
                        error!(
                            "Rule {} failed on {} at {}:{}: {}",
                            rule.name(),
                            node.kind,
                            unit.path.display(),
                            node.span.line,
                            reason
                        );
                        findings.push(Violation::new(
                            RULE_FAILURE_CODE,
                            RULE_FAILURE_NAME,
                            Severity::Error,
                            ctx.location(node.span),
                            format!(
                                "Rule `{}` failed on {} `{}`: {reason}",
                                rule.name(),
                                node.kind,
                                node.name()
                            ),
                        ));
                    }
                }
            }
        }

        findings
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;
    use crate::rule::{Rule, RuleBox};
    use crate::tree::{Declaration, NodeData, NodeId, NodeKind, Span, SyntaxTree};

    struct CountMethods;

    impl Rule for CountMethods {
        fn name(&self) -> &'static str {
            "count-methods"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn interests(&self) -> &'static [NodeKind] {
            &[NodeKind::Method]
        }
        fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
            vec![Violation::new(
                self.code(),
                self.name(),
                Severity::Error,
                ctx.location(ctx.tree[node].span),
                ctx.tree[node].name().to_string(),
            )]
        }
    }

    struct Explodes;

    impl Rule for Explodes {
        fn name(&self) -> &'static str {
            "explodes"
        }
        fn code(&self) -> &'static str {
            "T002"
        }
        fn interests(&self) -> &'static [NodeKind] {
            &[NodeKind::Method]
        }
        fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
            assert!(ctx.tree[node].name() != "bad", "cannot handle bad");
            Vec::new()
        }
    }

    fn method(name: &str) -> NodeData {
        NodeData::Decl(Declaration {
            name: name.to_string(),
            ..Declaration::default()
        })
    }

    fn unit() -> SourceUnit {
        let mut tree = SyntaxTree::new();
        let class = tree.push(None, NodeKind::Class, Span::new(1, 1, 6, 2), method("A"));
        tree.push(Some(class), NodeKind::Method, Span::new(2, 5, 2, 20), method("first"));
        tree.push(Some(class), NodeKind::Method, Span::new(3, 5, 3, 20), method("bad"));
        let broken = tree.push(Some(class), NodeKind::Method, Span::new(4, 5, 4, 20), method("broken"));
        tree.mark_recovered(broken);
        tree.push(Some(class), NodeKind::Method, Span::new(5, 5, 5, 20), method("last"));
        SourceUnit::new("A.java", "class A {\n\n\n\n\n}", tree)
    }

    #[test]
    fn dispatches_in_source_order_and_skips_recovered() {
        let registry: RuleRegistry = vec![Box::new(CountMethods) as RuleBox].into_iter().collect();
        let findings = TraversalEngine::new(&registry).walk(&unit());
        let names: Vec<&str> = findings.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(names, vec!["first", "bad", "last"]);
    }

    #[test]
    fn panicking_rule_becomes_single_diagnostic() {
        let registry: RuleRegistry = vec![Box::new(Explodes) as RuleBox, Box::new(CountMethods)]
            .into_iter()
            .collect();
        let findings = TraversalEngine::new(&registry).walk(&unit());

        let failures: Vec<&Violation> = findings
            .iter()
            .filter(|v| v.rule == RULE_FAILURE_NAME)
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].location.line, 3);
        assert!(failures[0].message.contains("explodes"));
        assert!(failures[0].message.contains("cannot handle bad"));

        // The other rule still saw every method.
        assert_eq!(findings.iter().filter(|v| v.rule == "count-methods").count(), 3);
    }
}
