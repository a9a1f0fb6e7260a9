//! Ordered set of enabled rules with a per-kind dispatch table.

use crate::rule::{Rule, RuleBox};
use crate::tree::NodeKind;

/// Holds enabled rules and which of them subscribe to each node kind.
pub struct RuleRegistry {
    rules: Vec<RuleBox>,
    dispatch: [Vec<usize>; NodeKind::COUNT],
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            dispatch: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Adds a rule; it is dispatched after every rule registered before it.
    pub fn register(&mut self, rule: RuleBox) {
        let slot = self.rules.len();
        for kind in rule.interests() {
            let subscribers = &mut self.dispatch[kind.slot()];
            if !subscribers.contains(&slot) {
                subscribers.push(slot);
            }
        }
        self.rules.push(rule);
    }

    /// Rules subscribed to `kind`, in registration order.
    pub fn subscribers(&self, kind: NodeKind) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.dispatch[kind.slot()]
            .iter()
            .map(move |i| self.rules[*i].as_ref())
    }

    /// All registered rules, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Looks a rule up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules().find(|r| r.name() == name)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<RuleBox> for RuleRegistry {
    fn from_iter<I: IntoIterator<Item = RuleBox>>(iter: I) -> Self {
        let mut registry = Self::new();
        for rule in iter {
            registry.register(rule);
        }
        registry
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;
    use crate::tree::NodeId;
    use crate::types::Violation;

    struct Subscribes(&'static str, &'static [NodeKind]);

    impl Rule for Subscribes {
        fn name(&self) -> &'static str {
            self.0
        }
        fn code(&self) -> &'static str {
            "TEST"
        }
        fn interests(&self) -> &'static [NodeKind] {
            self.1
        }
        fn check_node(&self, _ctx: &FileContext<'_>, _node: NodeId) -> Vec<Violation> {
            Vec::new()
        }
    }

    #[test]
    fn dispatch_follows_interests_and_order() {
        let registry: RuleRegistry = vec![
            Box::new(Subscribes("types", &[NodeKind::Class, NodeKind::Record])) as RuleBox,
            Box::new(Subscribes("methods", &[NodeKind::Method])),
            Box::new(Subscribes("classes", &[NodeKind::Class, NodeKind::Class])),
        ]
        .into_iter()
        .collect();

        let names = |kind| {
            registry
                .subscribers(kind)
                .map(|r| r.name())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(NodeKind::Class), vec!["types", "classes"]);
        assert_eq!(names(NodeKind::Method), vec!["methods"]);
        assert!(names(NodeKind::Field).is_empty());
        assert_eq!(registry.len(), 3);
        assert!(registry.get("methods").is_some());
    }
}
