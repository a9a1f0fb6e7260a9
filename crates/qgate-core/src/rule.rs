//! Rule trait for defining checks.

use crate::context::FileContext;
use crate::tree::{NodeId, NodeKind};
use crate::types::{Severity, Violation};

/// A check over syntax tree nodes.
///
/// A rule subscribes to a set of node kinds through [`Rule::interests`]; the
/// traversal engine calls [`Rule::check_node`] once for every node of those
/// kinds, in pre-order. Rules must not keep state between calls: anything a
/// check needs while scanning a container lives in locals of that call.
///
/// # Example
///
/// ```ignore
/// use qgate_core::{FileContext, NodeId, NodeKind, Rule, Violation};
///
/// pub struct NoEmptyEnums;
///
/// impl Rule for NoEmptyEnums {
///     fn name(&self) -> &'static str { "no-empty-enums" }
///     fn code(&self) -> &'static str { "QG100" }
///     fn interests(&self) -> &'static [NodeKind] { &[NodeKind::Enum] }
///
///     fn check_node(&self, ctx: &FileContext, node: NodeId) -> Vec<Violation> {
///         let enum_node = &ctx.tree[node];
///         // ...
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "declaration-order").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "QG001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Node kinds this rule wants to be called for.
    fn interests(&self) -> &'static [NodeKind];

    /// Checks a single node and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The file being walked, including its tree
    /// * `node` - Handle of the visited node; ancestors are reachable through `ctx.tree`
    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
