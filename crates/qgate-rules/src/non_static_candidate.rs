//! Rule flagging instance methods that could be static.
//!
//! # Rationale
//!
//! A method that touches no instance state hides the fact that it is a pure
//! function of its arguments. Making it static documents that and lets
//! callers use it without an instance.
//!
//! A method uses instance state when it mentions `this` or `super`, reads an
//! instance field (of its type, its record components, or an enclosing
//! non-static outer class) not shadowed by a parameter or local, or calls an
//! unqualified method that is not declared exclusively `static` in its type.
//!
//! # Configuration
//!
//! - `exempt_annotations`: Annotations that exempt a method (default:
//!   `Override`, `Test`, `ParameterizedTest`, `RepeatedTest`, `TestFactory`,
//!   `Before`, `After`, `BeforeEach`, `AfterEach`)

use std::collections::BTreeSet;

use qgate_core::{
    BlockKind, ConfigError, Declaration, FileContext, NodeId, NodeKind, Rule, RuleConfig,
    Severity, Suggestion, SyntaxTree, Violation,
};

/// Rule code for non-static-candidate.
pub const CODE: &str = "QG005";

/// Rule name for non-static-candidate.
pub const NAME: &str = "non-static-candidate";

const DEFAULT_EXEMPT: &[&str] = &[
    "Override",
    "Test",
    "ParameterizedTest",
    "RepeatedTest",
    "TestFactory",
    "Before",
    "After",
    "BeforeEach",
    "AfterEach",
];

/// Flags instance methods that use no instance state.
#[derive(Debug, Clone)]
pub struct NonStaticCandidate {
    exempt_annotations: Vec<String>,
    severity: Severity,
}

impl Default for NonStaticCandidate {
    fn default() -> Self {
        Self::new()
    }
}

impl NonStaticCandidate {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exempt_annotations: DEFAULT_EXEMPT.iter().map(|a| (*a).to_string()).collect(),
            severity: Severity::Error,
        }
    }

    /// Replaces the exempt annotation names.
    #[must_use]
    pub fn exempt_annotations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt_annotations = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Creates the rule from its `[rules.non-static-candidate]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if `exempt_annotations` is not
    /// an array of strings.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let Some(value) = config.options.get("exempt_annotations") else {
            return Ok(Self::new());
        };
        let names = value
            .as_array()
            .filter(|items| items.iter().all(toml::Value::is_str))
            .and_then(|_| config.get_str_array("exempt_annotations"))
            .ok_or_else(|| ConfigError::InvalidOption {
                rule: NAME.to_string(),
                key: "exempt_annotations".to_string(),
                message: "expected an array of annotation names".to_string(),
            })?;
        Ok(Self::new().exempt_annotations(names))
    }

    fn is_exempt(&self, decl: &Declaration) -> bool {
        let modifiers = &decl.modifiers;
        modifiers.is_static
            || modifiers.is_abstract
            || modifiers.is_native
            || self
                .exempt_annotations
                .iter()
                .any(|a| modifiers.has_annotation(a))
    }
}

/// Instance field names visible from a type, including outer instances.
fn instance_fields(tree: &SyntaxTree, ty: NodeId) -> BTreeSet<String> {
    let mut fields = BTreeSet::new();
    let mut current = Some(ty);
    while let Some(id) = current {
        if let Some(decl) = tree[id].decl() {
            fields.extend(decl.components.iter().cloned());
        }
        fields.extend(
            tree.members(id)
                .filter(|(_, m)| {
                    m.kind == NodeKind::Field && m.decl().is_some_and(|d| !d.modifiers.is_static)
                })
                .map(|(_, m)| m.name().to_string()),
        );
        current = outer_instance(tree, id);
    }
    fields
}

/// The type whose instance an inner class is bound to, if any.
fn outer_instance(tree: &SyntaxTree, ty: NodeId) -> Option<NodeId> {
    if tree[ty].decl().map_or(true, |d| d.modifiers.is_static) {
        return None;
    }
    for ancestor in tree.ancestors(ty) {
        let node = &tree[ancestor];
        if node.kind.is_type_declaration() {
            return Some(ancestor);
        }
        let static_context = node.block_kind() == Some(BlockKind::StaticInitializer)
            || (node.kind == NodeKind::Method
                && node.decl().is_some_and(|d| d.modifiers.is_static));
        if static_context {
            return None;
        }
    }
    None
}

/// True if every method named `name` in `ty` is static (and one exists).
fn only_static_methods(tree: &SyntaxTree, ty: NodeId, name: &str) -> bool {
    let mut found = false;
    for (_, member) in tree.members(ty) {
        if member.kind != NodeKind::Method || member.name() != name {
            continue;
        }
        if !member.decl().is_some_and(|d| d.modifiers.is_static) {
            return false;
        }
        found = true;
    }
    found
}

/// True if `ty` declares a non-static method called `name`.
fn declares_instance_method(tree: &SyntaxTree, ty: NodeId, name: &str) -> bool {
    tree.members(ty).any(|(_, m)| {
        m.kind == NodeKind::Method
            && m.name() == name
            && m.decl().is_some_and(|d| !d.modifiers.is_static)
    })
}

/// True if `name` is a non-static member class of `ty` or of an outer instance.
fn is_inner_class(tree: &SyntaxTree, ty: NodeId, name: &str) -> bool {
    let mut current = Some(ty);
    while let Some(id) = current {
        let found = tree.members(id).any(|(_, m)| {
            m.kind == NodeKind::Class
                && m.name() == name
                && m.decl().is_some_and(|d| !d.modifiers.is_static)
        });
        if found {
            return true;
        }
        current = outer_instance(tree, id);
    }
    false
}

impl Rule for NonStaticCandidate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Methods that use no instance state should be static"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[NodeKind::Method]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let tree = ctx.tree;
        let method = &tree[node];
        let Some(decl) = method.decl() else {
            return Vec::new();
        };
        let Some(body) = &decl.body else {
            return Vec::new();
        };
        let Some(owner) = tree.enclosing_type(node) else {
            return Vec::new();
        };
        if !matches!(
            tree[owner].kind,
            NodeKind::Class | NodeKind::Enum | NodeKind::Record
        ) {
            return Vec::new();
        }
        if self.is_exempt(decl) || body.only_unsupported_throw || body.uses_this {
            return Vec::new();
        }

        let fields = instance_fields(tree, owner);
        let reads_field = body
            .identifiers
            .iter()
            .chain(&body.nested_identifiers)
            .any(|ident| {
                fields.contains(ident)
                    && !decl.params.contains(ident)
                    && !body.locals.contains(ident)
            });
        if reads_field {
            return Vec::new();
        }

        let calls_instance_method = body
            .unqualified_calls
            .iter()
            .any(|call| !only_static_methods(tree, owner, call))
            || body
                .nested_calls
                .iter()
                .any(|call| declares_instance_method(tree, owner, call));
        if calls_instance_method {
            return Vec::new();
        }

        let creates_inner = body
            .instantiations
            .iter()
            .any(|new| is_inner_class(tree, owner, &new.type_name));
        if creates_inner {
            return Vec::new();
        }

        vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(method.span),
            format!("method `{}` uses no instance state", decl.name),
        )
        .with_suggestion(Suggestion::new(format!(
            "Declare `{}` as static",
            decl.name
        )))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, lines};

    fn run(src: &str) -> Vec<Violation> {
        check(&NonStaticCandidate::new(), src)
    }

    #[test]
    fn test_pure_method_is_flagged() {
        let violations = run(r"
class Calc {
    int twice(int x) {
        return x * 2;
    }
}
");
        assert_eq!(lines(&violations), vec![3]);
        assert!(violations[0].message.contains("`twice`"));
    }

    #[test]
    fn test_field_access_uses_instance_state() {
        let violations = run(r"
class Counter {
    private int count;
    int next() {
        return count + 1;
    }
    int viaThis() {
        return this.count;
    }
}
");
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_shadowed_field_does_not_count() {
        let violations = run(r"
class Counter {
    private int count;
    int param(int count) {
        return count;
    }
    int local() {
        int count = 3;
        return count;
    }
}
");
        assert_eq!(lines(&violations), vec![4, 7]);
    }

    #[test]
    fn test_unqualified_calls() {
        let violations = run(r"
class Service {
    private static int helper() { return 1; }
    private int state() { return 2; }
    int usesStatic() { return helper(); }
    int usesInstance() { return state(); }
    String inherited() { return toString(); }
}
");
        // state() and usesStatic() themselves touch nothing.
        assert_eq!(lines(&violations), vec![4, 5]);
    }

    #[test]
    fn test_exemptions() {
        let violations = run(r#"
abstract class Base {
    abstract void run();
    native void raw();
    static int util() { return 0; }
    @Override
    public String toString() { return "base"; }
    @Test
    void testSomething() { int a = 1; }
    void unsupported() {
        throw new UnsupportedOperationException("not yet");
    }
}
"#);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_interface_methods_are_ignored() {
        let violations = run("interface Api {\n    default int one() { return 1; }\n}\n");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_record_components_are_instance_state() {
        let violations = run(r"
final record Point(int x, int y) {
    int sum() { return x + y; }
}
");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_outer_instance_fields() {
        let violations = run(r"
class Outer {
    private int size;
    class Inner {
        int read() { return size; }
    }
    static class Nested {
        int read() { return size; }
    }
}
");
        assert_eq!(lines(&violations), vec![8]);
    }

    #[test]
    fn test_inner_class_creation_uses_instance() {
        let violations = run(r"
class Outer {
    class Inner {}
    static class Nested {}
    Object make() { return new Inner(); }
    Object plain() { return new Nested(); }
}
");
        assert_eq!(lines(&violations), vec![6]);
    }

    #[test]
    fn test_local_class_reading_outer_field() {
        let violations = run(r"
class Counter {
    private int count;
    int viaLocal() {
        class Reader {
            int get() { return count; }
        }
        return new Reader().get();
    }
    int pure() {
        class Twice {
            int of(int x) { return x * 2; }
        }
        return new Twice().of(3);
    }
}
");
        assert_eq!(lines(&violations), vec![10, 12]);
    }

    #[test]
    fn test_local_class_calling_outer_method() {
        let violations = run(r"
class Service {
    private int state;
    int read() { return state; }
    Runnable task() {
        class Task implements Runnable {
            public void run() { read(); }
        }
        return new Task();
    }
}
");
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_custom_exempt_annotations() {
        let src = "class A {\n    @Provides\n    int value() { return 1; }\n}\n";
        assert_eq!(run(src).len(), 1);
        let rule = NonStaticCandidate::new().exempt_annotations(["Provides"]);
        assert!(check(&rule, src).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config: RuleConfig =
            toml::from_str(r#"exempt_annotations = ["Inject"]"#).expect("toml");
        let rule = NonStaticCandidate::from_config(&config).expect("valid");
        assert_eq!(rule.exempt_annotations, vec!["Inject".to_string()]);

        let config: RuleConfig = toml::from_str("exempt_annotations = 3").expect("toml");
        assert!(NonStaticCandidate::from_config(&config).is_err());
    }
}
