//! Java tree builder using Tree-sitter.

use qgate_core::{
    AccessLevel, ArrayInit, BlockKind, Declaration, DocComment, Modifiers, NodeData, NodeId,
    NodeKind, Span, SyntaxTree, TreeBuildError, TreeBuilder,
};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use crate::body;

/// Builds qgate syntax trees from Java source.
pub struct JavaTreeBuilder {
    language: Language,
}

impl JavaTreeBuilder {
    /// Creates a new Java tree builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }
}

impl Default for JavaTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder for JavaTreeBuilder {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn build(&self, source: &str) -> Result<SyntaxTree, TreeBuildError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| TreeBuildError::new(format!("failed to load java grammar: {e}")))?;

        let src = source.as_bytes();
        let parsed = parser
            .parse(src, None)
            .ok_or_else(|| TreeBuildError::new("parser produced no tree"))?;
        let root = parsed.root_node();
        if root.is_error() {
            return Err(TreeBuildError::new(format!(
                "no java declarations could be recognized (syntax error at line {})",
                root.start_position().row + 1
            )));
        }

        let mut mapper = Mapper {
            src,
            lines: source.lines().collect(),
            tree: SyntaxTree::new(),
        };
        mapper.map_members(root, None, Container::TopLevel);
        if root.has_error() && mapper.tree.is_empty() {
            return Err(TreeBuildError::new(
                "no java declarations could be recognized",
            ));
        }
        Ok(mapper.tree)
    }
}

/// Node text as UTF-8, or an empty string for invalid byte ranges.
pub(crate) fn text<'a>(node: Node<'_>, src: &'a [u8]) -> &'a str {
    src.get(node.start_byte()..node.end_byte())
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .unwrap_or("")
}

pub(crate) fn is_comment(node: Node<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}

fn span_of(node: Node<'_>) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(start.row + 1, start.column + 1, end.row + 1, end.column)
}

/// What kind of body the members being mapped live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    TopLevel,
    Class,
    Interface,
    Record,
    Enum,
}

impl Container {
    fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Interface => Self::Interface,
            NodeKind::Record => Self::Record,
            NodeKind::Enum => Self::Enum,
            _ => Self::Class,
        }
    }
}

struct Mapper<'s> {
    src: &'s [u8],
    lines: Vec<&'s str>,
    tree: SyntaxTree,
}

impl Mapper<'_> {
    /// Maps the members of a `program`, `class_body`, `interface_body` or
    /// `enum_body_declarations` node.
    fn map_members(&mut self, body: Node<'_>, parent: Option<NodeId>, container: Container) {
        let mut pending_doc: Option<Node<'_>> = None;
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if is_comment(child) {
                if text(child, self.src).starts_with("/**") {
                    pending_doc = Some(child);
                }
                continue;
            }
            let doc = pending_doc.take();

            let mapped = match child.kind() {
                "class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "record_declaration" => self.map_type(child, parent, container),
                "constructor_declaration" | "compact_constructor_declaration" => {
                    self.map_constructor(child, parent, container)
                }
                "method_declaration" => self.map_method(child, parent, container),
                "field_declaration" | "constant_declaration" => {
                    self.map_fields(child, parent, container);
                    None
                }
                "static_initializer" => {
                    self.map_initializer(child, parent, BlockKind::StaticInitializer);
                    None
                }
                "block" => {
                    self.map_initializer(child, parent, BlockKind::InstanceInitializer);
                    None
                }
                "enum_body_declarations" => {
                    self.map_members(child, parent, container);
                    None
                }
                "enum_body" => {
                    self.map_enum_body(child, parent);
                    None
                }
                "ERROR" => {
                    debug!(
                        line = child.start_position().row + 1,
                        "skipping unrecognized top-level text"
                    );
                    None
                }
                _ => None,
            };

            if let (Some(id), Some(doc)) = (mapped, doc) {
                self.attach_doc(id, doc);
            }
        }
    }

    fn map_enum_body(&mut self, body: Node<'_>, parent: Option<NodeId>) {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "enum_body_declarations" => self.map_members(child, parent, Container::Enum),
                // Constant arguments and constant class bodies may hold array initializers.
                "enum_constant" => {
                    if let Some(parent) = parent {
                        self.collect_nested(child, parent);
                    }
                }
                _ => {}
            }
        }
    }

    fn attach_doc(&mut self, owner: NodeId, doc: Node<'_>) {
        let comment = DocComment::parse(text(doc, self.src), doc.start_position().row + 1);
        self.tree.push(
            Some(owner),
            NodeKind::DocComment,
            span_of(doc),
            NodeData::Doc(comment),
        );
    }

    fn map_type(
        &mut self,
        node: Node<'_>,
        parent: Option<NodeId>,
        container: Container,
    ) -> Option<NodeId> {
        let kind = match node.kind() {
            "class_declaration" => NodeKind::Class,
            "interface_declaration" => NodeKind::Interface,
            "enum_declaration" => NodeKind::Enum,
            "record_declaration" => NodeKind::Record,
            _ => return None,
        };

        let mut modifiers = self.modifiers(node, container);
        // Member interfaces, enums and records have no outer instance.
        if container != Container::TopLevel
            && (kind != NodeKind::Class || container == Container::Interface)
        {
            modifiers.is_static = true;
        }

        let components = if kind == NodeKind::Record {
            node.child_by_field_name("parameters")
                .map(|p| self.param_names(p))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let decl = Declaration {
            name: self.field_text(node, "name"),
            modifiers,
            type_params: self.type_params(node),
            components,
            ..Declaration::default()
        };
        let id = self
            .tree
            .push(parent, kind, span_of(node), NodeData::Decl(decl));

        let body = node.child_by_field_name("body");
        if has_direct_error(node) || body.is_some_and(has_direct_error) {
            self.tree.mark_recovered(id);
        }
        if let Some(body) = body {
            if kind == NodeKind::Enum {
                self.map_enum_body(body, Some(id));
            } else {
                self.map_members(body, Some(id), Container::for_kind(kind));
            }
        }
        Some(id)
    }

    fn map_constructor(
        &mut self,
        node: Node<'_>,
        parent: Option<NodeId>,
        container: Container,
    ) -> Option<NodeId> {
        let mut modifiers = self.modifiers(node, container);
        if container == Container::Enum && !has_access_keyword(node, self.src) {
            modifiers.access = AccessLevel::Private;
        }

        let is_compact = node.kind() == "compact_constructor_declaration";
        let params = if is_compact {
            parent
                .and_then(|p| self.tree[p].decl().map(|d| d.components.clone()))
                .unwrap_or_default()
        } else {
            node.child_by_field_name("parameters")
                .map(|p| self.param_names(p))
                .unwrap_or_default()
        };

        let body = node.child_by_field_name("body");
        let decl = Declaration {
            name: self.field_text(node, "name"),
            modifiers,
            type_params: self.type_params(node),
            params,
            is_compact,
            body: body.map(|b| body::summarize(b, self.src)),
            ..Declaration::default()
        };
        let id = self.push_member(parent?, NodeKind::Constructor, node, decl);
        if let Some(body) = body {
            self.map_body(body, id);
        }
        Some(id)
    }

    fn map_method(
        &mut self,
        node: Node<'_>,
        parent: Option<NodeId>,
        container: Container,
    ) -> Option<NodeId> {
        let mut modifiers = self.modifiers(node, container);
        let body = node.child_by_field_name("body");
        if container == Container::Interface && body.is_none() && !modifiers.is_static {
            modifiers.is_abstract = true;
        }

        let decl = Declaration {
            name: self.field_text(node, "name"),
            modifiers,
            type_params: self.type_params(node),
            params: node
                .child_by_field_name("parameters")
                .map(|p| self.param_names(p))
                .unwrap_or_default(),
            body: body.map(|b| body::summarize(b, self.src)),
            ..Declaration::default()
        };
        let id = self.push_member(parent?, NodeKind::Method, node, decl);
        if let Some(body) = body {
            self.map_body(body, id);
        }
        Some(id)
    }

    fn map_fields(&mut self, node: Node<'_>, parent: Option<NodeId>, container: Container) {
        let Some(parent) = parent else {
            return;
        };
        let mut modifiers = self.modifiers(node, container);
        if container == Container::Interface {
            modifiers.is_static = true;
            modifiers.is_final = true;
        }

        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let decl = Declaration {
                name: self.field_text(declarator, "name"),
                modifiers: modifiers.clone(),
                ..Declaration::default()
            };
            let id = self.push_member(parent, NodeKind::Field, declarator, decl);
            if let Some(value) = declarator.child_by_field_name("value") {
                self.collect_nested(value, id);
            }
        }
    }

    fn map_initializer(&mut self, node: Node<'_>, parent: Option<NodeId>, kind: BlockKind) {
        let Some(parent) = parent else {
            return;
        };
        let id = self
            .tree
            .push(Some(parent), NodeKind::Block, span_of(node), NodeData::Block(kind));
        if node.has_error() {
            self.tree.mark_recovered(id);
        }
        self.collect_nested(node, id);
    }

    fn map_body(&mut self, body: Node<'_>, owner: NodeId) {
        let id = self.tree.push(
            Some(owner),
            NodeKind::Block,
            span_of(body),
            NodeData::Block(BlockKind::Body),
        );
        self.collect_nested(body, id);
    }

    fn push_member(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        node: Node<'_>,
        decl: Declaration,
    ) -> NodeId {
        let id = self
            .tree
            .push(Some(parent), kind, span_of(node), NodeData::Decl(decl));
        if node.has_error() {
            self.tree.mark_recovered(id);
        }
        id
    }

    /// Finds array initializers and local type declarations below `node`.
    fn collect_nested(&mut self, node: Node<'_>, parent: NodeId) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "array_initializer" => self.map_array(child, parent),
                "class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "record_declaration" => {
                    self.map_type(child, Some(parent), Container::Class);
                }
                _ => self.collect_nested(child, parent),
            }
        }
    }

    fn map_array(&mut self, node: Node<'_>, parent: NodeId) {
        let start = node.start_position();
        let anchor_column = self.lines.get(start.row).map_or(1, |line| {
            line.len() - line.trim_start().len() + 1
        });

        let intro_line = node.parent().and_then(|p| {
            if matches!(p.kind(), "variable_declarator" | "array_creation_expression") {
                node.prev_sibling().map(|s| s.end_position().row + 1)
            } else {
                None
            }
        });

        let mut cursor = node.walk();
        let elements: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|c| !is_comment(*c))
            .collect();

        let layout = ArrayInit {
            anchor_column,
            intro_line,
            elements: elements.iter().map(|e| span_of(*e)).collect(),
        };
        let id = self.tree.push(
            Some(parent),
            NodeKind::ArrayInit,
            span_of(node),
            NodeData::ArrayInit(layout),
        );
        if node.has_error() {
            self.tree.mark_recovered(id);
        }
        for element in elements {
            if element.kind() == "array_initializer" {
                self.map_array(element, id);
            } else {
                self.collect_nested(element, id);
            }
        }
    }

    fn modifiers(&self, node: Node<'_>, container: Container) -> Modifiers {
        let mut modifiers = Modifiers::default();
        if container == Container::Interface {
            modifiers.access = AccessLevel::Public;
        }

        let mut cursor = node.walk();
        let Some(mods) = node
            .children(&mut cursor)
            .find(|c| c.kind() == "modifiers")
        else {
            return modifiers;
        };

        let mut cursor = mods.walk();
        for m in mods.children(&mut cursor) {
            match m.kind() {
                "marker_annotation" | "annotation" => {
                    let name = self.field_text(m, "name");
                    if !name.is_empty() {
                        modifiers.annotations.push(name);
                    }
                }
                _ => match text(m, self.src) {
                    "public" => modifiers.access = AccessLevel::Public,
                    "protected" => modifiers.access = AccessLevel::Protected,
                    "private" => modifiers.access = AccessLevel::Private,
                    "final" => modifiers.is_final = true,
                    "abstract" => modifiers.is_abstract = true,
                    "static" => modifiers.is_static = true,
                    "native" => modifiers.is_native = true,
                    _ => {}
                },
            }
        }
        modifiers
    }

    fn type_params(&self, node: Node<'_>) -> Vec<String> {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        let mut names = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            let mut inner = param.walk();
            if let Some(id) = param
                .named_children(&mut inner)
                .find(|c| matches!(c.kind(), "type_identifier" | "identifier"))
            {
                names.push(text(id, self.src).to_string());
            };
        }
        names
    }

    /// Names of a `formal_parameters` list, skipping receiver parameters.
    fn param_names(&self, params: Node<'_>) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            let name = match param.kind() {
                "formal_parameter" => param.child_by_field_name("name"),
                "spread_parameter" => {
                    let mut inner = param.walk();
                    let found = param
                        .named_children(&mut inner)
                        .find(|c| c.kind() == "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"));
                    found
                }
                _ => None,
            };
            if let Some(name) = name {
                names.push(text(name, self.src).to_string());
            }
        }
        names
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| text(n, self.src).to_string())
            .unwrap_or_default()
    }
}

fn has_direct_error(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| c.is_error() || c.is_missing());
    found
}

fn has_access_keyword(node: Node<'_>, src: &[u8]) -> bool {
    let mut cursor = node.walk();
    let Some(mods) = node
        .children(&mut cursor)
        .find(|c| c.kind() == "modifiers")
    else {
        return false;
    };
    let mut cursor = mods.walk();
    let found = mods
        .children(&mut cursor)
        .any(|m| matches!(text(m, src), "public" | "protected" | "private"));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(src: &str) -> SyntaxTree {
        JavaTreeBuilder::new().build(src).expect("tree")
    }

    fn find(tree: &SyntaxTree, kind: NodeKind, name: &str) -> NodeId {
        tree.pre_order()
            .into_iter()
            .find(|id| tree[*id].kind == kind && tree[*id].name() == name)
            .unwrap_or_else(|| panic!("no {kind} named {name}"))
    }

    #[test]
    fn maps_types_and_members_in_source_order() {
        let tree = build(
            "public final class Foo {\n\
             \x20   private int x;\n\
             \x20   public Foo() {}\n\
             \x20   void run() {}\n\
             \x20   static class Inner {}\n\
             }\n",
        );
        let foo = find(&tree, NodeKind::Class, "Foo");
        let kinds: Vec<NodeKind> = tree.members(foo).map(|(_, n)| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Field,
                NodeKind::Constructor,
                NodeKind::Method,
                NodeKind::Class
            ]
        );

        let decl = tree[foo].decl().expect("decl");
        assert!(decl.modifiers.is_final);
        assert_eq!(decl.modifiers.access, AccessLevel::Public);
        assert_eq!(tree[foo].span.line, 1);

        let run = find(&tree, NodeKind::Method, "run");
        assert_eq!(
            tree[run].decl().map(|d| d.modifiers.access),
            Some(AccessLevel::PackagePrivate)
        );
        assert_eq!(tree[run].span.line, 4);
    }

    #[test]
    fn interface_members_default_to_public_abstract() {
        let tree = build("interface Shape {\n    double area();\n    int SIDES = 0;\n}\n");
        let area = find(&tree, NodeKind::Method, "area");
        let modifiers = &tree[area].decl().expect("decl").modifiers;
        assert_eq!(modifiers.access, AccessLevel::Public);
        assert!(modifiers.is_abstract);

        let sides = find(&tree, NodeKind::Field, "SIDES");
        assert!(tree[sides].decl().expect("decl").modifiers.is_static);
    }

    #[test]
    fn attaches_javadoc_to_following_declaration() {
        let tree = build(
            "class A {\n\
             \x20   /**\n\
             \x20    * @param <T> type\n\
             \x20    * @param value the value\n\
             \x20    */\n\
             \x20   <T> void put(T value) {}\n\
             }\n",
        );
        let put = find(&tree, NodeKind::Method, "put");
        let doc = tree.doc_comment(put).expect("doc");
        let args: Vec<&str> = doc.tags_named("param").map(|t| t.argument()).collect();
        assert_eq!(args, vec!["<T>", "value"]);
        assert_eq!(doc.tags[0].line, 3);

        let decl = tree[put].decl().expect("decl");
        assert_eq!(decl.type_params, vec!["T"]);
        assert_eq!(decl.params, vec!["value"]);
    }

    #[test]
    fn plain_block_comment_is_not_documentation() {
        let tree = build("class A {\n    /* note */\n    void m() {}\n}\n");
        let m = find(&tree, NodeKind::Method, "m");
        assert!(tree.doc_comment(m).is_none());
    }

    #[test]
    fn records_expose_components_and_compact_constructor() {
        let tree = build(
            "record Point(int x, int y) {\n    Point {\n        assert x >= 0;\n    }\n}\n",
        );
        let point = find(&tree, NodeKind::Record, "Point");
        assert_eq!(
            tree[point].decl().map(|d| d.components.clone()),
            Some(vec!["x".to_string(), "y".to_string()])
        );
        let ctor = find(&tree, NodeKind::Constructor, "Point");
        let decl = tree[ctor].decl().expect("decl");
        assert!(decl.is_compact);
        assert_eq!(decl.params, vec!["x", "y"]);
    }

    #[test]
    fn one_field_node_per_declarator() {
        let tree = build("class A {\n    private int a, b = 2;\n}\n");
        let a = find(&tree, NodeKind::Class, "A");
        let names: Vec<&str> = tree.members(a).map(|(_, n)| n.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn enum_constructor_is_private_by_default() {
        let tree = build("enum Color {\n    RED, GREEN;\n    Color() {}\n}\n");
        let ctor = find(&tree, NodeKind::Constructor, "Color");
        assert_eq!(
            tree[ctor].decl().map(|d| d.modifiers.access),
            Some(AccessLevel::Private)
        );
    }

    #[test]
    fn summarizes_method_bodies() {
        let tree = build(
            "class A {\n\
             \x20   private int count;\n\
             \x20   private A(int n) {}\n\
             \x20   A() { this(0); }\n\
             \x20   int m(int p) {\n\
             \x20       int local = p + count;\n\
             \x20       helper();\n\
             \x20       other.call();\n\
             \x20       return new A(1).hashCode();\n\
             \x20   }\n\
             }\n",
        );
        let m = find(&tree, NodeKind::Method, "m");
        let body = tree[m].decl().and_then(|d| d.body.as_ref()).expect("body");
        assert!(body.identifiers.contains("count"));
        assert!(body.identifiers.contains("other"));
        assert!(!body.identifiers.contains("call"));
        assert!(body.locals.contains("local"));
        assert!(body.unqualified_calls.contains("helper"));
        assert!(!body.unqualified_calls.contains("call"));
        assert!(!body.uses_this);
        assert_eq!(body.instantiations.len(), 1);
        assert_eq!(body.instantiations[0].type_name, "A");
        assert_eq!(body.instantiations[0].arity, 1);

        let delegating = tree
            .pre_order()
            .into_iter()
            .filter(|id| tree[*id].kind == NodeKind::Constructor)
            .find_map(|id| {
                tree[id]
                    .decl()
                    .and_then(|d| d.body.as_ref())
                    .filter(|b| !b.delegations.is_empty())
                    .map(|b| b.delegations.clone())
            });
        assert_eq!(delegating, Some(vec![1]));
    }

    #[test]
    fn local_class_references_are_summarized_apart() {
        let tree = build(
            "class A {\n\
             \x20   private int count;\n\
             \x20   int m() {\n\
             \x20       class Reader {\n\
             \x20           int own;\n\
             \x20           int get(int step) { reset(); return count + own + step; }\n\
             \x20       }\n\
             \x20       return new Reader().get(1);\n\
             \x20   }\n\
             }\n",
        );
        let m = find(&tree, NodeKind::Method, "m");
        let body = tree[m].decl().and_then(|d| d.body.as_ref()).expect("body");
        assert!(!body.identifiers.contains("count"));
        assert!(body.nested_identifiers.contains("count"));
        assert!(!body.nested_identifiers.contains("own"));
        assert!(!body.nested_identifiers.contains("step"));
        assert!(body.nested_calls.contains("reset"));
        assert!(!body.unqualified_calls.contains("reset"));
        assert!(!body.locals.contains("own"));
    }

    #[test]
    fn detects_unsupported_operation_stub() {
        let tree = build(
            "class A {\n    void m() {\n        throw new UnsupportedOperationException(\"no\");\n    }\n}\n",
        );
        let m = find(&tree, NodeKind::Method, "m");
        let body = tree[m].decl().and_then(|d| d.body.as_ref()).expect("body");
        assert!(body.only_unsupported_throw);
    }

    #[test]
    fn this_reference_is_recorded() {
        let tree = build("class A {\n    int x;\n    int m() { return this.x; }\n}\n");
        let m = find(&tree, NodeKind::Method, "m");
        let body = tree[m].decl().and_then(|d| d.body.as_ref()).expect("body");
        assert!(body.uses_this);
    }

    #[test]
    fn array_initializer_layout() {
        let tree = build(
            "class A {\n\
             \x20   static final int[] VALUES = {\n\
             \x20       1,\n\
             \x20       2\n\
             \x20   };\n\
             }\n",
        );
        let init = tree
            .pre_order()
            .into_iter()
            .find(|id| tree[*id].kind == NodeKind::ArrayInit)
            .expect("array initializer");
        let layout = tree[init].array_init().expect("layout");
        assert_eq!(layout.anchor_column, 5);
        assert_eq!(layout.intro_line, Some(2));
        assert_eq!(layout.elements.len(), 2);
        assert_eq!(layout.elements[0].line, 3);
        assert_eq!(layout.elements[0].column, 9);

        let span = tree[init].span;
        assert_eq!((span.line, span.end_line, span.end_column), (2, 5, 5));

        let field = tree[init].parent.expect("parent");
        assert_eq!(tree[field].kind, NodeKind::Field);
    }

    #[test]
    fn initializer_blocks_are_mapped() {
        let tree = build("class A {\n    static { int[] a = {1}; }\n    { int b = 0; }\n}\n");
        let blocks: Vec<Option<BlockKind>> = tree
            .pre_order()
            .into_iter()
            .filter(|id| tree[*id].kind == NodeKind::Block)
            .map(|id| tree[id].block_kind())
            .collect();
        assert_eq!(
            blocks,
            vec![
                Some(BlockKind::StaticInitializer),
                Some(BlockKind::InstanceInitializer)
            ]
        );
    }

    #[test]
    fn syntax_error_marks_member_recovered() {
        let tree = build("class A {\n    void broken() { int x = ; }\n    void ok() {}\n}\n");
        let broken = find(&tree, NodeKind::Method, "broken");
        let ok = find(&tree, NodeKind::Method, "ok");
        assert!(tree[broken].recovered);
        assert!(!tree[ok].recovered);
    }

    #[test]
    fn unrecognizable_text_is_an_error() {
        let result = JavaTreeBuilder::new().build("}}} this is not java {{{\n");
        assert!(result.is_err());
        assert!(JavaTreeBuilder::new().build("").is_ok());
    }

    #[test]
    fn reports_extensions_without_dot() {
        let builder = JavaTreeBuilder::new();
        assert_eq!(builder.language_id(), "java");
        assert_eq!(builder.extensions(), &["java"]);
    }
}
