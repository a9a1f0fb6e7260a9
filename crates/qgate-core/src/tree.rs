//! Arena-backed syntax tree consumed by the rule engine.
//!
//! A [`SyntaxTree`] owns every [`SyntaxNode`] of one source file. Nodes refer
//! to each other through [`NodeId`] handles, so parent links never own their
//! target and the whole tree can be shared read-only across rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Index;

/// Handle of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of node kinds the engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// `class Foo { ... }`
    Class,
    /// `interface Foo { ... }`
    Interface,
    /// `record Foo(...) { ... }`
    Record,
    /// `enum Foo { ... }`
    Enum,
    /// Constructor, including the compact record form.
    Constructor,
    /// Method declaration.
    Method,
    /// One field declarator.
    Field,
    /// Initializer block or method/constructor body.
    Block,
    /// `{ a, b, c }` array initializer expression.
    ArrayInit,
    /// `/** ... */` documentation comment attached to a declaration.
    DocComment,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Class,
        Self::Interface,
        Self::Record,
        Self::Enum,
        Self::Constructor,
        Self::Method,
        Self::Field,
        Self::Block,
        Self::ArrayInit,
        Self::DocComment,
    ];

    /// Number of kinds; sizes per-kind dispatch tables.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index of this kind, for table lookups.
    #[must_use]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Returns true for class, interface, record and enum declarations.
    #[must_use]
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Record | Self::Enum
        )
    }

    /// Human-readable label used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Record => "record",
            Self::Enum => "enum",
            Self::Constructor => "constructor",
            Self::Method => "method",
            Self::Field => "field",
            Self::Block => "block",
            Self::ArrayInit => "array initializer",
            Self::DocComment => "doc comment",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Source range of a node. Lines and columns are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// First line.
    pub line: usize,
    /// First column.
    pub column: usize,
    /// Last line.
    pub end_line: usize,
    /// Column of the last character.
    pub end_column: usize,
}

impl Span {
    /// Creates a span from explicit positions.
    #[must_use]
    pub fn new(line: usize, column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Returns true if the span starts and ends on the same line.
    #[must_use]
    pub fn is_single_line(&self) -> bool {
        self.line == self.end_line
    }
}

/// Visibility of a declaration, ordered from most to least visible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// No modifier.
    #[default]
    PackagePrivate,
    /// `private`
    Private,
}

impl AccessLevel {
    /// Rank used by ordering checks; lower sorts first.
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Protected => write!(f, "protected"),
            Self::PackagePrivate => write!(f, "package-private"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// Modifiers and annotations of a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Effective access level.
    pub access: AccessLevel,
    /// `final`
    pub is_final: bool,
    /// `abstract`
    pub is_abstract: bool,
    /// `static`
    pub is_static: bool,
    /// `native`
    pub is_native: bool,
    /// Annotation names as written, without the `@`.
    pub annotations: Vec<String>,
}

impl Modifiers {
    /// Checks for an annotation by simple name, ignoring any package qualifier.
    #[must_use]
    pub fn has_annotation(&self, simple_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.rsplit('.').next() == Some(simple_name))
    }
}

/// A `new Type(...)` expression found in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instantiation {
    /// Simple name of the instantiated type.
    pub type_name: String,
    /// Number of constructor arguments.
    pub arity: usize,
}

/// Def-use summary of a method or constructor body.
///
/// Tree adapters fill this in so rules can reason about references without
/// walking expressions themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySummary {
    /// Simple identifiers used as expressions (not member selections).
    pub identifiers: BTreeSet<String>,
    /// Whether `this` or `super` appears outside a constructor call.
    pub uses_this: bool,
    /// Names of methods invoked without a receiver.
    pub unqualified_calls: BTreeSet<String>,
    /// Argument counts of `this(...)` constructor calls.
    pub delegations: Vec<usize>,
    /// `new T(...)` expressions.
    pub instantiations: Vec<Instantiation>,
    /// Names of locals, lambda parameters and catch parameters.
    pub locals: BTreeSet<String>,
    /// The body consists of one `throw new UnsupportedOperationException(...)`.
    pub only_unsupported_throw: bool,
    /// Identifiers referenced from the bodies of local classes, minus their
    /// own fields, parameters and locals.
    pub nested_identifiers: BTreeSet<String>,
    /// Receiverless method calls made from the bodies of local classes.
    pub nested_calls: BTreeSet<String>,
}

/// Payload of a declaration node (types, constructors, methods, fields).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    /// Declared identifier.
    pub name: String,
    /// Modifiers and annotations.
    pub modifiers: Modifiers,
    /// Generic type parameter names, in declaration order.
    pub type_params: Vec<String>,
    /// Value parameter names, in declaration order.
    pub params: Vec<String>,
    /// Record component names.
    pub components: Vec<String>,
    /// Compact record constructor.
    pub is_compact: bool,
    /// Body summary for methods and constructors with a body.
    pub body: Option<BodySummary>,
}

/// Which kind of code a [`NodeKind::Block`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `static { ... }`
    StaticInitializer,
    /// `{ ... }` directly in a type body.
    InstanceInitializer,
    /// Body of a method or constructor.
    Body,
}

/// Layout data of an array initializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayInit {
    /// Indentation column of the line holding the opening brace.
    pub anchor_column: usize,
    /// Line of the token introducing the initializer (`=` or `new T[]`), if any.
    pub intro_line: Option<usize>,
    /// Element spans, in source order.
    pub elements: Vec<Span>,
}

/// A `@tag body` line of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name without `@` (e.g. `param`).
    pub name: String,
    /// Text after the tag name.
    pub body: String,
    /// Source line of the tag.
    pub line: usize,
}

impl DocTag {
    /// First whitespace-delimited word of the body (the parameter for `@param`).
    #[must_use]
    pub fn argument(&self) -> &str {
        self.body.split_whitespace().next().unwrap_or("")
    }
}

/// Structured documentation comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Text lines with comment decoration removed.
    pub lines: Vec<String>,
    /// Block tags in source order.
    pub tags: Vec<DocTag>,
}

impl DocComment {
    /// Parses a raw `/** ... */` comment starting at `start_line`.
    #[must_use]
    pub fn parse(raw: &str, start_line: usize) -> Self {
        let inner = raw.trim();
        let inner = inner.strip_prefix("/**").unwrap_or(inner);
        let inner = inner.strip_suffix("*/").unwrap_or(inner);

        let mut doc = Self::default();
        for (offset, raw_line) in inner.lines().enumerate() {
            let trimmed = raw_line.trim_start();
            let text = trimmed.strip_prefix('*').unwrap_or(trimmed);
            let text = text.strip_prefix(' ').unwrap_or(text).trim_end();

            if let Some(tag) = text.strip_prefix('@') {
                let (name, body) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
                if !name.is_empty() {
                    doc.tags.push(DocTag {
                        name: name.to_string(),
                        body: body.trim().to_string(),
                        line: start_line + offset,
                    });
                }
            }
            doc.lines.push(text.to_string());
        }
        doc
    }

    /// Iterates over the tags with the given name.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }

    /// Returns true if any line contains the inline tag `{@name}`.
    #[must_use]
    pub fn has_inline_tag(&self, name: &str) -> bool {
        let needle = format!("{{@{name}}}");
        self.lines.iter().any(|l| l.contains(&needle))
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeData {
    /// No payload.
    #[default]
    Empty,
    /// Type, constructor, method or field declaration.
    Decl(Declaration),
    /// Block flavour.
    Block(BlockKind),
    /// Array initializer layout.
    ArrayInit(ArrayInit),
    /// Documentation comment.
    Doc(DocComment),
}

/// One node of a [`SyntaxTree`].
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Node kind.
    pub kind: NodeKind,
    /// Source range.
    pub span: Span,
    /// Enclosing node, if any.
    pub parent: Option<NodeId>,
    /// Child nodes in source order.
    pub children: Vec<NodeId>,
    /// Kind-specific payload.
    pub data: NodeData,
    /// Set when the parser had to recover from a syntax error inside this node.
    pub recovered: bool,
}

impl SyntaxNode {
    /// Returns the declaration payload, if any.
    #[must_use]
    pub fn decl(&self) -> Option<&Declaration> {
        match &self.data {
            NodeData::Decl(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the array initializer payload, if any.
    #[must_use]
    pub fn array_init(&self) -> Option<&ArrayInit> {
        match &self.data {
            NodeData::ArrayInit(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the documentation payload, if any.
    #[must_use]
    pub fn doc(&self) -> Option<&DocComment> {
        match &self.data {
            NodeData::Doc(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the block flavour, if this is a block.
    #[must_use]
    pub fn block_kind(&self) -> Option<BlockKind> {
        match &self.data {
            NodeData::Block(k) => Some(*k),
            _ => None,
        }
    }

    /// Declared name, or an empty string for anonymous nodes.
    #[must_use]
    pub fn name(&self) -> &str {
        self.decl().map_or("", |d| d.name.as_str())
    }
}

/// Syntax tree of one source file.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    roots: Vec<NodeId>,
}

impl SyntaxTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node under `parent` (or as a new root) and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn push(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
        span: Span,
        data: NodeData,
    ) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent,
            children: Vec::new(),
            data,
            recovered: false,
        });
        match parent {
            Some(p) => self.nodes[p.index()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Flags a node as parse-recovered.
    pub fn mark_recovered(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.recovered = true;
        }
    }

    /// Looks a node up by handle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    /// Top-level nodes in source order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the strict ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(|n| n.parent), |p| {
            self.get(*p).and_then(|n| n.parent)
        })
    }

    /// Nearest enclosing class, interface, record or enum declaration.
    #[must_use]
    pub fn enclosing_type(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|a| self[*a].kind.is_type_declaration())
    }

    /// Documentation comment attached to a declaration.
    #[must_use]
    pub fn doc_comment(&self, id: NodeId) -> Option<&DocComment> {
        self.get(id)?
            .children
            .iter()
            .find_map(|c| self[*c].doc())
    }

    /// Direct children of `id` that carry a declaration payload.
    pub fn members(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &SyntaxNode)> + '_ {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |c| (*c, &self[*c]))
            .filter(|(_, n)| n.decl().is_some())
    }

    /// All nodes in pre-order (parents before children, siblings in source order).
    #[must_use]
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        order
    }
}

impl Index<NodeId> for SyntaxTree {
    type Output = SyntaxNode;

    fn index(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }
}
