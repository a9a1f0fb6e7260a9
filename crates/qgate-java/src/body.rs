//! Def-use summaries of method and constructor bodies.

use qgate_core::{BodySummary, Instantiation};
use tree_sitter::Node;

use crate::java::text;

/// Local type declarations have their own members and summaries.
const LOCAL_TYPES: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

/// Summarizes the references made by a `block` or `constructor_body`.
pub(crate) fn summarize(body: Node<'_>, src: &[u8]) -> BodySummary {
    let mut summary = BodySummary::default();
    visit(body, None, src, &mut summary);
    summary.only_unsupported_throw = only_unsupported_throw(body, src);
    summary
}

fn visit(node: Node<'_>, field: Option<&str>, src: &[u8], s: &mut BodySummary) {
    let kind = node.kind();
    if LOCAL_TYPES.contains(&kind) {
        // Local records, enums and interfaces are static contexts.
        if kind == "class_declaration" {
            local_class(node, src, s);
        }
        return;
    }

    match kind {
        "this" | "super" => {
            s.uses_this = true;
            return;
        }
        "identifier" => {
            // Declared names and member selections are not references.
            if !matches!(field, Some("name" | "field")) {
                s.identifiers.insert(text(node, src).to_string());
            }
            return;
        }
        "explicit_constructor_invocation" => {
            let args = node.child_by_field_name("arguments");
            if node
                .child_by_field_name("constructor")
                .is_some_and(|c| c.kind() == "this")
            {
                s.delegations.push(arity(args));
            }
            if let Some(object) = node.child_by_field_name("object") {
                visit(object, Some("object"), src, s);
            }
            if let Some(args) = args {
                visit(args, Some("arguments"), src, s);
            }
            return;
        }
        "method_invocation" => {
            if node.child_by_field_name("object").is_none() {
                if let Some(name) = node.child_by_field_name("name") {
                    s.unqualified_calls.insert(text(name, src).to_string());
                }
            }
        }
        "object_creation_expression" => {
            if let Some(ty) = node.child_by_field_name("type") {
                s.instantiations.push(Instantiation {
                    type_name: simple_type_name(text(ty, src)),
                    arity: arity(node.child_by_field_name("arguments")),
                });
            }
        }
        "variable_declarator"
        | "formal_parameter"
        | "catch_formal_parameter"
        | "resource"
        | "enhanced_for_statement"
        | "instanceof_expression" => {
            if let Some(name) = node.child_by_field_name("name") {
                s.locals.insert(text(name, src).to_string());
            }
        }
        "lambda_expression" => {
            if let Some(params) = node.child_by_field_name("parameters") {
                collect_lambda_params(params, src, s);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let child_field = cursor.field_name();
            visit(child, child_field, src, s);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

/// A local class captures the enclosing instance: keep what its body refers to.
fn local_class(node: Node<'_>, src: &[u8], s: &mut BodySummary) {
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut inner = BodySummary::default();
    visit(body, Some("body"), src, &mut inner);

    s.nested_identifiers
        .extend(inner.identifiers.difference(&inner.locals).cloned());
    s.nested_identifiers.extend(inner.nested_identifiers);
    s.nested_calls.extend(inner.unqualified_calls);
    s.nested_calls.extend(inner.nested_calls);
}

fn collect_lambda_params(params: Node<'_>, src: &[u8], s: &mut BodySummary) {
    if params.kind() == "identifier" {
        s.locals.insert(text(params, src).to_string());
        return;
    }
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                s.locals.insert(text(child, src).to_string());
            }
            "formal_parameter" | "spread_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    s.locals.insert(text(name, src).to_string());
                }
            }
            _ => {}
        }
    }
}

/// Number of arguments in an `argument_list`.
fn arity(args: Option<Node<'_>>) -> usize {
    args.map_or(0, |a| {
        let mut cursor = a.walk();
        a.named_children(&mut cursor)
            .filter(|c| !crate::java::is_comment(*c))
            .count()
    })
}

/// `a.b.Foo<Bar>` -> `Foo`
fn simple_type_name(raw: &str) -> String {
    let without_args = raw.split('<').next().unwrap_or(raw);
    without_args
        .rsplit('.')
        .next()
        .unwrap_or(without_args)
        .trim()
        .to_string()
}

fn only_unsupported_throw(body: Node<'_>, src: &[u8]) -> bool {
    let mut cursor = body.walk();
    let statements: Vec<Node<'_>> = body
        .named_children(&mut cursor)
        .filter(|c| !crate::java::is_comment(*c))
        .collect();

    let [stmt] = statements.as_slice() else {
        return false;
    };
    if stmt.kind() != "throw_statement" {
        return false;
    }
    let mut cursor = stmt.walk();
    let thrown = stmt
        .named_children(&mut cursor)
        .find(|c| !crate::java::is_comment(*c));
    thrown.is_some_and(|t| {
        t.kind() == "object_creation_expression"
            && t
                .child_by_field_name("type")
                .is_some_and(|ty| simple_type_name(text(ty, src)) == "UnsupportedOperationException")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_type_name_strips_qualifiers_and_generics() {
        assert_eq!(simple_type_name("java.util.ArrayList<String>"), "ArrayList");
        assert_eq!(simple_type_name("Outer.Inner"), "Inner");
        assert_eq!(simple_type_name("Foo"), "Foo");
    }
}
