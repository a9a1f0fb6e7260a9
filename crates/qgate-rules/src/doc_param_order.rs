//! Rule checking that `@param` tags follow the declared parameter order.
//!
//! Type parameters are documented as `@param <T>`, value parameters (or
//! record components) as `@param name`. Comments using `{@inheritDoc}` are
//! skipped.
//!
//! # Configuration
//!
//! - `type_params`: `"first"` (default) or `"last"`, where `<T>` tags belong

use qgate_core::{
    ConfigError, DocTag, FileContext, NodeId, NodeKind, Rule, RuleConfig, Severity, Suggestion,
    Violation,
};

/// Rule code for doc-param-order.
pub const CODE: &str = "QG003";

/// Rule name for doc-param-order.
pub const NAME: &str = "doc-param-order";

/// Where type parameter tags go relative to value parameter tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeParamPosition {
    /// `@param <T>` before value parameters.
    #[default]
    First,
    /// `@param <T>` after value parameters.
    Last,
}

/// Checks `@param` tag order against the declaration.
#[derive(Debug, Clone)]
pub struct DocParamOrder {
    type_params: TypeParamPosition,
    severity: Severity,
}

impl Default for DocParamOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocParamOrder {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_params: TypeParamPosition::First,
            severity: Severity::Error,
        }
    }

    /// Sets where type parameter tags are expected.
    #[must_use]
    pub fn type_params(mut self, position: TypeParamPosition) -> Self {
        self.type_params = position;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Creates the rule from its `[rules.doc-param-order]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if `type_params` is neither
    /// `"first"` nor `"last"`.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let position = match config.get_str("type_params", "first") {
            "first" => TypeParamPosition::First,
            "last" => TypeParamPosition::Last,
            other => {
                return Err(ConfigError::InvalidOption {
                    rule: NAME.to_string(),
                    key: "type_params".to_string(),
                    message: format!("expected \"first\" or \"last\", got \"{other}\""),
                })
            }
        };
        Ok(Self::new().type_params(position))
    }
}

fn render(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}

impl Rule for DocParamOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "@param tags must list type and value parameters in declaration order"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &'static [NodeKind] {
        &[
            NodeKind::Constructor,
            NodeKind::Method,
            NodeKind::Class,
            NodeKind::Interface,
            NodeKind::Record,
        ]
    }

    fn check_node(&self, ctx: &FileContext<'_>, node: NodeId) -> Vec<Violation> {
        let tree = ctx.tree;
        let Some(decl) = tree.get(node).and_then(|n| n.decl()) else {
            return Vec::new();
        };
        let Some(doc) = tree.doc_comment(node) else {
            return Vec::new();
        };
        if doc.has_inline_tag("inheritDoc") {
            return Vec::new();
        }

        let type_params = decl.type_params.iter().map(|t| format!("<{t}>"));
        let values = if tree[node].kind == NodeKind::Record {
            &decl.components
        } else {
            &decl.params
        };
        let declared: Vec<String> = match self.type_params {
            TypeParamPosition::First => type_params.chain(values.iter().cloned()).collect(),
            TypeParamPosition::Last => values.iter().cloned().chain(type_params).collect(),
        };

        let tags: Vec<&DocTag> = doc.tags_named("param").collect();
        let documented: Vec<String> = tags.iter().map(|t| t.argument().to_string()).collect();
        if documented == declared {
            return Vec::new();
        }

        let mismatch = declared
            .iter()
            .zip(&documented)
            .position(|(d, t)| d != t)
            .unwrap_or_else(|| declared.len().min(documented.len()));

        let location = match tags.get(mismatch) {
            Some(tag) => {
                let column = ctx
                    .content
                    .lines()
                    .nth(tag.line.saturating_sub(1))
                    .and_then(|l| l.find("@param"))
                    .map_or(1, |c| c + 1);
                ctx.location_at(tag.line, column)
            }
            None => ctx.location(tree[node].span),
        };

        let message = format!(
            "@param tags of {} `{}` (line {}) do not follow its declaration: expected {}, found {}",
            tree[node].kind,
            decl.name,
            tree[node].span.line,
            render(&declared),
            render(&documented),
        );
        vec![
            Violation::new(CODE, NAME, self.severity, location, message).with_suggestion(
                Suggestion::new("Write one @param tag per parameter, in declaration order"),
            ),
        ]
    }
}
