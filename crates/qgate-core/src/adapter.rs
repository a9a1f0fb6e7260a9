//! Boundary to the parser that turns source text into a [`SyntaxTree`].
//!
//! `TreeBuilder` is the extension point for languages: implement it to feed
//! a new language's declarations into the rule engine.

use crate::tree::SyntaxTree;

/// Failure to produce any tree for a file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TreeBuildError {
    /// What went wrong.
    pub message: String,
}

impl TreeBuildError {
    /// Creates an error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Builds syntax trees from raw source text.
pub trait TreeBuilder: Send + Sync {
    /// Language identifier (e.g., `"java"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this builder handles, without the dot (e.g., `&["java"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Builds the tree of one file.
    ///
    /// Syntax errors should be reported by flagging nodes as recovered;
    /// an `Err` means no usable tree exists at all.
    ///
    /// # Errors
    ///
    /// Returns [`TreeBuildError`] when the source cannot be parsed.
    fn build(&self, source: &str) -> Result<SyntaxTree, TreeBuildError>;
}
