//! # qgate-core
//!
//! Core rule engine for the qgate source quality gate.
//!
//! This crate holds everything between a parsed file and the final report:
//!
//! - [`SyntaxTree`], an arena of typed declaration nodes with doc comments
//! - [`SuppressionIndex`] for `@checkstyle Rule (N lines)` directives
//! - [`Rule`] trait and the [`RuleRegistry`] that dispatches by node kind
//! - [`TraversalEngine`] for the single pre-order walk per file
//! - [`Analyzer`] for discovery, parallel per-file analysis and aggregation
//!
//! ## Example
//!
//! ```ignore
//! use qgate_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .tree_builder(MyJavaParser::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let report = analyzer.analyze()?;
//! report.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
pub mod aggregator;
mod analyzer;
mod config;
mod context;
mod engine;
mod registry;
mod rule;
pub mod suppression;
pub mod tree;
mod types;

pub use adapter::{TreeBuildError, TreeBuilder};
pub use analyzer::{
    Analyzer, AnalyzerBuilder, AnalyzerError, PARSE_FAILURE_CODE, PARSE_FAILURE_NAME,
};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, SourceUnit};
pub use engine::{TraversalEngine, RULE_FAILURE_CODE, RULE_FAILURE_NAME};
pub use registry::RuleRegistry;
pub use rule::{Rule, RuleBox};
pub use suppression::SuppressionIndex;
pub use tree::{
    AccessLevel, ArrayInit, BlockKind, BodySummary, Declaration, DocComment, DocTag,
    Instantiation, Modifiers, NodeData, NodeId, NodeKind, Span, SyntaxNode, SyntaxTree,
};
pub use types::{Location, Report, Severity, Suggestion, Violation, ViolationDiagnostic};
