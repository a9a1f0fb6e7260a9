//! Core analyzer for orchestrating a run.

use crate::adapter::TreeBuilder;
use crate::aggregator::{self, FileFindings};
use crate::config::Config;
use crate::context::SourceUnit;
use crate::engine::TraversalEngine;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleBox};
use crate::suppression::SuppressionIndex;
use crate::types::{Location, Report, Severity, Violation};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Code of the finding recorded for a file that could not be read or parsed.
pub const PARSE_FAILURE_CODE: &str = "QG901";

/// Name of the finding recorded for a file that could not be read or parsed.
pub const PARSE_FAILURE_NAME: &str = "parse-failure";

/// Errors that abort a run before any finding is produced.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error while discovering files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// No tree builder was supplied.
    #[error("No tree builder configured")]
    MissingTreeBuilder,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    tree_builder: Option<Box<dyn TreeBuilder>>,
    parallelism: Option<usize>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I: IntoIterator<Item = RuleBox>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the parser used to build syntax trees.
    #[must_use]
    pub fn tree_builder<B: TreeBuilder + 'static>(mut self, builder: B) -> Self {
        self.tree_builder = Some(Box::new(builder));
        self
    }

    /// Limits the number of worker threads (default: config, then rayon's default).
    #[must_use]
    pub fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no tree builder was supplied or the current
    /// directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let tree_builder = self.tree_builder.ok_or(AnalyzerError::MissingTreeBuilder)?;
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        let registry: RuleRegistry = self
            .rules
            .into_iter()
            .filter(|r| {
                let enabled = config.is_rule_enabled(r.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", r.name());
                }
                enabled
            })
            .collect();

        Ok(Analyzer {
            root,
            registry,
            exclude_patterns,
            parallelism: self.parallelism.or(config.analyzer.parallelism),
            config,
            tree_builder,
        })
    }
}

/// The main analyzer that orchestrates a run.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    registry: RuleRegistry,
    exclude_patterns: Vec<String>,
    parallelism: Option<usize>,
    config: Config,
    tree_builder: Box<dyn TreeBuilder>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of enabled rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the enabled rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Discovers and analyzes all files under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails or the worker pool cannot
    /// start. Per-file failures are reported as findings instead.
    pub fn analyze(&self) -> Result<Report, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);
        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());
        self.analyze_files(&files)
    }

    /// Analyzes an explicit list of files.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot start.
    pub fn analyze_files(&self, files: &[PathBuf]) -> Result<Report, AnalyzerError> {
        let run = || -> Vec<(FileFindings, bool)> {
            files
                .par_iter()
                .map(|path| self.analyze_path(path))
                .collect()
        };

        let per_file = match self.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run),
            None => run(),
        };

        let files_checked = per_file.iter().filter(|(_, parsed)| *parsed).count();
        let suppressed: usize = per_file.iter().map(|(f, _)| f.suppressed).sum();
        let report = aggregator::merge(per_file.into_iter().map(|(f, _)| f), files_checked);

        info!(
            "Analysis complete: {} violations in {} files ({} suppressed)",
            report.violations.len(),
            report.files_checked,
            suppressed
        );

        Ok(report)
    }

    /// Analyzes in-memory source text as if it lived at `path`.
    #[must_use]
    pub fn analyze_source(&self, path: impl Into<PathBuf>, text: &str) -> Report {
        let path = path.into();
        let (findings, parsed) = self.check_text(path, text);
        aggregator::merge([findings], usize::from(parsed))
    }

    /// Reads and checks one file. The flag is false when it could not be parsed.
    fn analyze_path(&self, path: &Path) -> (FileFindings, bool) {
        debug!("Analyzing: {}", path.display());
        let relative = self.relative_path(path);

        match std::fs::read_to_string(path) {
            Ok(text) => self.check_text(relative, &text),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                (
                    file_failure(relative, format!("Could not read file: {e}")),
                    false,
                )
            }
        }
    }

    /// Builds the tree, walks it and filters the findings of one file.
    fn check_text(&self, path: PathBuf, text: &str) -> (FileFindings, bool) {
        let tree = match self.tree_builder.build(text) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                return (file_failure(path, format!("Could not parse file: {e}")), false);
            }
        };

        let unit = SourceUnit::new(path, text, tree);
        let index = SuppressionIndex::build(&unit.text);
        let raw = TraversalEngine::new(&self.registry).walk(&unit);
        let raw = self.apply_severity_override(raw);
        (aggregator::filter_file(raw, &index), true)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(&self, mut violations: Vec<Violation>) -> Vec<Violation> {
        for v in &mut violations {
            if let Some(severity) = self.config.rule_severity(&v.rule) {
                v.severity = severity;
            }
        }
        violations
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            // Root is the file itself.
            Ok(rel) if rel.as_os_str().is_empty() => path
                .file_name()
                .map_or_else(|| path.to_path_buf(), PathBuf::from),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Discovers all source files handled by the tree builder.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let extensions = self.tree_builder.extensions();
        let patterns = self
            .exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let handled = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e));
            if !handled {
                continue;
            }

            if should_exclude(&patterns, path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }
}

/// Checks if a path matches any exclude pattern.
fn should_exclude(patterns: &[glob::Pattern], path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|p| {
        if p.matches(&path_str) {
            return true;
        }
        // Also check as substring for patterns like "**/target/**"
        let normalized = p.as_str().replace("**", "");
        normalized.len() > 2 && path_str.contains(&normalized)
    })
}

fn file_failure(path: PathBuf, message: String) -> FileFindings {
    FileFindings {
        violations: vec![Violation::new(
            PARSE_FAILURE_CODE,
            PARSE_FAILURE_NAME,
            Severity::Error,
            Location::new(path, 1, 1),
            message,
        )],
        suppressed: 0,
    }
}
