//! Check command implementation.

use anyhow::{Context, Result};
use qgate_core::{Analyzer, Config, RuleBox};
use qgate_java::JavaTreeBuilder;
use qgate_rules::{rules_from_config, selected_rules};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command. Returns `true` when the gate fails.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<bool> {
    let config = load_config(source)?;
    let rules = resolve_rules(rules_filter.as_deref(), &config)?;

    let mut builder = Analyzer::builder()
        .root(path)
        .tree_builder(JavaTreeBuilder::new())
        .rules(rules)
        .config(config);

    for pattern in exclude {
        builder = builder.exclude(pattern);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let report = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&report, format, analyzer.root())?;

    Ok(report.has_violations())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

fn resolve_rules(filter: Option<&str>, config: &Config) -> Result<Vec<RuleBox>> {
    let rules = match filter {
        Some(filter) => {
            let names: Vec<String> = filter
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from)
                .collect();
            selected_rules(&names, config)
        }
        None => rules_from_config(config),
    };
    rules.context("Invalid rule configuration")
}
