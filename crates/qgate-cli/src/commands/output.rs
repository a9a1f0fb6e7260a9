//! Output formatting for gate results.

use anyhow::Result;
use miette::NamedSource;
use qgate_core::{Report, Severity, Violation, ViolationDiagnostic};
use serde::Serialize;
use std::path::Path;

use crate::OutputFormat;

/// JSON document written by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    files_checked: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    violations: &'a [Violation],
}

/// Print gate results in the specified format.
pub fn print(report: &Report, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Pretty => print_pretty(report, root),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    for violation in &report.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }
    print_summary(report);
}

fn print_summary(report: &Report) {
    let (errors, warnings, infos) = report.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, report.files_checked
    );
}

fn print_pretty(report: &Report, root: &Path) {
    for (file, violations) in report.by_file() {
        let source_path = if root.is_file() {
            root.to_path_buf()
        } else {
            root.join(file)
        };
        let content = std::fs::read_to_string(source_path).unwrap_or_default();
        for violation in violations {
            let diagnostic = miette::Report::new(ViolationDiagnostic::from(violation))
                .with_source_code(NamedSource::new(file.display().to_string(), content.clone()));
            println!("{diagnostic:?}");
        }
    }
    print_summary(report);
}

fn render_json(report: &Report) -> Result<String> {
    let (errors, warnings, infos) = report.count_by_severity();
    let doc = JsonReport {
        passed: !report.has_violations(),
        files_checked: report.files_checked,
        errors,
        warnings,
        infos,
        violations: &report.violations,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn print_compact(report: &Report) {
    for violation in &report.violations {
        println!("{violation}");
    }
}
