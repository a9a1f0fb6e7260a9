//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# qgate configuration

# recommended | strict | minimal
preset = "recommended"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/build/**",
    "**/generated/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.brace-structure]
indent = 4

[rules.doc-param-order]
# "first" or "last"
type_params = "first"

[rules.non-static-candidate]
# severity = "warning"
exempt_annotations = [
    "Override",
    "Test",
    "ParameterizedTest",
    "RepeatedTest",
    "TestFactory",
    "Before",
    "After",
    "BeforeEach",
    "AfterEach",
]

# [rules.mandatory-final-class]
# enabled = true
"#;

const CONFIG_FILE: &str = "qgate.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: qgate check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgate_core::Config;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::parse(DEFAULT_CONFIG).expect("parses");
        let rules = qgate_rules::rules_from_config(&config).expect("valid rules");
        assert_eq!(rules.len(), 7);
        assert!(config.analyzer.respect_gitignore);
    }

    #[test]
    fn test_existing_config_needs_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "preset = \"strict\"\n").expect("write");

        assert!(write_config(&path, false).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "preset = \"strict\"\n"
        );

        write_config(&path, true).expect("overwrite");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), DEFAULT_CONFIG);
    }
}
