//! Rule presets and construction from configuration.

use std::str::FromStr;

use qgate_core::{Config, ConfigError, RuleBox, RuleConfig, Severity};
use tracing::debug;

use crate::{
    brace_structure, declaration_order, doc_param_order, mandatory_final_class,
    non_static_candidate, protected_in_final, record_shape, unused_private_constructor,
    BraceStructure, DeclarationOrder, DocParamOrder, MandatoryFinalClass, NonStaticCandidate,
    ProtectedInFinal, RecordShape, UnusedPrivateConstructor,
};

/// (name, code) of every built-in rule, in code order.
const RULES: [(&str, &str); 8] = [
    (declaration_order::NAME, declaration_order::CODE),
    (brace_structure::NAME, brace_structure::CODE),
    (doc_param_order::NAME, doc_param_order::CODE),
    (record_shape::NAME, record_shape::CODE),
    (non_static_candidate::NAME, non_static_candidate::CODE),
    (unused_private_constructor::NAME, unused_private_constructor::CODE),
    (protected_in_final::NAME, protected_in_final::CODE),
    (mandatory_final_class::NAME, mandatory_final_class::CODE),
];

const MINIMAL: &[&str] = &[
    record_shape::NAME,
    unused_private_constructor::NAME,
    protected_in_final::NAME,
];

const RECOMMENDED: &[&str] = &[
    declaration_order::NAME,
    brace_structure::NAME,
    doc_param_order::NAME,
    record_shape::NAME,
    non_static_candidate::NAME,
    unused_private_constructor::NAME,
    protected_in_final::NAME,
];

/// Preset configurations for qgate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every rule except `mandatory-final-class`.
    #[default]
    Recommended,
    /// Every rule.
    Strict,
    /// Rules that flag outright design mistakes only.
    Minimal,
}

impl Preset {
    /// Names of the rules this preset enables.
    #[must_use]
    pub fn rule_names(self) -> Vec<&'static str> {
        match self {
            Self::Recommended => RECOMMENDED.to_vec(),
            Self::Strict => rule_names(),
            Self::Minimal => MINIMAL.to_vec(),
        }
    }

    /// Returns the rules for this preset with default settings.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        self.rule_names()
            .into_iter()
            .filter_map(find_rule)
            .collect()
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(ConfigError::UnknownPreset {
                name: other.to_string(),
            }),
        }
    }
}

/// Names of all built-in rules.
#[must_use]
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|(name, _)| *name).collect()
}

/// Returns the recommended set of rules.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the strict set of rules.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Returns the minimal set of rules.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Looks a rule up by name (`declaration-order`) or code (`QG001`).
#[must_use]
pub fn find_rule(name_or_code: &str) -> Option<RuleBox> {
    rule_from_config(name_or_code, &RuleConfig::default())
        .ok()
        .flatten()
}

fn canonical_name(name_or_code: &str) -> Option<&'static str> {
    RULES
        .iter()
        .find(|(name, code)| *name == name_or_code || code.eq_ignore_ascii_case(name_or_code))
        .map(|(name, _)| *name)
}

/// Builds one rule, applying the options of its `[rules.*]` table.
///
/// Returns `Ok(None)` when no built-in rule has that name or code.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOption`] when an option value is unusable.
pub fn rule_from_config(
    name_or_code: &str,
    config: &RuleConfig,
) -> Result<Option<RuleBox>, ConfigError> {
    let Some(name) = canonical_name(name_or_code) else {
        return Ok(None);
    };
    let rule: RuleBox = match name {
        declaration_order::NAME => Box::new(tuned(
            DeclarationOrder::new(),
            config,
            DeclarationOrder::severity,
        )),
        brace_structure::NAME => Box::new(tuned(
            BraceStructure::from_config(config)?,
            config,
            BraceStructure::severity,
        )),
        doc_param_order::NAME => Box::new(tuned(
            DocParamOrder::from_config(config)?,
            config,
            DocParamOrder::severity,
        )),
        record_shape::NAME => Box::new(tuned(RecordShape::new(), config, RecordShape::severity)),
        non_static_candidate::NAME => Box::new(tuned(
            NonStaticCandidate::from_config(config)?,
            config,
            NonStaticCandidate::severity,
        )),
        unused_private_constructor::NAME => Box::new(tuned(
            UnusedPrivateConstructor::new(),
            config,
            UnusedPrivateConstructor::severity,
        )),
        protected_in_final::NAME => Box::new(tuned(
            ProtectedInFinal::new(),
            config,
            ProtectedInFinal::severity,
        )),
        mandatory_final_class::NAME => Box::new(tuned(
            MandatoryFinalClass::new(),
            config,
            MandatoryFinalClass::severity,
        )),
        _ => return Ok(None),
    };
    Ok(Some(rule))
}

/// Applies the table's `severity`, if set, through the rule's builder.
fn tuned<R>(rule: R, config: &RuleConfig, set: fn(R, Severity) -> R) -> R {
    match config.severity {
        Some(severity) => set(rule, severity),
        None => rule,
    }
}

/// Builds the rule set described by a configuration.
///
/// Starts from the configured preset (recommended by default) and adds any
/// rule outside the preset whose table sets `enabled = true`. Rules disabled
/// in their table are dropped later by the analyzer builder.
///
/// # Errors
///
/// Returns an error for unknown rule names, an unknown preset or invalid
/// rule options.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    config.validate_rule_names(&rule_names())?;
    let preset = match &config.preset {
        Some(name) => name.parse::<Preset>()?,
        None => Preset::default(),
    };

    let preset_names = preset.rule_names();
    let names: Vec<&str> = rule_names()
        .into_iter()
        .filter(|name| {
            preset_names.contains(name)
                || config
                    .rules
                    .get(*name)
                    .is_some_and(|c| c.enabled == Some(true))
        })
        .collect();
    debug!(?preset, rules = names.len(), "Resolved rule set");

    build(&names, config)
}

/// Builds exactly the named rules (names or codes), ignoring the preset.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownRule`] for a name no built-in rule answers
/// to, or an option error from the rule's table.
pub fn selected_rules(names: &[String], config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    config.validate_rule_names(&rule_names())?;
    let canonical = names
        .iter()
        .map(|n| {
            canonical_name(n.trim()).ok_or_else(|| ConfigError::UnknownRule { name: n.clone() })
        })
        .collect::<Result<Vec<_>, _>>()?;
    build(&canonical, config)
}

fn build(names: &[&str], config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let defaults = RuleConfig::default();
    let mut rules = Vec::with_capacity(names.len());
    for name in names {
        let table = config.rules.get(*name).unwrap_or(&defaults);
        if let Some(rule) = rule_from_config(name, table)? {
            rules.push(rule);
        }
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Strict.rules().len(), 8);
        assert_eq!(Preset::Recommended.rules().len(), 7);
        assert_eq!(Preset::Minimal.rules().len(), 3);
        assert!(!names(&recommended_rules()).contains(&"mandatory-final-class"));
    }

    #[test]
    fn test_find_rule_by_name_or_code() {
        assert_eq!(find_rule("record-shape").map(|r| r.code()), Some("QG004"));
        assert_eq!(find_rule("QG008").map(|r| r.name()), Some("mandatory-final-class"));
        assert_eq!(find_rule("qg001").map(|r| r.name()), Some("declaration-order"));
        assert!(find_rule("no-such-rule").is_none());
    }

    #[test]
    fn test_codes_are_unique_and_match_rules() {
        for rule in all_rules() {
            let (name, code) = RULES
                .iter()
                .find(|(n, _)| *n == rule.name())
                .copied()
                .expect("listed");
            assert_eq!(rule.code(), code);
            assert_eq!(rule.name(), name);
        }
    }

    #[test]
    fn test_rules_from_config_uses_preset_and_enables_extras() {
        let config = Config::parse(
            r#"
preset = "minimal"

[rules.mandatory-final-class]
enabled = true
"#,
        )
        .expect("config");
        let rules = rules_from_config(&config).expect("rules");
        assert_eq!(
            names(&rules),
            vec![
                "record-shape",
                "unused-private-constructor",
                "protected-in-final",
                "mandatory-final-class"
            ]
        );
    }

    #[test]
    fn test_table_severity_sets_rule_default() {
        let config = Config::parse(
            "[rules.record-shape]\nseverity = \"warning\"\n\n[rules.brace-structure]\nindent = 2\nseverity = \"info\"\n",
        )
        .expect("config");
        let rules = rules_from_config(&config).expect("rules");
        let severity = |name: &str| {
            rules
                .iter()
                .find(|r| r.name() == name)
                .map(|r| r.default_severity())
        };
        assert_eq!(severity("record-shape"), Some(Severity::Warning));
        assert_eq!(severity("brace-structure"), Some(Severity::Info));
        assert_eq!(severity("declaration-order"), Some(Severity::Error));
    }

    #[test]
    fn test_unknown_rule_table_is_fatal() {
        let config = Config::parse("[rules.no-such-rule]\nenabled = true\n").expect("config");
        assert!(matches!(
            rules_from_config(&config),
            Err(ConfigError::UnknownRule { name }) if name == "no-such-rule"
        ));
    }

    #[test]
    fn test_unknown_preset_is_fatal() {
        let config = Config::parse("preset = \"lenient\"\n").expect("config");
        assert!(matches!(
            rules_from_config(&config),
            Err(ConfigError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn test_invalid_option_is_fatal() {
        let config = Config::parse("[rules.brace-structure]\nindent = \"wide\"\n").expect("config");
        assert!(matches!(
            rules_from_config(&config),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_selected_rules() {
        let selected = selected_rules(
            &["QG004".to_string(), "brace-structure".to_string()],
            &Config::default(),
        )
        .expect("rules");
        assert_eq!(names(&selected), vec!["record-shape", "brace-structure"]);

        assert!(matches!(
            selected_rules(&["bogus".to_string()], &Config::default()),
            Err(ConfigError::UnknownRule { .. })
        ));
    }
}
