//! Validation engine for extraction config files.
//!
//! The engine runs all registered [`ValidationRule`]s against an
//! [`ExtractionSpec`](super::spec::ExtractionSpec) and collects every
//! diagnostic into a [`ValidationReport`]. It never short-circuits on the
//! first error.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use rapid_vocab::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::spec::{ExtractionSpec, SPEC_VERSION};
use crate::errors::{ConfigError, ErrorCode};
use crate::types::EnrichmentMode;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: ConfigError,
}

impl ValidationDiagnostic {
    pub fn error(err: ConfigError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: ConfigError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ConfigError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects an [`ExtractionSpec`] and returns
/// zero or more diagnostics.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"version"`).
    fn name(&self) -> &str;

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(PresetRule));
        engine.add_rule(Box::new(MinLengthRule));
        engine.add_rule(Box::new(DefinitionMarkerRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &ExtractionSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Version must be supported ───────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            ConfigError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported config version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Preset must exist ───────────────────────────────────────────────────

struct PresetRule;

impl ValidationRule for PresetRule {
    fn name(&self) -> &str {
        "preset"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        match (&spec.preset, spec.base_preset()) {
            (Some(name), None) => vec![ValidationDiagnostic::error(
                ConfigError::new(
                    ErrorCode::UnknownPreset,
                    "/preset",
                    format!("unknown preset \"{name}\""),
                )
                .with_hint("Use \"context\" or \"definitions\""),
            )],
            _ => vec![],
        }
    }
}

// ─── 3. A zero minimum length is allowed but probably a mistake ─────────────

struct MinLengthRule;

impl ValidationRule for MinLengthRule {
    fn name(&self) -> &str {
        "min_lemma_length"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        if spec.min_lemma_length == Some(0) {
            vec![ValidationDiagnostic::warning(
                ConfigError::new(
                    ErrorCode::InvalidValue,
                    "/min_lemma_length",
                    "min_lemma_length 0 disables the length check",
                )
                .with_hint("Remove the field to keep the preset's minimum"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 4. Definition entries need a visible marker ────────────────────────────

struct DefinitionMarkerRule;

impl ValidationRule for DefinitionMarkerRule {
    fn name(&self) -> &str {
        "definition_marker"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        let empty_marker = spec
            .definition_marker
            .as_deref()
            .is_some_and(|m| m.trim().is_empty());
        if empty_marker && spec.effective_enrichment() == EnrichmentMode::Definition {
            vec![ValidationDiagnostic::warning(
                ConfigError::new(
                    ErrorCode::InvalidValue,
                    "/definition_marker",
                    "definition entries will be indistinguishable from sentences",
                )
                .with_hint("Use a non-blank marker such as \"📖 \""),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    ConfigError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        Self::check_unknowns("", &spec.unknown_fields, spec.strict)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> ExtractionSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_wrong_version() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        assert!(report.has_errors());
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::UnsupportedVersion);
        assert_eq!(err.path, "/v");
    }

    #[test]
    fn test_unknown_preset() {
        let report = engine().validate(&spec(r#"{ "v": 1, "preset": "textrank" }"#));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::UnknownPreset);
        assert!(err.hint.is_some());
    }

    #[test]
    fn test_collects_all_errors() {
        let report = engine().validate(&spec(
            r#"{ "v": 7, "preset": "nope", "bogus": 1, "strict": true }"#,
        ));
        assert_eq!(report.errors().count(), 3);
    }

    #[test]
    fn test_zero_min_length_warns() {
        let report = engine().validate(&spec(r#"{ "v": 1, "min_lemma_length": 0 }"#));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_blank_marker_warns_only_in_definition_mode() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "preset": "definitions", "definition_marker": " " }"#,
        ));
        assert_eq!(report.warnings().count(), 1);

        let report = engine().validate(&spec(r#"{ "v": 1, "definition_marker": "" }"#));
        assert!(report.is_empty());
    }

    #[test]
    fn test_unknown_field_strictness() {
        let lenient = engine().validate(&spec(r#"{ "v": 1, "mode": "x" }"#));
        assert!(lenient.is_valid());
        assert_eq!(lenient.warnings().next().unwrap().path, "/mode");

        let strict = engine().validate(&spec(r#"{ "v": 1, "mode": "x", "strict": true }"#));
        assert!(strict.has_errors());
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = engine().validate(&spec(r#"{ "v": 3 }"#));
        let json = serde_json::to_value(&report).unwrap();
        let diag = &json["diagnostics"][0];
        assert_eq!(diag["severity"], "error");
        assert_eq!(diag["code"], "unsupported_version");
    }

    #[test]
    fn test_custom_rule() {
        struct NoStopwordsRule;
        impl ValidationRule for NoStopwordsRule {
            fn name(&self) -> &str {
                "no_stopwords"
            }
            fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
                match &spec.extra_stopwords {
                    Some(words) if !words.is_empty() => vec![ValidationDiagnostic::error(
                        ConfigError::new(ErrorCode::InvalidValue, "/extra_stopwords", "not allowed"),
                    )],
                    _ => vec![],
                }
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(NoStopwordsRule));
        assert_eq!(engine.rule_names(), vec!["no_stopwords"]);
        assert!(engine
            .validate(&spec(r#"{ "v": 1, "extra_stopwords": ["a"] }"#))
            .has_errors());
    }
}
