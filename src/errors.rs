//! Error types
//!
//! Startup-time failures (engine or dictionary unavailable, bad config) are
//! errors. Empty input, filtered tokens and missing definitions are not:
//! they simply produce fewer entries.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, VocabError>;

#[derive(Debug, Error)]
pub enum VocabError {
    /// The linguistic engine could not be started or returned garbage
    #[error("linguistic engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The lexical dictionary could not be loaded
    #[error("dictionary unavailable: {0}")]
    DictionaryUnavailable(String),

    /// An annotated document violated the wire format
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Config resolution failed; carries every error-level diagnostic
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VocabError {
    /// Process exit status used by the command-line tool
    pub fn exit_code(&self) -> i32 {
        match self {
            VocabError::EngineUnavailable(_) => 2,
            VocabError::DictionaryUnavailable(_) => 3,
            VocabError::InvalidConfig(_) => 4,
            _ => 1,
        }
    }

    /// Engine or dictionary could not be loaded
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            VocabError::EngineUnavailable(_) | VocabError::DictionaryUnavailable(_)
        )
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Stable machine-readable codes for config diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnsupportedVersion,
    UnknownPreset,
    UnknownField,
    InvalidValue,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedVersion => "unsupported_version",
            ErrorCode::UnknownPreset => "unknown_preset",
            ErrorCode::UnknownField => "unknown_field",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// A single config problem, addressed by JSON pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigError {
    pub code: ErrorCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.as_str(), self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new(ErrorCode::UnknownPreset, "/preset", "unknown preset \"x\"")
            .with_hint("Use \"context\" or \"definitions\"");
        let text = err.to_string();
        assert!(text.starts_with("[unknown_preset] /preset:"));
        assert!(text.contains("hint:"));
    }

    #[test]
    fn test_invalid_config_lists_all_errors() {
        let err = VocabError::InvalidConfig(vec![
            ConfigError::new(ErrorCode::UnsupportedVersion, "/v", "bad version"),
            ConfigError::new(ErrorCode::UnknownField, "/foo", "unrecognized field"),
        ]);
        let text = err.to_string();
        assert!(text.contains("bad version"));
        assert!(text.contains("unrecognized field"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(VocabError::EngineUnavailable("x".into()).exit_code(), 2);
        assert_eq!(VocabError::DictionaryUnavailable("x".into()).exit_code(), 3);
        assert_eq!(VocabError::MalformedDocument("x".into()).exit_code(), 1);
        assert!(VocabError::DictionaryUnavailable("x".into()).is_unavailable());
        assert!(!VocabError::MalformedDocument("x".into()).is_unavailable());
    }
}
