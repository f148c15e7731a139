//! Extraction config file.
//!
//! An [`ExtractionSpec`] names a preset and overrides individual policy
//! flags. It is validated by [`super::validation::ValidationEngine`] and
//! resolved into an [`ExtractionConfig`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "preset": "definitions",
//!   "min_lemma_length": 4,
//!   "extra_stopwords": ["thing", "stuff"],
//!   "definition_marker": "[def] ",
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::errors::{Result, VocabError};
use crate::types::{EnrichmentMode, ExtractionConfig};

/// The only config version understood
pub const SPEC_VERSION: u32 = 1;

/// Named starting points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// [`ExtractionConfig::context_sentences`]
    Context,
    /// [`ExtractionConfig::definitions`]
    Definitions,
}

impl Preset {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "context" | "context_sentences" | "sentences" => Some(Preset::Context),
            "definitions" | "definition" | "dictionary" => Some(Preset::Definitions),
            _ => None,
        }
    }

    pub fn config(&self) -> ExtractionConfig {
        match self {
            Preset::Context => ExtractionConfig::context_sentences(),
            Preset::Definitions => ExtractionConfig::definitions(),
        }
    }
}

/// Top-level config file (v1)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionSpec {
    /// Config version (currently `1`)
    pub v: u32,

    /// Preset name; omitted means `"context"`
    #[serde(default)]
    pub preset: Option<String>,

    #[serde(default)]
    pub enrichment: Option<EnrichmentMode>,

    #[serde(default)]
    pub include_proper_nouns: Option<bool>,

    #[serde(default)]
    pub require_subject_verb: Option<bool>,

    #[serde(default)]
    pub ascii_only: Option<bool>,

    /// `0` disables the length check
    #[serde(default)]
    pub min_lemma_length: Option<usize>,

    #[serde(default)]
    pub definition_marker: Option<String>,

    #[serde(default)]
    pub extra_stopwords: Option<Vec<String>>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl ExtractionSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The preset this spec starts from, if its name is recognized
    pub fn base_preset(&self) -> Option<Preset> {
        match &self.preset {
            None => Some(Preset::Context),
            Some(name) => Preset::parse(name),
        }
    }

    /// Enrichment mode after applying the override to the preset
    pub fn effective_enrichment(&self) -> EnrichmentMode {
        self.enrichment.unwrap_or_else(|| {
            self.base_preset()
                .map(|p| p.config().enrichment)
                .unwrap_or_default()
        })
    }

    /// Validate with the default rules and build the config
    ///
    /// Warnings are logged at info; any error fails the whole resolution.
    pub fn resolve(&self) -> Result<ExtractionConfig> {
        let report = ValidationEngine::with_defaults().validate(self);
        for warning in report.warnings() {
            tracing::info!(%warning, "config warning");
        }
        if report.has_errors() {
            return Err(VocabError::InvalidConfig(report.errors().cloned().collect()));
        }

        let mut config = self.base_preset().unwrap_or(Preset::Context).config();
        if let Some(mode) = self.enrichment {
            config.enrichment = mode;
        }
        if let Some(v) = self.include_proper_nouns {
            config.include_proper_nouns = v;
        }
        if let Some(v) = self.require_subject_verb {
            config.require_subject_verb = v;
        }
        if let Some(v) = self.ascii_only {
            config.ascii_only = v;
        }
        if let Some(n) = self.min_lemma_length {
            config.min_lemma_length = (n > 0).then_some(n);
        }
        if let Some(marker) = &self.definition_marker {
            config.definition_marker = marker.clone();
        }
        if let Some(words) = &self.extra_stopwords {
            config.extra_stopwords = words.clone();
        }
        Ok(config)
    }
}
