//! Natural Language Processing components
//!
//! The pipeline never tags text itself. It asks a [`LinguisticEngine`] for
//! sentences and annotated tokens, which keeps the core testable with
//! deterministic fakes.

pub mod doc;
pub mod process;
pub mod stopwords;

pub use doc::{AnnotatedDoc, AnnotatedSpan, AnnotatedToken};
pub use process::ProcessEngine;
pub use stopwords::StopwordFilter;

use crate::errors::Result;
use crate::types::Document;

/// Tokenize, tag, lemmatize, parse and segment text
///
/// Implementations are loaded once and shared across requests, hence the
/// `&self` receiver.
pub trait LinguisticEngine {
    /// Analyze the whole text as one unit
    fn analyze(&self, text: &str) -> Result<Document>;
}

impl<E: LinguisticEngine + ?Sized> LinguisticEngine for &E {
    fn analyze(&self, text: &str) -> Result<Document> {
        (**self).analyze(text)
    }
}

impl<E: LinguisticEngine + ?Sized> LinguisticEngine for Box<E> {
    fn analyze(&self, text: &str) -> Result<Document> {
        (**self).analyze(text)
    }
}

/// Engine that treats its input as an annotated-document JSON
///
/// Useful when the host has already run a tagger and only needs the
/// selection pipeline.
#[derive(Debug, Clone)]
pub struct AnnotatedEngine {
    stopwords: StopwordFilter,
}

impl AnnotatedEngine {
    pub fn new() -> Self {
        Self {
            stopwords: StopwordFilter::english(),
        }
    }

    /// Use `stopwords` for tokens that arrive without an `is_stop` flag
    pub fn with_stopwords(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }
}

impl Default for AnnotatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LinguisticEngine for AnnotatedEngine {
    fn analyze(&self, text: &str) -> Result<Document> {
        AnnotatedDoc::from_json(text)?.into_document(&self.stopwords)
    }
}
