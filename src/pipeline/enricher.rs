//! Entry enrichment
//!
//! Context mode needs no lookup: among qualifying sentences the strictly
//! longer one wins. Definition mode asks the dictionary for the first
//! ranked sense of the token's coarse category; no disambiguation by
//! context is attempted.

use crate::dictionary::{DictPos, LexicalDictionary};

/// Whether `candidate` should replace `stored` as an entry's context
///
/// Both are compared trimmed, by character count; ties keep the stored one.
pub fn prefers_context(candidate: &str, stored: &str) -> bool {
    candidate.trim().chars().count() > stored.trim().chars().count()
}

/// Dictionary-backed definition lookup
#[derive(Debug, Clone)]
pub struct DefinitionEnricher<'d, D: ?Sized> {
    dictionary: &'d D,
    marker: &'d str,
}

impl<'d, D: LexicalDictionary + ?Sized> DefinitionEnricher<'d, D> {
    pub fn new(dictionary: &'d D, marker: &'d str) -> Self {
        Self { dictionary, marker }
    }

    /// First-sense definition text, without marker
    ///
    /// `None` when the tag has no dictionary category or the dictionary has
    /// no sense for the lemma.
    pub fn lookup(&self, lemma: &str, tag: &str) -> Option<String> {
        let pos = DictPos::from_tag(tag)?;
        self.dictionary
            .senses(lemma, pos)
            .into_iter()
            .next()
            .map(|sense| sense.definition)
    }

    /// Marker-prefixed definition ready for storage
    pub fn enrich(&self, lemma: &str, tag: &str) -> Option<String> {
        self.lookup(lemma, tag)
            .map(|definition| format!("{}{}", self.marker, definition))
    }
}
