//! Stopword lists
//!
//! The engine's own stop-word flag is authoritative. This filter backs it up
//! in two places: annotated documents that omit `is_stop`, and user-supplied
//! extra stop words layered on top of the engine's decision.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// Case-insensitive set of stop words
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Lowercased words
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// The NLTK English list from the `stop-words` crate
    ///
    /// Function words only (about 180, close to a tagger's own flag). Larger
    /// lists mark content words such as "run" or "world" as stop words.
    pub fn english() -> Self {
        Self {
            stopwords: get(LANGUAGE::English)
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// An empty filter that matches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        if self.stopwords.is_empty() {
            return false;
        }
        self.stopwords.contains(&word.to_lowercase())
    }

    /// True if either the surface form or the lemma is listed
    pub fn matches(&self, text: &str, lemma: &str) -> bool {
        self.is_stopword(text) || self.is_stopword(lemma)
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
