//! Token eligibility filter
//!
//! A fixed chain of short-circuiting predicates. Order matters only for
//! which [`Rejection`] gets reported; a token passes iff every active
//! predicate passes:
//!
//! 1. part of speech in the configured set
//! 2. not a stop word (engine flag, or a configured extra stop word)
//! 3. not punctuation
//! 4. lowercased lemma is ASCII letters only (when `ascii_only`)
//! 5. lemma at least `min_lemma_length` characters (when set)

use std::fmt;

use crate::nlp::stopwords::StopwordFilter;
use crate::types::{ExtractionConfig, PosTag, Token};

/// Why a token was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    PartOfSpeech,
    StopWord,
    Punctuation,
    NonAlphabetic,
    TooShort,
    EmptyLemma,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::PartOfSpeech => "part_of_speech",
            Rejection::StopWord => "stop_word",
            Rejection::Punctuation => "punctuation",
            Rejection::NonAlphabetic => "non_alphabetic",
            Rejection::TooShort => "too_short",
            Rejection::EmptyLemma => "empty_lemma",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run rejection tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub seen: usize,
    pub eligible: usize,
    pub part_of_speech: usize,
    pub stop_word: usize,
    pub punctuation: usize,
    pub non_alphabetic: usize,
    pub too_short: usize,
    pub empty_lemma: usize,
}

impl FilterStats {
    pub fn record(&mut self, outcome: &Result<String, Rejection>) {
        self.seen += 1;
        match outcome {
            Ok(_) => self.eligible += 1,
            Err(Rejection::PartOfSpeech) => self.part_of_speech += 1,
            Err(Rejection::StopWord) => self.stop_word += 1,
            Err(Rejection::Punctuation) => self.punctuation += 1,
            Err(Rejection::NonAlphabetic) => self.non_alphabetic += 1,
            Err(Rejection::TooShort) => self.too_short += 1,
            Err(Rejection::EmptyLemma) => self.empty_lemma += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.seen - self.eligible
    }
}

/// Compiled token filter for one [`ExtractionConfig`]
#[derive(Debug, Clone)]
pub struct TokenFilter {
    pos: &'static [PosTag],
    extra_stopwords: StopwordFilter,
    ascii_only: bool,
    min_lemma_length: Option<usize>,
}

impl TokenFilter {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            pos: config.eligible_pos(),
            extra_stopwords: StopwordFilter::from_list(&config.extra_stopwords),
            ascii_only: config.ascii_only,
            min_lemma_length: config.min_lemma_length.filter(|&n| n > 0),
        }
    }

    /// Run the chain; on success returns the aggregation key
    pub fn check(&self, token: &Token) -> Result<String, Rejection> {
        if !self.pos.contains(&token.pos) {
            return Err(Rejection::PartOfSpeech);
        }
        if token.is_stopword || self.extra_stopwords.matches(&token.text, &token.lemma) {
            return Err(Rejection::StopWord);
        }
        if token.is_punct {
            return Err(Rejection::Punctuation);
        }

        let key = token.key();
        if key.is_empty() {
            return Err(Rejection::EmptyLemma);
        }
        if self.ascii_only && !is_ascii_word(&key) {
            return Err(Rejection::NonAlphabetic);
        }
        if let Some(min) = self.min_lemma_length {
            if key.chars().count() < min {
                return Err(Rejection::TooShort);
            }
        }

        Ok(key)
    }

    pub fn is_eligible(&self, token: &Token) -> bool {
        self.check(token).is_ok()
    }
}

/// One or more ASCII letters and nothing else
pub fn is_ascii_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_alphabetic())
}
