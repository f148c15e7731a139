//! Core types shared by every pipeline stage
//!
//! Tokens and sentences are produced by a [`LinguisticEngine`](crate::nlp::LinguisticEngine)
//! and are read-only to the pipeline. [`LearnableEntry`] is the aggregated
//! output unit and [`ExtractionConfig`] the single policy structure that
//! selects between context-sentence and definition extraction.

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech category (Universal Dependencies tag set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    Noun,
    ProperNoun,
    Verb,
    Auxiliary,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    Numeral,
    Particle,
    Interjection,
    Punctuation,
    Symbol,
    Other,
}

impl PosTag {
    /// Parse a Universal Dependencies / spaCy coarse tag (`NOUN`, `PROPN`, ...)
    pub fn from_ud(tag: &str) -> Self {
        match tag {
            "NOUN" => PosTag::Noun,
            "PROPN" => PosTag::ProperNoun,
            "VERB" => PosTag::Verb,
            "AUX" => PosTag::Auxiliary,
            "ADJ" => PosTag::Adjective,
            "ADV" => PosTag::Adverb,
            "PRON" => PosTag::Pronoun,
            "DET" => PosTag::Determiner,
            "ADP" => PosTag::Preposition,
            "CCONJ" | "CONJ" | "SCONJ" => PosTag::Conjunction,
            "NUM" => PosTag::Numeral,
            "PART" => PosTag::Particle,
            "INTJ" => PosTag::Interjection,
            "PUNCT" => PosTag::Punctuation,
            "SYM" => PosTag::Symbol,
            _ => PosTag::Other,
        }
    }

    /// The Universal Dependencies spelling of this tag
    pub fn as_ud(&self) -> &'static str {
        match self {
            PosTag::Noun => "NOUN",
            PosTag::ProperNoun => "PROPN",
            PosTag::Verb => "VERB",
            PosTag::Auxiliary => "AUX",
            PosTag::Adjective => "ADJ",
            PosTag::Adverb => "ADV",
            PosTag::Pronoun => "PRON",
            PosTag::Determiner => "DET",
            PosTag::Preposition => "ADP",
            PosTag::Conjunction => "CCONJ",
            PosTag::Numeral => "NUM",
            PosTag::Particle => "PART",
            PosTag::Interjection => "INTJ",
            PosTag::Punctuation => "PUNCT",
            PosTag::Symbol => "SYM",
            PosTag::Other => "X",
        }
    }
}

/// Dependency-grammar role of a token within its sentence
///
/// Only the roles the pipeline inspects get their own variant; every other
/// label is kept verbatim in [`DepRole::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepRole {
    /// `nsubj`
    NominalSubject,
    /// `ROOT`
    Root,
    Other(String),
}

impl DepRole {
    pub fn from_label(label: &str) -> Self {
        match label {
            "nsubj" => DepRole::NominalSubject,
            "ROOT" | "root" => DepRole::Root,
            other => DepRole::Other(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            DepRole::NominalSubject => "nsubj",
            DepRole::Root => "ROOT",
            DepRole::Other(label) => label,
        }
    }
}

impl Default for DepRole {
    fn default() -> Self {
        DepRole::Other(String::new())
    }
}

/// A single annotated token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Surface form as it appears in the text
    pub text: String,
    /// Base form, not yet lowercased
    pub lemma: String,
    /// Coarse part-of-speech category
    pub pos: PosTag,
    /// Fine-grained morphological tag (Penn Treebank, e.g. `NNS`, `VBD`)
    pub tag: String,
    /// Dependency role
    pub dep: DepRole,
    /// Byte offset of the token start in the document text
    pub start: usize,
    /// Byte offset of the token end in the document text
    pub end: usize,
    /// Index of the sentence containing this token
    pub sentence_idx: usize,
    /// Index of the token in the document
    pub token_idx: usize,
    pub is_stopword: bool,
    pub is_punct: bool,
}

impl Token {
    /// Create a token with an empty fine tag, an unlabelled dependency role
    /// and no stop-word or punctuation flags
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: PosTag,
        start: usize,
        end: usize,
        sentence_idx: usize,
        token_idx: usize,
    ) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos,
            tag: String::new(),
            dep: DepRole::default(),
            start,
            end,
            sentence_idx,
            token_idx,
            is_stopword: false,
            is_punct: pos == PosTag::Punctuation,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_dep(mut self, dep: DepRole) -> Self {
        self.dep = dep;
        self
    }

    pub fn with_stopword(mut self, is_stopword: bool) -> Self {
        self.is_stopword = is_stopword;
        self
    }

    pub fn with_punct(mut self, is_punct: bool) -> Self {
        self.is_punct = is_punct;
        self
    }

    /// Lowercased lemma, the aggregation key
    pub fn key(&self) -> String {
        self.lemma.to_lowercase()
    }
}

/// An ordered run of tokens plus the text it covers
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Original substring covered by the sentence (untrimmed)
    pub text: String,
    /// Byte offset of the sentence start
    pub start: usize,
    /// Byte offset of the sentence end
    pub end: usize,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(text: impl Into<String>, start: usize, end: usize, tokens: Vec<Token>) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            tokens,
        }
    }

    /// Sentence text with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// An analyzed document: the raw text segmented into sentences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub text: String,
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(text: impl Into<String>, sentences: Vec<Sentence>) -> Self {
        Self {
            text: text.into(),
            sentences,
        }
    }

    pub fn num_tokens(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }
}

/// One aggregated vocabulary entry, keyed by lowercase lemma
///
/// Serialized field names are part of the host contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnableEntry {
    #[serde(rename = "WordOrPhrase")]
    pub word_or_phrase: String,
    /// A trimmed sentence, or a marker-prefixed definition
    #[serde(rename = "ContextSentence")]
    pub context_sentence: String,
    /// Occurrence count (definition mode only)
    #[serde(rename = "Frequency", default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// Reserved for scoring (definition mode only, always 0.0)
    #[serde(rename = "Difficulty", default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
}

impl LearnableEntry {
    /// Entry carrying an example sentence
    pub fn with_context(word: impl Into<String>, sentence: impl Into<String>) -> Self {
        Self {
            word_or_phrase: word.into(),
            context_sentence: sentence.into(),
            frequency: None,
            difficulty: None,
        }
    }

    /// Entry carrying a definition, first sighting
    pub fn with_definition(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word_or_phrase: word.into(),
            context_sentence: definition.into(),
            frequency: Some(1),
            difficulty: Some(0.0),
        }
    }
}

/// How entries are enriched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    /// Keep the longest qualifying sentence per lemma
    #[default]
    ContextSentence,
    /// Attach the first-ranked dictionary sense, count occurrences
    Definition,
}

/// Default prefix put in front of definition text
pub const DEFAULT_DEFINITION_MARKER: &str = "📖 ";

/// Extraction policy
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Enrichment strategy
    pub enrichment: EnrichmentMode,
    /// Whether PROPN tokens are eligible
    pub include_proper_nouns: bool,
    /// Only take context from sentences with a subject and a root verb
    pub require_subject_verb: bool,
    /// Only accept lemmas made of ASCII letters
    pub ascii_only: bool,
    /// Minimum lemma length in characters (`None` disables the check)
    pub min_lemma_length: Option<usize>,
    /// Prefix for definition entries
    pub definition_marker: String,
    /// Stop words applied on top of the engine's own flag
    pub extra_stopwords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::context_sentences()
    }
}

impl ExtractionConfig {
    /// Example-sentence extraction: proper nouns allowed, sentences must
    /// have a subject and a root verb, no purity or length filter
    pub fn context_sentences() -> Self {
        Self {
            enrichment: EnrichmentMode::ContextSentence,
            include_proper_nouns: true,
            require_subject_verb: true,
            ascii_only: false,
            min_lemma_length: None,
            definition_marker: DEFAULT_DEFINITION_MARKER.to_string(),
            extra_stopwords: Vec::new(),
        }
    }

    /// Definition extraction: no proper nouns, ASCII-alphabetic lemmas of
    /// at least three characters, every sentence accepted
    pub fn definitions() -> Self {
        Self {
            enrichment: EnrichmentMode::Definition,
            include_proper_nouns: false,
            require_subject_verb: false,
            ascii_only: true,
            min_lemma_length: Some(3),
            definition_marker: DEFAULT_DEFINITION_MARKER.to_string(),
            extra_stopwords: Vec::new(),
        }
    }

    pub fn with_enrichment(mut self, enrichment: EnrichmentMode) -> Self {
        self.enrichment = enrichment;
        self
    }

    pub fn with_proper_nouns(mut self, include: bool) -> Self {
        self.include_proper_nouns = include;
        self
    }

    pub fn with_subject_verb(mut self, require: bool) -> Self {
        self.require_subject_verb = require;
        self
    }

    pub fn with_ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    pub fn with_min_lemma_length(mut self, min: Option<usize>) -> Self {
        self.min_lemma_length = min;
        self
    }

    pub fn with_definition_marker(mut self, marker: impl Into<String>) -> Self {
        self.definition_marker = marker.into();
        self
    }

    pub fn with_extra_stopwords(mut self, words: &[&str]) -> Self {
        self.extra_stopwords = words.iter().map(|w| w.to_string()).collect();
        self
    }

    /// Coarse categories eligible for extraction
    pub fn eligible_pos(&self) -> &'static [PosTag] {
        if self.include_proper_nouns {
            &[PosTag::Noun, PosTag::ProperNoun, PosTag::Verb, PosTag::Adjective]
        } else {
            &[PosTag::Noun, PosTag::Verb, PosTag::Adjective]
        }
    }
}
