//! Annotated-document wire format
//!
//! The JSON layout follows spaCy's `Doc.to_json()`:
//!
//! ```json
//! {
//!   "text": "Dogs run.",
//!   "sents": [{ "start": 0, "end": 9 }],
//!   "tokens": [
//!     { "start": 0, "end": 4, "pos": "NOUN", "tag": "NNS", "dep": "nsubj", "lemma": "dog" },
//!     { "start": 5, "end": 8, "pos": "VERB", "tag": "VBP", "dep": "ROOT", "lemma": "run",
//!       "is_stop": false, "is_punct": false }
//!   ]
//! }
//! ```
//!
//! All offsets count Unicode scalar values, not bytes. `is_stop` and
//! `is_punct` are optional extensions; when missing, the stop-word list and
//! the `PUNCT` tag decide. Fields such as `id`, `head` or `morph` are ignored.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VocabError};
use crate::nlp::stopwords::StopwordFilter;
use crate::types::{DepRole, Document, PosTag, Sentence, Token};

/// A whole annotated document as it arrives on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotatedDoc {
    pub text: String,
    /// Sentence spans; absent when the producer had no parser
    #[serde(default)]
    pub sents: Option<Vec<AnnotatedSpan>>,
    #[serde(default)]
    pub tokens: Vec<AnnotatedToken>,
}

/// Character span of a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotatedToken {
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub dep: String,
    #[serde(default)]
    pub lemma: Option<String>,
    #[serde(default)]
    pub is_stop: Option<bool>,
    #[serde(default)]
    pub is_punct: Option<bool>,
}

impl AnnotatedDoc {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve offsets and flags into a [`Document`]
    ///
    /// `stopwords` is only consulted for tokens without an `is_stop` flag.
    pub fn into_document(self, stopwords: &StopwordFilter) -> Result<Document> {
        let offsets = CharOffsets::new(&self.text);

        let mut raw_tokens = self.tokens;
        raw_tokens.sort_by_key(|t| t.start);

        let spans: Vec<AnnotatedSpan> = match self.sents {
            Some(spans) => spans,
            None if raw_tokens.is_empty() => Vec::new(),
            None => vec![AnnotatedSpan {
                start: 0,
                end: offsets.num_chars(),
            }],
        };

        let mut sentences = Vec::with_capacity(spans.len());
        for (sentence_idx, span) in spans.iter().enumerate() {
            let start = offsets.byte(span.start)?;
            let end = offsets.byte(span.end)?;
            if start > end {
                return Err(VocabError::MalformedDocument(format!(
                    "sentence {sentence_idx} ends before it starts"
                )));
            }
            sentences.push(Sentence::new(&self.text[start..end], start, end, Vec::new()));
        }

        for (token_idx, raw) in raw_tokens.into_iter().enumerate() {
            let start = offsets.byte(raw.start)?;
            let end = offsets.byte(raw.end)?;
            if start > end {
                return Err(VocabError::MalformedDocument(format!(
                    "token {token_idx} ends before it starts"
                )));
            }

            let sentence_idx = spans
                .iter()
                .position(|s| raw.start >= s.start && raw.start < s.end)
                .ok_or_else(|| {
                    VocabError::MalformedDocument(format!(
                        "token {token_idx} at char {} lies outside every sentence",
                        raw.start
                    ))
                })?;

            let surface = &self.text[start..end];
            let lemma = raw.lemma.unwrap_or_else(|| surface.to_string());
            let pos = PosTag::from_ud(&raw.pos);
            let is_stopword = raw
                .is_stop
                .unwrap_or_else(|| stopwords.matches(surface, &lemma));
            let is_punct = raw.is_punct.unwrap_or(pos == PosTag::Punctuation);

            let token = Token::new(surface, lemma, pos, start, end, sentence_idx, token_idx)
                .with_tag(raw.tag)
                .with_dep(DepRole::from_label(&raw.dep))
                .with_stopword(is_stopword)
                .with_punct(is_punct);

            sentences[sentence_idx].tokens.push(token);
        }

        Ok(Document::new(self.text, sentences))
    }
}

/// Maps character positions to byte positions
struct CharOffsets {
    bytes: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        let bytes = text
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { bytes }
    }

    fn num_chars(&self) -> usize {
        self.bytes.len() - 1
    }

    fn byte(&self, char_idx: usize) -> Result<usize> {
        self.bytes.get(char_idx).copied().ok_or_else(|| {
            VocabError::MalformedDocument(format!(
                "offset {char_idx} is past the end of a {}-character text",
                self.num_chars()
            ))
        })
    }
}
