//! Deterministic fixtures for pipeline tests
//!
//! Real taggers are nondeterministic across model versions, so the pipeline
//! is tested against hand-annotated sentences and two fake engines.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::Result;
use crate::nlp::LinguisticEngine;
use crate::types::{DepRole, Document, PosTag, Sentence, Token};

struct PendingToken {
    surface: String,
    lemma: String,
    pos: &'static str,
    tag: &'static str,
    dep: &'static str,
    is_stopword: bool,
}

/// Builds one annotated sentence; token offsets are found by scanning the
/// text left to right
pub struct SentenceBuilder {
    text: String,
    tokens: Vec<PendingToken>,
}

impl SentenceBuilder {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tokens: Vec::new(),
        }
    }

    pub fn token(
        mut self,
        surface: &str,
        lemma: &str,
        pos: &'static str,
        tag: &'static str,
        dep: &'static str,
    ) -> Self {
        self.tokens.push(PendingToken {
            surface: surface.to_string(),
            lemma: lemma.to_string(),
            pos,
            tag,
            dep,
            is_stopword: false,
        });
        self
    }

    /// Mark the last token as a stop word
    pub fn stop(mut self) -> Self {
        if let Some(last) = self.tokens.last_mut() {
            last.is_stopword = true;
        }
        self
    }

    pub fn build(self) -> Sentence {
        self.build_at(0, 0, 0)
    }

    fn build_at(self, base: usize, sentence_idx: usize, first_token: usize) -> Sentence {
        let mut cursor = 0;
        let mut tokens = Vec::with_capacity(self.tokens.len());
        for (i, pending) in self.tokens.into_iter().enumerate() {
            let rel = self.text[cursor..]
                .find(&pending.surface)
                .map(|p| p + cursor)
                .unwrap_or_else(|| panic!("{:?} not found in {:?}", pending.surface, self.text));
            cursor = rel + pending.surface.len();
            let pos = PosTag::from_ud(pending.pos);
            tokens.push(
                Token::new(
                    pending.surface,
                    pending.lemma,
                    pos,
                    base + rel,
                    base + cursor,
                    sentence_idx,
                    first_token + i,
                )
                .with_tag(pending.tag)
                .with_dep(DepRole::from_label(pending.dep))
                .with_stopword(pending.is_stopword),
            );
        }
        let end = base + self.text.len();
        Sentence::new(self.text, base, end, tokens)
    }
}

/// Joins sentences with a single space into one document
#[derive(Default)]
pub struct DocumentBuilder {
    sentences: Vec<SentenceBuilder>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sentence(mut self, sentence: SentenceBuilder) -> Self {
        self.sentences.push(sentence);
        self
    }

    pub fn build(self) -> Document {
        let mut text = String::new();
        let mut sentences = Vec::new();
        let mut next_token = 0;
        for (idx, builder) in self.sentences.into_iter().enumerate() {
            if !text.is_empty() {
                text.push(' ');
            }
            let base = text.len();
            text.push_str(&builder.text);
            let sentence = builder.build_at(base, idx, next_token);
            next_token += sentence.len();
            sentences.push(sentence);
        }
        Document::new(text, sentences)
    }
}

/// Returns the same document for any input and counts calls
#[derive(Debug)]
pub struct FixedEngine {
    doc: Document,
    calls: AtomicUsize,
}

impl FixedEngine {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LinguisticEngine for FixedEngine {
    fn analyze(&self, _text: &str) -> Result<Document> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.doc.clone())
    }
}

/// Splits on `.`, `!`, `?` and whitespace; the first word of a sentence is a
/// noun subject, the second a root verb, the rest alternate noun/adjective.
/// Lemmas are the raw words, so arbitrary input reaches the filters intact.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceEngine;

impl WhitespaceEngine {
    fn annotate(position: usize) -> (PosTag, &'static str, DepRole) {
        match position {
            0 => (PosTag::Noun, "NN", DepRole::NominalSubject),
            1 => (PosTag::Verb, "VBZ", DepRole::Root),
            n if n % 2 == 0 => (PosTag::Noun, "NN", DepRole::Other("dobj".into())),
            _ => (PosTag::Adjective, "JJ", DepRole::Other("amod".into())),
        }
    }
}

impl LinguisticEngine for WhitespaceEngine {
    fn analyze(&self, text: &str) -> Result<Document> {
        let mut sentences = Vec::new();
        let mut token_idx = 0;
        let mut start = 0;

        let mut bounds: Vec<usize> = text
            .char_indices()
            .filter(|(_, c)| matches!(c, '.' | '!' | '?'))
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        bounds.push(text.len());

        for end in bounds {
            if end <= start {
                continue;
            }
            let span = &text[start..end];
            let sentence_idx = sentences.len();
            let mut tokens = Vec::new();
            let mut word_start = None;
            for (i, c) in span.char_indices().chain(std::iter::once((span.len(), ' '))) {
                let is_break = c.is_whitespace() || matches!(c, '.' | '!' | '?');
                match (word_start, is_break) {
                    (None, false) => word_start = Some(i),
                    (Some(ws), true) => {
                        let word = &span[ws..i];
                        let (pos, tag, dep) = Self::annotate(tokens.len());
                        tokens.push(
                            Token::new(word, word, pos, start + ws, start + i, sentence_idx, token_idx)
                                .with_tag(tag)
                                .with_dep(dep),
                        );
                        token_idx += 1;
                        word_start = None;
                    }
                    _ => {}
                }
            }
            if !tokens.is_empty() {
                sentences.push(Sentence::new(span, start, end, tokens));
            }
            start = end;
        }

        Ok(Document::new(text, sentences))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_builder_offsets() {
        let s = SentenceBuilder::new("the cat and the hat")
            .token("the", "the", "DET", "DT", "det")
            .stop()
            .token("cat", "cat", "NOUN", "NN", "nsubj")
            .token("the", "the", "DET", "DT", "det")
            .build();
        assert_eq!(s.tokens[1].start, 4);
        assert_eq!(s.tokens[2].start, 12);
        assert!(s.tokens[0].is_stopword);
        assert!(!s.tokens[1].is_stopword);
    }

    #[test]
    fn test_document_builder_shifts_offsets() {
        let doc = DocumentBuilder::new()
            .sentence(SentenceBuilder::new("A b.").token("b", "b", "NOUN", "NN", "nsubj"))
            .sentence(SentenceBuilder::new("C d.").token("d", "d", "NOUN", "NN", "nsubj"))
            .build();
        assert_eq!(doc.text, "A b. C d.");
        let d = &doc.sentences[1].tokens[0];
        assert_eq!(&doc.text[d.start..d.end], "d");
        assert_eq!(d.sentence_idx, 1);
        assert_eq!(d.token_idx, 1);
    }

    #[test]
    fn test_whitespace_engine() {
        let doc = WhitespaceEngine.analyze("cats chase mice. birds sing").unwrap();
        assert_eq!(doc.sentences.len(), 2);
        assert_eq!(doc.sentences[0].text, "cats chase mice.");
        assert_eq!(doc.sentences[0].tokens[1].dep, DepRole::Root);
        assert_eq!(doc.sentences[1].tokens[0].text, "birds");
        for token in doc.tokens() {
            assert_eq!(&doc.text[token.start..token.end], token.text);
        }
    }
}
