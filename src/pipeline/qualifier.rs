//! Sentence qualification
//!
//! A sentence is a usable context source only if it has a nominal subject
//! and a root verb. Headlines, fragments and verbless clauses fail.

use crate::types::{DepRole, PosTag, Sentence};

/// Decides which sentences may contribute tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceQualifier {
    require_subject_verb: bool,
}

impl SentenceQualifier {
    pub fn new(require_subject_verb: bool) -> Self {
        Self {
            require_subject_verb,
        }
    }

    /// Accepts every sentence
    pub fn permissive() -> Self {
        Self::new(false)
    }

    pub fn is_active(&self) -> bool {
        self.require_subject_verb
    }

    pub fn accepts(&self, sentence: &Sentence) -> bool {
        !self.require_subject_verb || has_subject_and_root_verb(sentence)
    }
}

/// At least one `nsubj` token and at least one `ROOT` token tagged VERB
pub fn has_subject_and_root_verb(sentence: &Sentence) -> bool {
    let has_subject = sentence
        .tokens
        .iter()
        .any(|t| t.dep == DepRole::NominalSubject);
    let has_root_verb = sentence
        .tokens
        .iter()
        .any(|t| t.dep == DepRole::Root && t.pos == PosTag::Verb);
    has_subject && has_root_verb
}
