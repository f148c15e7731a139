//! Lexical dictionary components
//!
//! A dictionary maps `(lemma, part of speech)` to ranked senses. The
//! pipeline only ever reads the first sense.

pub mod wordnet;

pub use wordnet::WordNetDictionary;

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VocabError};

/// Dictionary part-of-speech category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictPos {
    Noun,
    Verb,
    #[serde(rename = "adj", alias = "adjective")]
    Adjective,
    #[serde(rename = "adv", alias = "adverb")]
    Adverb,
}

impl DictPos {
    /// Map a fine-grained Penn Treebank tag by its leading character
    ///
    /// `JJ*` → adjective, `VB*` → verb, `NN*` → noun, `RB*` → adverb.
    /// Anything else has no dictionary category.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.chars().next()? {
            'J' => Some(DictPos::Adjective),
            'V' => Some(DictPos::Verb),
            'N' => Some(DictPos::Noun),
            'R' => Some(DictPos::Adverb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DictPos::Noun => "noun",
            DictPos::Verb => "verb",
            DictPos::Adjective => "adj",
            DictPos::Adverb => "adv",
        }
    }

    pub const ALL: [DictPos; 4] = [
        DictPos::Noun,
        DictPos::Verb,
        DictPos::Adjective,
        DictPos::Adverb,
    ];
}

/// One dictionary meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Sense {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            examples: Vec::new(),
        }
    }
}

/// Lookup of ranked senses
pub trait LexicalDictionary {
    /// Senses of `lemma` as `pos`, most frequent first
    fn senses(&self, lemma: &str, pos: DictPos) -> Vec<Sense>;

    /// Whether the dictionary holds any data at all
    fn is_available(&self) -> bool {
        true
    }
}

impl<D: LexicalDictionary + ?Sized> LexicalDictionary for &D {
    fn senses(&self, lemma: &str, pos: DictPos) -> Vec<Sense> {
        (**self).senses(lemma, pos)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

impl<D: LexicalDictionary + ?Sized> LexicalDictionary for Box<D> {
    fn senses(&self, lemma: &str, pos: DictPos) -> Vec<Sense> {
        (**self).senses(lemma, pos)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Placeholder for pipelines that never look anything up
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDictionary;

impl LexicalDictionary for NoDictionary {
    fn senses(&self, _lemma: &str, _pos: DictPos) -> Vec<Sense> {
        Vec::new()
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// In-memory dictionary
///
/// The JSON form is `{ "lemma": { "noun": ["first sense", ...], ... } }`.
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    senses: FxHashMap<(String, DictPos), Vec<Sense>>,
}

impl MemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sense; earlier insertions rank higher
    pub fn insert(&mut self, lemma: &str, pos: DictPos, definition: impl Into<String>) {
        self.senses
            .entry((lemma.to_lowercase(), pos))
            .or_default()
            .push(Sense::new(definition));
    }

    pub fn with_sense(mut self, lemma: &str, pos: DictPos, definition: impl Into<String>) -> Self {
        self.insert(lemma, pos, definition);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FxHashMap<String, FxHashMap<DictPos, Vec<String>>> = serde_json::from_str(json)?;
        let mut dict = Self::new();
        for (lemma, by_pos) in raw {
            for (pos, definitions) in by_pos {
                for definition in definitions {
                    dict.insert(&lemma, pos, definition);
                }
            }
        }
        Ok(dict)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            VocabError::DictionaryUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }
}

impl LexicalDictionary for MemoryDictionary {
    fn senses(&self, lemma: &str, pos: DictPos) -> Vec<Sense> {
        self.senses
            .get(&(lemma.to_lowercase(), pos))
            .cloned()
            .unwrap_or_default()
    }

    fn is_available(&self) -> bool {
        !self.senses.is_empty()
    }
}
