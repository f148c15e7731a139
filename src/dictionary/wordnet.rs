//! WordNet database reader
//!
//! Reads the plain-text WordNet 3.x database (`index.noun`, `data.noun`,
//! and the `verb`, `adj`, `adv` counterparts). Index lines list a lemma's
//! synset offsets in sense-frequency order; each offset is a byte position
//! into the matching data file, whose line ends in `| gloss`.
//!
//! Index lines are parsed eagerly; data lines are only parsed on lookup.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use super::{DictPos, LexicalDictionary, Sense};
use crate::errors::{Result, VocabError};

/// Index and data for one part of speech
#[derive(Debug, Default)]
struct PosTable {
    /// lemma -> synset offsets, most frequent sense first
    index: FxHashMap<String, Vec<usize>>,
    data: Vec<u8>,
}

impl PosTable {
    fn load(dir: &Path, pos: DictPos) -> Result<Self> {
        let index_path = dir.join(format!("index.{}", pos.as_str()));
        let data_path = dir.join(format!("data.{}", pos.as_str()));

        let index_text = fs::read_to_string(&index_path).map_err(|e| {
            VocabError::DictionaryUnavailable(format!("cannot read {}: {e}", index_path.display()))
        })?;
        let data = fs::read(&data_path).map_err(|e| {
            VocabError::DictionaryUnavailable(format!("cannot read {}: {e}", data_path.display()))
        })?;

        let mut index = FxHashMap::default();
        for line in index_text.lines() {
            // license header lines start with whitespace
            if line.is_empty() || line.starts_with(' ') {
                continue;
            }
            if let Some((lemma, offsets)) = parse_index_line(line) {
                index.insert(lemma, offsets);
            }
        }

        Ok(Self { index, data })
    }

    fn line_at(&self, offset: usize) -> Option<&str> {
        let rest = self.data.get(offset..)?;
        let end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        std::str::from_utf8(&rest[..end]).ok()
    }

    fn senses(&self, lemma: &str) -> Vec<Sense> {
        let Some(offsets) = self.index.get(lemma) else {
            return Vec::new();
        };
        offsets
            .iter()
            .filter_map(|&offset| self.line_at(offset))
            .filter_map(parse_gloss)
            .collect()
    }
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt synset_offset...`
fn parse_index_line(line: &str) -> Option<(String, Vec<usize>)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let lemma = fields.first()?.to_string();
    let synset_cnt: usize = fields.get(2)?.parse().ok()?;
    let p_cnt: usize = fields.get(3)?.parse().ok()?;
    // skip pointer symbols, sense_cnt and tagsense_cnt
    let first_offset = 4 + p_cnt + 2;
    let offsets = fields
        .get(first_offset..first_offset + synset_cnt)?
        .iter()
        .map(|f| f.parse().ok())
        .collect::<Option<Vec<usize>>>()?;
    Some((lemma, offsets))
}

/// Split `definition; "example"; "example"` out of a data line
fn parse_gloss(line: &str) -> Option<Sense> {
    let (_, gloss) = line.split_once(" | ")?;
    let gloss = gloss.trim();

    let (definition, rest) = match gloss.find("; \"") {
        Some(idx) => (&gloss[..idx], &gloss[idx + 1..]),
        None => (gloss, ""),
    };

    let examples = rest
        .split('"')
        .skip(1)
        .step_by(2)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect();

    Some(Sense {
        definition: definition.trim().to_string(),
        examples,
    })
}

/// A WordNet database loaded from disk
#[derive(Debug, Default)]
pub struct WordNetDictionary {
    tables: FxHashMap<DictPos, PosTable>,
}

impl WordNetDictionary {
    /// Load all four parts of speech from a WordNet `dict/` directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(VocabError::DictionaryUnavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut tables = FxHashMap::default();
        for pos in DictPos::ALL {
            tables.insert(pos, PosTable::load(dir, pos)?);
        }

        let lemmas: usize = tables.values().map(|t| t.index.len()).sum();
        tracing::info!(dir = %dir.display(), lemmas, "loaded WordNet database");

        Ok(Self { tables })
    }

    /// Number of (lemma, part of speech) pairs in the index
    pub fn len(&self) -> usize {
        self.tables.values().map(|t| t.index.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LexicalDictionary for WordNetDictionary {
    fn senses(&self, lemma: &str, pos: DictPos) -> Vec<Sense> {
        let key = lemma.to_lowercase().replace(' ', "_");
        self.tables
            .get(&pos)
            .map(|table| table.senses(&key))
            .unwrap_or_default()
    }

    fn is_available(&self) -> bool {
        !self.is_empty()
    }
}
