//! Entry aggregation
//!
//! One [`LearnableEntry`] per lowercase lemma. Entries live in a `Vec` in
//! order of first successful insertion and an `FxHashMap` indexes them by
//! key, so output order is deterministic for a given document.

use rustc_hash::FxHashMap;

use crate::dictionary::LexicalDictionary;
use crate::pipeline::enricher::{prefers_context, DefinitionEnricher};
use crate::types::LearnableEntry;

/// What happened to an offered token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// New entry created
    Inserted,
    /// Context sentence replaced by a longer one
    Replaced,
    /// Existing entry left untouched
    Kept,
    /// Frequency of an existing entry incremented
    Counted,
    /// No definition found; nothing recorded
    Discarded,
}

/// Per-run aggregation tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub inserted: usize,
    pub replaced: usize,
    pub kept: usize,
    pub counted: usize,
    pub lookups: usize,
    pub discarded: usize,
}

impl AggregateStats {
    fn record(&mut self, offer: Offer) {
        match offer {
            Offer::Inserted => self.inserted += 1,
            Offer::Replaced => self.replaced += 1,
            Offer::Kept => self.kept += 1,
            Offer::Counted => self.counted += 1,
            Offer::Discarded => self.discarded += 1,
        }
    }
}

/// Insertion-ordered, lemma-keyed entry map for one analysis run
#[derive(Debug, Default)]
pub struct EntryAggregator {
    key_to_idx: FxHashMap<String, usize>,
    entries: Vec<LearnableEntry>,
    stats: AggregateStats,
}

impl EntryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            key_to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            entries: Vec::with_capacity(capacity),
            stats: AggregateStats::default(),
        }
    }

    fn insert(&mut self, entry: LearnableEntry) {
        self.key_to_idx
            .insert(entry.word_or_phrase.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Context policy: first sighting inserts the trimmed sentence, later
    /// sightings replace it only with a strictly longer sentence
    pub fn offer_context(&mut self, key: &str, sentence: &str) -> Offer {
        let offer = match self.key_to_idx.get(key) {
            None => {
                self.insert(LearnableEntry::with_context(key, sentence.trim()));
                Offer::Inserted
            }
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                if prefers_context(sentence, &entry.context_sentence) {
                    entry.context_sentence = sentence.trim().to_string();
                    Offer::Replaced
                } else {
                    Offer::Kept
                }
            }
        };
        self.stats.record(offer);
        offer
    }

    /// Definition policy: a known key only gains frequency; an unknown key
    /// is looked up and dropped without trace if the lookup fails
    pub fn offer_definition<D: LexicalDictionary + ?Sized>(
        &mut self,
        key: &str,
        tag: &str,
        enricher: &DefinitionEnricher<'_, D>,
    ) -> Offer {
        let offer = match self.key_to_idx.get(key) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                entry.frequency = Some(entry.frequency.unwrap_or(1).saturating_add(1));
                Offer::Counted
            }
            None => {
                self.stats.lookups += 1;
                match enricher.enrich(key, tag) {
                    Some(definition) => {
                        self.insert(LearnableEntry::with_definition(key, definition));
                        Offer::Inserted
                    }
                    None => Offer::Discarded,
                }
            }
        };
        self.stats.record(offer);
        offer
    }

    pub fn get(&self, key: &str) -> Option<&LearnableEntry> {
        self.key_to_idx.get(key).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    /// Entries in first-insertion order
    pub fn into_entries(self) -> Vec<LearnableEntry> {
        self.entries
    }
}
