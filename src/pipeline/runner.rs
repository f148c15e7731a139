//! Pipeline runner: orchestrates stage execution.
//!
//! A [`Pipeline`] owns a linguistic engine, a dictionary and a compiled
//! policy. Each call to [`Pipeline::extract`] runs in isolation:
//!
//! 1. Analyze: the engine segments and annotates the text
//! 2. Select: qualify each sentence, filter each token, aggregate and
//!    enrich eligible tokens
//! 3. Finish: hand the entries over in first-insertion order
//!
//! The aggregation map is created per call and dropped with it; a single
//! `Pipeline` can serve many threads at once (see [`Pipeline::extract_batch`]).

use rayon::prelude::*;

use crate::dictionary::{LexicalDictionary, NoDictionary};
use crate::errors::{Result, VocabError};
use crate::nlp::LinguisticEngine;
use crate::pipeline::aggregator::{AggregateStats, EntryAggregator};
use crate::pipeline::enricher::DefinitionEnricher;
use crate::pipeline::filter::{FilterStats, TokenFilter};
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_ANALYZE,
    STAGE_FINISH, STAGE_SELECT,
};
use crate::pipeline::qualifier::SentenceQualifier;
use crate::types::{Document, EnrichmentMode, ExtractionConfig, LearnableEntry};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::debug_span!("pipeline_stage", stage = $name).entered();
    };
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub sentences: usize,
    pub sentences_rejected: usize,
    pub filter: FilterStats,
    pub aggregate: AggregateStats,
    pub entries: usize,
}

/// Entries plus the counters that produced them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub entries: Vec<LearnableEntry>,
    pub stats: RunStats,
}

// ============================================================================
// Pipeline
// ============================================================================

#[derive(Debug)]
pub struct Pipeline<E, D = NoDictionary> {
    engine: E,
    dictionary: D,
    config: ExtractionConfig,
    qualifier: SentenceQualifier,
    filter: TokenFilter,
}

impl<E: LinguisticEngine> Pipeline<E, NoDictionary> {
    /// Context-sentence pipeline; no dictionary needed
    ///
    /// Fails if `config` asks for definitions.
    pub fn without_dictionary(engine: E, config: ExtractionConfig) -> Result<Self> {
        Self::new(engine, NoDictionary, config)
    }
}

impl<E: LinguisticEngine, D: LexicalDictionary> Pipeline<E, D> {
    /// Build a pipeline, checking that definition mode has a usable dictionary
    pub fn new(engine: E, dictionary: D, config: ExtractionConfig) -> Result<Self> {
        if config.enrichment == EnrichmentMode::Definition && !dictionary.is_available() {
            return Err(VocabError::DictionaryUnavailable(
                "definition enrichment needs a loaded dictionary".into(),
            ));
        }
        Ok(Self {
            qualifier: SentenceQualifier::new(config.require_subject_verb),
            filter: TokenFilter::new(&config),
            engine,
            dictionary,
            config,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    /// Extract entries from raw text
    ///
    /// Blank input returns no entries without touching the engine.
    pub fn extract(&self, text: &str) -> Result<Vec<LearnableEntry>> {
        Ok(self.extract_with_observer(text, &mut NoopObserver)?.entries)
    }

    /// [`Pipeline::extract`] with stage callbacks and run counters
    pub fn extract_with_observer(
        &self,
        text: &str,
        observer: &mut impl PipelineObserver,
    ) -> Result<Extraction> {
        if text.trim().is_empty() {
            return Ok(Extraction::default());
        }

        // Stage 1: Analyze
        let doc = {
            trace_stage!(STAGE_ANALYZE);
            observer.on_stage_start(STAGE_ANALYZE);
            let clock = StageClock::start();
            let doc = self.engine.analyze(text)?;
            let report = StageReportBuilder::new(clock.elapsed())
                .items_in(text.len())
                .items_out(doc.sentences.len())
                .build();
            observer.on_stage_end(STAGE_ANALYZE, &report);
            observer.on_document(&doc);
            doc
        };

        Ok(self.select(&doc, observer))
    }

    /// Run selection on a document analyzed elsewhere
    pub fn extract_document(&self, doc: &Document) -> Vec<LearnableEntry> {
        self.select(doc, &mut NoopObserver).entries
    }

    /// Extract from many texts in parallel; each text gets its own
    /// aggregation map and the results keep input order
    pub fn extract_batch<S>(&self, texts: &[S]) -> Result<Vec<Vec<LearnableEntry>>>
    where
        S: AsRef<str> + Sync,
        E: Sync,
        D: Sync,
    {
        texts
            .par_iter()
            .map(|text| self.extract(text.as_ref()))
            .collect()
    }

    fn select(&self, doc: &Document, observer: &mut impl PipelineObserver) -> Extraction {
        let mut stats = RunStats::default();

        // Stage 2: Qualify, filter, aggregate
        let aggregator = {
            trace_stage!(STAGE_SELECT);
            observer.on_stage_start(STAGE_SELECT);
            let clock = StageClock::start();
            let enricher =
                DefinitionEnricher::new(&self.dictionary, self.config.definition_marker.as_str());
            let mut aggregator = EntryAggregator::new();

            for sentence in &doc.sentences {
                stats.sentences += 1;
                if !self.qualifier.accepts(sentence) {
                    stats.sentences_rejected += 1;
                    tracing::trace!(sentence = %sentence.trimmed(), "sentence rejected");
                    continue;
                }

                for token in &sentence.tokens {
                    let outcome = self.filter.check(token);
                    stats.filter.record(&outcome);
                    let key = match outcome {
                        Ok(key) => key,
                        Err(reason) => {
                            tracing::trace!(token = %token.text, %reason, "token skipped");
                            continue;
                        }
                    };

                    match self.config.enrichment {
                        EnrichmentMode::ContextSentence => {
                            aggregator.offer_context(&key, &sentence.text);
                        }
                        EnrichmentMode::Definition => {
                            aggregator.offer_definition(&key, &token.tag, &enricher);
                        }
                    }
                }
            }

            let report = StageReportBuilder::new(clock.elapsed())
                .items_in(stats.filter.seen)
                .items_out(aggregator.len())
                .build();
            observer.on_stage_end(STAGE_SELECT, &report);
            aggregator
        };

        // Stage 3: Finish
        trace_stage!(STAGE_FINISH);
        observer.on_stage_start(STAGE_FINISH);
        let clock = StageClock::start();
        stats.aggregate = aggregator.stats();
        let entries = aggregator.into_entries();
        stats.entries = entries.len();
        observer.on_stage_end(STAGE_FINISH, &StageReport::new(clock.elapsed()));
        observer.on_entries(&entries);

        tracing::debug!(
            sentences = stats.sentences,
            sentences_rejected = stats.sentences_rejected,
            tokens = stats.filter.seen,
            eligible = stats.filter.eligible,
            lookups = stats.aggregate.lookups,
            lookup_misses = stats.aggregate.discarded,
            entries = stats.entries,
            "extraction finished"
        );

        Extraction { entries, stats }
    }
}
