//! Extraction pipeline
//!
//! Sentence qualification, token filtering, aggregation and enrichment,
//! plus the config file and its validation rules.

pub mod aggregator;
pub mod enricher;
pub mod filter;
pub mod observer;
pub mod qualifier;
pub mod runner;
pub mod spec;
pub mod validation;

pub use aggregator::{AggregateStats, EntryAggregator, Offer};
pub use enricher::DefinitionEnricher;
pub use filter::{FilterStats, Rejection, TokenFilter};
pub use observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver};
pub use qualifier::SentenceQualifier;
pub use runner::{Extraction, Pipeline, RunStats};
pub use spec::{ExtractionSpec, Preset};
pub use validation::{ValidationEngine, ValidationReport};
