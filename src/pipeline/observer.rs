//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. The runner always emits a `tracing` span per stage as well;
//! observers are for callers that want the numbers programmatically.

use std::time::{Duration, Instant};

use crate::types::{Document, LearnableEntry};

pub const STAGE_ANALYZE: &str = "analyze";
pub const STAGE_SELECT: &str = "select";
pub const STAGE_FINISH: &str = "finish";

/// Wall-clock timer for one stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a stage did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageReport {
    pub elapsed: Duration,
    /// Items consumed (sentences or tokens, depending on the stage)
    pub items_in: usize,
    /// Items produced
    pub items_out: usize,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn items_in(mut self, n: usize) -> Self {
        self.report.items_in = n;
        self
    }

    pub fn items_out(mut self, n: usize) -> Self {
        self.report.items_out = n;
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

/// Stage-boundary callbacks; every method defaults to a no-op
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    fn on_document(&mut self, _doc: &Document) {}

    fn on_entries(&mut self, _entries: &[LearnableEntry]) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records the report of every finished stage, in order
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, r)| r)
    }

    pub fn total(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, *report));
    }
}
