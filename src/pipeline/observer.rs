//! Pipeline observer: hooks for logging and profiling.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic: timing stages, capturing intermediate token lists, or
//! emitting structured log events.

use std::time::{Duration, Instant};

use crate::error::Stage;

/// Measures how long a stage runs
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

/// Summary of one completed stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    documents: Option<usize>,
    tokens_in: Option<usize>,
    tokens_out: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Documents the stage handled
    pub fn documents(&self) -> Option<usize> {
        self.documents
    }

    /// Tokens present before the stage ran
    pub fn tokens_in(&self) -> Option<usize> {
        self.tokens_in
    }

    /// Tokens present after the stage ran
    pub fn tokens_out(&self) -> Option<usize> {
        self.tokens_out
    }
}

/// Builder for [`StageReport`]s carrying optional counters
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn documents(mut self, n: usize) -> Self {
        self.report.documents = Some(n);
        self
    }

    pub fn tokens_in(mut self, n: usize) -> Self {
        self.report.tokens_in = Some(n);
        self
    }

    pub fn tokens_out(mut self, n: usize) -> Self {
        self.report.tokens_out = Some(n);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

/// Receives stage boundary notifications. Every hook defaults to a no-op.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: Stage) {}

    fn on_stage_end(&mut self, _stage: Stage, _report: &StageReport) {}

    /// Token lists as they stand after `stage`
    fn on_tokens(&mut self, _stage: Stage, _documents: &[Vec<String>]) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records a report for every finished stage
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(Stage, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(Stage, StageReport)] {
        &self.reports
    }

    /// The last report recorded for `stage`
    pub fn report(&self, stage: Stage) -> Option<&StageReport> {
        self.reports
            .iter()
            .rev()
            .find(|(s, _)| *s == stage)
            .map(|(_, r)| r)
    }

    /// Sum of all recorded stage durations
    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: Stage, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

/// Observer that emits a `tracing` event at the end of every stage
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage_end(&mut self, stage: Stage, report: &StageReport) {
        tracing::debug!(
            stage = stage.as_str(),
            elapsed_us = report.elapsed().as_micros() as u64,
            documents = report.documents(),
            tokens_in = report.tokens_in(),
            tokens_out = report.tokens_out(),
            "stage finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_builder() {
        let report = StageReportBuilder::new(Duration::from_millis(3))
            .documents(2)
            .tokens_in(10)
            .tokens_out(7)
            .build();

        assert_eq!(report.elapsed(), Duration::from_millis(3));
        assert_eq!(report.documents(), Some(2));
        assert_eq!(report.tokens_in(), Some(10));
        assert_eq!(report.tokens_out(), Some(7));
        assert_eq!(StageReport::new(Duration::ZERO).documents(), None);
    }

    #[test]
    fn test_timing_observer_records_in_order() {
        let mut obs = StageTimingObserver::new();
        obs.on_stage_end(Stage::Normalize, &StageReport::new(Duration::from_millis(1)));
        obs.on_stage_end(Stage::Filter, &StageReport::new(Duration::from_millis(2)));

        let stages: Vec<Stage> = obs.reports().iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, vec![Stage::Normalize, Stage::Filter]);
        assert_eq!(obs.total_elapsed(), Duration::from_millis(3));
        assert!(obs.report(Stage::Filter).is_some());
        assert!(obs.report(Stage::Lemmatize).is_none());
    }

    #[test]
    fn test_stage_clock_moves_forward() {
        let clock = StageClock::start();
        let first = clock.elapsed();
        assert!(clock.elapsed() >= first);
    }
}
