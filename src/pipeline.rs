//! Sequential stage runner with per-stage failure isolation.
//!
//! A [`Pipeline`] executes its stages strictly in declaration order, threading
//! one [`PipelineContext`] through them. A stage that fails aborts the run
//! unless it is skippable, in which case the failure is recorded in the
//! context and the next stage starts.

use indexmap::IndexMap;
use log::{debug, error, info, warn};

use crate::error::{Error, Result};

/// Outcome value stored in the pipeline context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextValue {
    Flag(bool),
    Count(usize),
}

impl ContextValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Flag(_) => "flag",
            Self::Count(_) => "count",
        }
    }
}

/// Mutable record shared by the stages of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineContext {
    values: IndexMap<String, ContextValue>,
    skipped: IndexMap<String, String>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `key`. A key keeps the variant it was first written with.
    ///
    /// # Errors
    /// * `Error::ContextTypeMismatch` if `key` holds a value of another variant
    pub fn insert<K: Into<String>>(&mut self, key: K, value: ContextValue) -> Result<()> {
        let key = key.into();
        if let Some(existing) = self.values.get(&key) {
            if existing.kind() != value.kind() {
                return Err(Error::ContextTypeMismatch { key, existing: existing.kind() });
            }
        }
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<ContextValue> {
        self.values.get(key).copied()
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            ContextValue::Flag(value) => Some(value),
            ContextValue::Count(_) => None,
        }
    }

    pub fn count(&self, key: &str) -> Option<usize> {
        match self.get(key)? {
            ContextValue::Count(value) => Some(value),
            ContextValue::Flag(_) => None,
        }
    }

    /// Entries in write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ContextValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn record_skip<T: Into<String>, R: Into<String>>(&mut self, stage_title: T, reason: R) {
        self.skipped.insert(stage_title.into(), reason.into());
    }

    /// Reasons of skippable stages that failed, keyed by stage title.
    pub fn skip_reasons(&self) -> &IndexMap<String, String> {
        &self.skipped
    }
}

/// Progress state of a stage as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// The stage is enabled and about to run.
    Enabled,
    /// A skippable stage failed; the run continues.
    Skipped,
    Succeeded,
    /// A non-skippable stage failed; the run aborts.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub title: String,
    pub state: StageState,
    pub error_detail: Option<String>,
}

impl StageReport {
    fn new(title: &str, state: StageState, error_detail: Option<String>) -> Self {
        Self { title: title.to_string(), state, error_detail }
    }
}

/// Receives stage reports for progress rendering.
pub trait PipelineObserver {
    fn on_report(&mut self, report: &StageReport);
}

impl PipelineObserver for Vec<StageReport> {
    fn on_report(&mut self, report: &StageReport) {
        self.push(report.clone());
    }
}

type StageAction<'a> = Box<dyn FnMut(&mut PipelineContext) -> Result<()> + 'a>;
type EnablePredicate<'a> = Box<dyn Fn() -> bool + 'a>;

/// One unit of work of a pipeline.
pub struct Stage<'a> {
    title: String,
    skippable: bool,
    outcome_key: Option<String>,
    enabled: EnablePredicate<'a>,
    action: StageAction<'a>,
}

impl<'a> Stage<'a> {
    /// Creates an always-enabled, non-skippable stage.
    pub fn new<T, F>(title: T, action: F) -> Self
    where
        T: Into<String>,
        F: FnMut(&mut PipelineContext) -> Result<()> + 'a,
    {
        Self {
            title: title.into(),
            skippable: false,
            outcome_key: None,
            enabled: Box::new(|| true),
            action: Box::new(action),
        }
    }

    /// Lets the pipeline continue when this stage fails.
    pub fn skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    /// Runs the stage only when `predicate` returns true.
    pub fn enabled_when<F: Fn() -> bool + 'a>(mut self, predicate: F) -> Self {
        self.enabled = Box::new(predicate);
        self
    }

    /// Writes `Flag(true)` to `key` on success and `Flag(false)` on a
    /// skipped failure.
    pub fn records_outcome<K: Into<String>>(mut self, key: K) -> Self {
        self.outcome_key = Some(key.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_skippable(&self) -> bool {
        self.skippable
    }

    pub fn is_enabled(&self) -> bool {
        (self.enabled)()
    }
}

impl std::fmt::Debug for Stage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("title", &self.title)
            .field("skippable", &self.skippable)
            .field("outcome_key", &self.outcome_key)
            .finish_non_exhaustive()
    }
}

/// Ordered list of stages.
#[derive(Debug, Default)]
pub struct Pipeline<'a> {
    stages: Vec<Stage<'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(stages: Vec<Stage<'a>>) -> Self {
        Self { stages }
    }

    pub fn push(&mut self, stage: Stage<'a>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every enabled stage in order.
    ///
    /// # Returns
    /// * `Result<PipelineContext>` - Context after the last stage
    ///
    /// # Errors
    /// The error of the first non-skippable stage that fails, unchanged.
    /// Stages after it never run.
    pub fn run(self, observer: &mut dyn PipelineObserver) -> Result<PipelineContext> {
        let mut context = PipelineContext::new();

        for mut stage in self.stages {
            if !stage.is_enabled() {
                debug!("Stage '{}' is disabled", stage.title);
                continue;
            }

            observer.on_report(&StageReport::new(&stage.title, StageState::Enabled, None));
            info!("Running stage '{}'", stage.title);

            let outcome = (stage.action)(&mut context).and_then(|()| {
                record_outcome(&mut context, stage.outcome_key.as_deref(), true)
            });

            match outcome {
                Ok(()) => {
                    observer.on_report(&StageReport::new(
                        &stage.title,
                        StageState::Succeeded,
                        None,
                    ));
                }
                Err(err) if stage.skippable => {
                    let reason = err.to_string();
                    warn!("Stage '{}' skipped: {}", stage.title, reason);
                    // A key already holding another variant keeps it.
                    if let Err(err) =
                        record_outcome(&mut context, stage.outcome_key.as_deref(), false)
                    {
                        warn!("Outcome of stage '{}' not recorded: {}", stage.title, err);
                    }
                    context.record_skip(stage.title.as_str(), reason.as_str());
                    observer.on_report(&StageReport::new(
                        &stage.title,
                        StageState::Skipped,
                        Some(reason),
                    ));
                }
                Err(err) => {
                    error!("Stage '{}' failed: {}", stage.title, err);
                    observer.on_report(&StageReport::new(
                        &stage.title,
                        StageState::Failed,
                        Some(err.to_string()),
                    ));
                    return Err(err);
                }
            }
        }

        Ok(context)
    }
}

fn record_outcome(context: &mut PipelineContext, key: Option<&str>, succeeded: bool) -> Result<()> {
    match key {
        Some(key) => context.insert(key, ContextValue::Flag(succeeded)),
        None => Ok(()),
    }
}
