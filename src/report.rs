// ABOUTME: Record of one pipeline run: per-step outcomes plus non-fatal warnings.
// ABOUTME: Lets the operator see what ran, what was skipped, and what remote state needs cleanup.

use std::fmt;

use crate::pipeline::ReleaseStep;
use crate::types::ReleaseId;

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped,
    Failed,
    /// The operator's answer could not be read; the step never started.
    Unanswered,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepOutcome::Completed => "done",
            StepOutcome::Skipped => "skipped",
            StepOutcome::Failed => "FAILED",
            StepOutcome::Unanswered => "no answer",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: ReleaseStep,
    pub outcome: StepOutcome,
}

/// Outcomes in execution order, plus warnings that did not halt the run.
#[derive(Debug, Default)]
pub struct RunReport {
    records: Vec<StepRecord>,
    warnings: Vec<Warning>,
    live_release: Option<ReleaseId>,
}

impl RunReport {
    pub fn record(&mut self, step: ReleaseStep, outcome: StepOutcome) {
        self.records.push(StepRecord { step, outcome });
    }

    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Remember a release created by this run until a later step deletes it.
    pub fn set_live_release(&mut self, release: Option<ReleaseId>) {
        self.live_release = release;
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn outcome(&self, step: ReleaseStep) -> Option<StepOutcome> {
        self.records
            .iter()
            .find(|r| r.step == step)
            .map(|r| r.outcome)
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// A release this run created that still exists on the host.
    pub fn live_release(&self) -> Option<&ReleaseId> {
        self.live_release.as_ref()
    }

    pub fn halted(&self) -> bool {
        self.records
            .iter()
            .any(|r| matches!(r.outcome, StepOutcome::Failed | StepOutcome::Unanswered))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Release summary:")?;
        for record in &self.records {
            writeln!(f, "  {:<10} {}", record.outcome.to_string(), record.step.name())?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {}", warning.message)?;
        }
        if let Some(ref release) = self.live_release
            && self.halted()
        {
            writeln!(
                f,
                "  release {release} was created and still exists; inspect it and delete it by hand if needed"
            )?;
        }
        Ok(())
    }
}

/// A non-fatal problem noticed during the run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn library_absent(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LibraryAbsent,
            message: message.into(),
        }
    }

    pub fn upload_declined(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UploadDeclined,
            message: message.into(),
        }
    }

    pub fn smoke_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SmokeFailed,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The restricted library was not in the workspace to strip.
    LibraryAbsent,
    /// An asset with the same name exists and the operator kept it.
    UploadDeclined,
    /// The operator marked smoke checks as failed.
    SmokeFailed,
}
