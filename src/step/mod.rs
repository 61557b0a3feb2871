// ABOUTME: Confirmation-gated step runner and the error that halts a release.
// ABOUTME: run_step asks the operator, runs or skips the operation, and never swallows its error.

use std::fmt;
use std::future::Future;

use crate::operator::{Confirmation, Operator};

/// A step failed in a way only a human can fix. Halts the pipeline.
///
/// Carries what was attempted, the likely causes, and a remediation hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailed {
    attempted: String,
    causes: Vec<String>,
    remedy: Option<String>,
}

impl StepFailed {
    pub fn new(attempted: impl Into<String>) -> Self {
        Self {
            attempted: attempted.into(),
            causes: Vec::new(),
            remedy: None,
        }
    }

    /// Add a likely cause.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Set the suggested remediation.
    pub fn remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remedy = Some(remedy.into());
        self
    }

    pub fn attempted(&self) -> &str {
        &self.attempted
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn remediation(&self) -> Option<&str> {
        self.remedy.as_deref()
    }
}

impl fmt::Display for StepFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attempted)?;
        if !self.causes.is_empty() {
            write!(f, "\nLikely causes:")?;
            for cause in &self.causes {
                write!(f, "\n  - {cause}")?;
            }
        }
        if let Some(ref remedy) = self.remedy {
            write!(f, "\nTry: {remedy}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StepFailed {}

/// Ask the operator whether to run `operation`, then run it or skip it.
///
/// Returns `Ok(Some(value))` when the operator agreed and the operation
/// succeeded, `Ok(None)` when the operator declined. An error from the
/// operation is returned exactly as produced.
pub async fn run_step<O, F, Fut, T>(
    operator: &O,
    description: &str,
    operation: F,
) -> Result<Option<T>, StepFailed>
where
    O: Operator + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, StepFailed>>,
{
    debug_assert!(!description.is_empty(), "step description must not be empty");

    let answer = operator
        .confirm(&format!("Run step: {description}?"))
        .map_err(|e| {
            StepFailed::new(format!("Could not read the operator's answer for '{description}'"))
                .cause(e.to_string())
                .remedy("run the release from an interactive terminal")
        })?;

    if answer == Confirmation::No {
        tracing::info!(step = description, "skipped by operator");
        return Ok(None);
    }

    operator.tell(&format!("STEP: {description}"));
    tracing::info!(step = description, "starting");

    operation().await.map(Some)
}
