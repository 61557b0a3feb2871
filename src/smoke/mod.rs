// ABOUTME: Guided manual smoke test of an installed build.
// ABOUTME: Walks the operator through a checklist and records their pass/fail verdict.

use nonempty::NonEmpty;
use std::path::Path;

use crate::operator::{Operator, OperatorError};

/// Built-in checklist used when the settings file does not provide one.
pub fn default_checklist() -> NonEmpty<String> {
    NonEmpty {
        head: "Unzip the archive into a fresh directory and start the script generator".to_string(),
        tail: vec![
            "Load a script definition and check the parameter table appears".to_string(),
            "Enter valid parameters and check no validation errors are shown".to_string(),
            "Enter an invalid parameter and check the row is highlighted with a reason"
                .to_string(),
            "Generate a script and check the output file is written and opens".to_string(),
            "Save the parameters, reload them, and check the values match".to_string(),
            "Open the help page from the menu".to_string(),
        ],
    }
}

/// The operator's judgment; never checked by the machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmokeVerdict {
    failures: Vec<String>,
}

impl SmokeVerdict {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Checks the operator marked as failed, in checklist order.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Run the checklist against the build packaged at `archive`.
pub fn guide<O: Operator + ?Sized>(
    operator: &O,
    archive: &Path,
    checklist: &NonEmpty<String>,
) -> Result<SmokeVerdict, OperatorError> {
    operator.tell(&format!(
        "Install the build from {} on a clean machine, then work through these checks.",
        archive.display()
    ));

    let total = checklist.len();
    let mut failures = Vec::new();
    for (index, check) in checklist.iter().enumerate() {
        let answer = operator.confirm(&format!("[{}/{}] {} - passed?", index + 1, total, check))?;
        if !answer.is_yes() {
            failures.push(check.clone());
        }
    }

    let verdict = SmokeVerdict { failures };
    if verdict.passed() {
        operator.tell("Smoke test passed.");
    } else {
        operator.tell(&format!(
            "Smoke test failed {} of {} checks:",
            verdict.failures.len(),
            total
        ));
        for failure in &verdict.failures {
            operator.tell(&format!("  - {failure}"));
        }
    }

    Ok(verdict)
}
