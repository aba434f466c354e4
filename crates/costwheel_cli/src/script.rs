//! Feed scripts.
//!
//! A script is a JSON document of timed steps:
//!
//! ```json
//! {
//!   "steps": [
//!     { "at_ms": 0, "batch": [
//!       { "kind": "added", "record": { "id": "a", "name": "rent", "cost": 100 } }
//!     ] },
//!     { "at_ms": 900, "hover": "a" },
//!     { "at_ms": 1200, "click": "a" }
//!   ]
//! }
//! ```
//!
//! Removal events only need the record id.

use costwheel_core::ChangeEvent;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The file could not be read.
    #[error("cannot read script {path}: {source}")]
    Io {
        /// Script path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid script document.
    #[error("malformed script: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but cannot be replayed.
    #[error("invalid script: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },
}

/// What a step does.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Publish one feed batch.
    Batch(Vec<ChangeEvent>),
    /// Pointer enters a slice.
    Hover(String),
    /// Pointer leaves a slice.
    HoverEnd(String),
    /// Slice is clicked.
    Click(String),
}

/// One timed step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Milliseconds from the start of the replay.
    pub at_ms: u64,
    /// The action.
    #[serde(flatten)]
    pub action: Action,
}

impl Step {
    /// The step time.
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// A parsed script, steps in time order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Timed steps.
    pub steps: Vec<Step>,
}

impl Script {
    /// Parses a script from JSON text.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    /// Loads a script from a file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        for pair in self.steps.windows(2) {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(ScriptError::Invalid {
                    message: format!(
                        "steps must be in time order: {}ms comes after {}ms",
                        pair[1].at_ms, pair[0].at_ms
                    ),
                });
            }
        }
        Ok(())
    }

    /// All batches in order, ignoring pointer steps.
    pub fn batches(&self) -> impl Iterator<Item = &[ChangeEvent]> + '_ {
        self.steps.iter().filter_map(|step| match &step.action {
            Action::Batch(events) => Some(events.as_slice()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costwheel_core::ChangeKind;

    #[test]
    fn parses_every_action() {
        let script = Script::parse(
            r#"{"steps": [
                {"at_ms": 0, "batch": [
                    {"kind": "added", "record": {"id": "a", "name": "rent", "cost": 100}},
                    {"kind": "removed", "record": {"id": "b"}}
                ]},
                {"at_ms": 10, "hover": "a"},
                {"at_ms": 20, "hover_end": "a"},
                {"at_ms": 30, "click": "a"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 4);
        let Action::Batch(events) = &script.steps[0].action else {
            panic!("expected batch");
        };
        assert_eq!(events[1].kind, ChangeKind::Removed);
        assert_eq!(events[1].record.id.as_str(), "b");
        assert_eq!(script.steps[2].action, Action::HoverEnd("a".to_string()));
        assert_eq!(script.steps[3].at(), Duration::from_millis(30));
        assert_eq!(script.batches().count(), 1);
    }

    #[test]
    fn rejects_out_of_order_steps() {
        let err = Script::parse(
            r#"{"steps": [{"at_ms": 50, "hover": "a"}, {"at_ms": 10, "click": "a"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::Invalid { .. }));
    }

    #[test]
    fn rejects_unknown_action() {
        let err = Script::parse(r#"{"steps": [{"at_ms": 0, "explode": "a"}]}"#).unwrap_err();
        assert!(matches!(err, ScriptError::Json(_)));
    }
}
