use std::fmt;

use serde::{Deserialize, Serialize};

use super::Creator;

/// Build states reported by Buildkite.
///
/// Anything the provider adds later lands in `Other` and is treated like a
/// conclusive non-failing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    Running,
    Scheduled,
    Passed,
    Failed,
    Blocked,
    Canceled,
    Canceling,
    Skipped,
    NotRun,
    Failing,
    #[serde(other)]
    Other,
}

impl BuildState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Scheduled => "scheduled",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Blocked => "blocked",
            Self::Canceled => "canceled",
            Self::Canceling => "canceling",
            Self::Skipped => "skipped",
            Self::NotRun => "not_run",
            Self::Failing => "failing",
            Self::Other => "unknown",
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BuildPipeline {
    pub name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Build {
    pub state: BuildState,
    pub web_url: String,
    pub pipeline: Option<BuildPipeline>,
    pub message: Option<String>,
    pub creator: Option<Creator>,
}

impl Build {
    pub fn pipeline_name(&self) -> Option<&str> {
        self.pipeline.as_ref().and_then(|p| p.name.as_deref())
    }
}
