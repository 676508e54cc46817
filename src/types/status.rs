//! View-models handed to the dashboard after a poll.

use serde::Serialize;

use crate::error::MonitorError;

/// Envelope for every poll result.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> Items<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// A selectable pipeline found during discovery.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub group: String,
    pub is_disabled: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Warning,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
}

impl Tag {
    pub fn warning(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TagKind::Warning,
        }
    }
}

/// Who triggered the build and with which message.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Change {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Serializable copy of the error that broke one project's evaluation.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&MonitorError> for FetchFailure {
    fn from(err: &MonitorError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status(),
        }
    }
}

impl From<MonitorError> for FetchFailure {
    fn from(err: MonitorError) -> Self {
        Self::from(&err)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatus {
    pub web_url: String,
    pub is_broken: bool,
    pub is_running: bool,
    pub is_waiting: bool,
    pub tags: Vec<Tag>,
    pub changes: Vec<Change>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProjectOutcome {
    Status(ProjectStatus),
    Failed { error: FetchFailure },
}

/// One dashboard tile. Identity fields are always present; the outcome is
/// either the derived build status or the error that prevented it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusItem {
    pub id: String,
    pub name: String,
    pub group: String,
    pub is_disabled: bool,
    #[serde(flatten)]
    pub outcome: ProjectOutcome,
}

impl ProjectStatusItem {
    pub fn status(&self) -> Option<&ProjectStatus> {
        match &self.outcome {
            ProjectOutcome::Status(status) => Some(status),
            ProjectOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        match &self.outcome {
            ProjectOutcome::Failed { error } => Some(error),
            ProjectOutcome::Status(_) => None,
        }
    }
}
