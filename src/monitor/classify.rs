use crate::types::{BuildState, Tag};

const CANCELED_TAG: &str = "Canceled";
const NOT_BUILT_TAG: &str = "Not built";

/// Where a project's "broken" flag comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brokenness {
    /// The latest build is conclusive on its own.
    Known(bool),
    /// The latest build is in flight or inconclusive; ask the most recent
    /// finished build instead.
    LastFinished,
}

/// Presentation flags derived from the state of the latest build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateClass {
    pub is_running: bool,
    pub is_waiting: bool,
    pub tag: Option<Tag>,
    pub brokenness: Brokenness,
}

impl StateClass {
    fn settled(is_broken: bool) -> Self {
        Self {
            is_running: false,
            is_waiting: false,
            tag: None,
            brokenness: Brokenness::Known(is_broken),
        }
    }

    fn pending() -> Self {
        Self {
            is_running: false,
            is_waiting: false,
            tag: None,
            brokenness: Brokenness::LastFinished,
        }
    }
}

pub fn classify(state: BuildState) -> StateClass {
    match state {
        BuildState::Running => StateClass {
            is_running: true,
            ..StateClass::pending()
        },
        BuildState::Scheduled => StateClass {
            is_waiting: true,
            ..StateClass::pending()
        },
        BuildState::Canceled | BuildState::Canceling => StateClass {
            tag: Some(Tag::warning(CANCELED_TAG)),
            ..StateClass::pending()
        },
        BuildState::NotRun => StateClass {
            tag: Some(Tag::warning(NOT_BUILT_TAG)),
            ..StateClass::pending()
        },
        BuildState::Failed => StateClass::settled(true),
        BuildState::Passed
        | BuildState::Blocked
        | BuildState::Skipped
        | BuildState::Failing
        | BuildState::Other => StateClass::settled(false),
    }
}
