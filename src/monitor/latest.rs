use futures::future::join_all;
use tracing::{debug, info, warn};

use super::classify::{classify, Brokenness};
use super::{split_identifier, Settings};
use crate::error::{MonitorError, Result};
use crate::source::BuildSource;
use crate::types::{
    Build, BuildState, Change, FetchFailure, Items, ProjectOutcome, ProjectStatus,
    ProjectStatusItem,
};

/// Poll every configured project and derive its dashboard item.
///
/// Projects are evaluated concurrently and joined in input order. A failure
/// while fetching one project's builds becomes that item's `error`; it never
/// fails the poll or touches sibling items.
pub async fn get_latest(source: &dyn BuildSource, settings: &Settings) -> Items<ProjectStatusItem> {
    let evaluations = settings
        .projects
        .iter()
        .map(|id| evaluate(source, id, &settings.token));

    let items = join_all(evaluations).await;

    let failures = items.iter().filter(|item| item.error().is_some()).count();
    info!(projects = items.len(), failures, "poll complete");

    Items::new(items)
}

async fn evaluate(source: &dyn BuildSource, id: &str, token: &str) -> ProjectStatusItem {
    let Some((org, project)) = split_identifier(id) else {
        let err = MonitorError::InvalidProject(id.to_string());
        warn!(project = %id, error = %err, "skipping project");
        return failed_item(id, id, "", &err);
    };

    match project_status(source, org, project, token).await {
        Ok((name, status)) => ProjectStatusItem {
            id: id.to_string(),
            name,
            group: org.to_string(),
            is_disabled: false,
            outcome: ProjectOutcome::Status(status),
        },
        Err(err) => {
            warn!(project = %id, error = %err, "project status unavailable");
            failed_item(id, project, org, &err)
        }
    }
}

fn failed_item(id: &str, name: &str, group: &str, err: &MonitorError) -> ProjectStatusItem {
    ProjectStatusItem {
        id: id.to_string(),
        name: name.to_string(),
        group: group.to_string(),
        is_disabled: false,
        outcome: ProjectOutcome::Failed {
            error: FetchFailure::from(err),
        },
    }
}

/// Both fetches for one project; either failing fails only this project.
async fn project_status(
    source: &dyn BuildSource,
    org: &str,
    project: &str,
    token: &str,
) -> Result<(String, ProjectStatus)> {
    let build = source.fetch_latest_build(org, project, token).await?;
    let class = classify(build.state);

    let is_broken = match class.brokenness {
        Brokenness::Known(is_broken) => is_broken,
        Brokenness::LastFinished => {
            debug!(org, project, state = %build.state, "consulting last finished build");
            source
                .fetch_latest_finished_build(org, project, token)
                .await?
                .is_some_and(|finished| finished.state == BuildState::Failed)
        }
    };

    let name = build.pipeline_name().unwrap_or(project).to_string();
    let changes = changes(&build);

    Ok((
        name,
        ProjectStatus {
            web_url: build.web_url,
            is_broken,
            is_running: class.is_running,
            is_waiting: class.is_waiting,
            tags: class.tag.into_iter().collect(),
            changes,
        },
    ))
}

fn changes(build: &Build) -> Vec<Change> {
    if build.message.is_none() && build.creator.is_none() {
        return Vec::new();
    }

    vec![Change {
        name: build.creator.as_ref().and_then(|c| c.name.clone()),
        message: build.message.clone(),
    }]
}
