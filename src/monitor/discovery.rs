use futures::future::try_join_all;
use tracing::debug;

use super::Settings;
use crate::error::Result;
use crate::source::BuildSource;
use crate::types::{Items, Organization, ProjectEntry};

/// List every pipeline visible to the token, sorted by pipeline name.
///
/// Unlike [`get_latest`](super::get_latest) there is no per-item isolation:
/// any organization whose pipelines can't be listed fails the whole call.
pub async fn get_all(source: &dyn BuildSource, settings: &Settings) -> Result<Items<ProjectEntry>> {
    let token = settings.token.as_str();
    let organizations = source.fetch_organizations(token).await?;
    debug!(count = organizations.len(), "fetched organizations");

    let listings = try_join_all(
        organizations
            .iter()
            .map(|org| list_organization(source, org, token)),
    )
    .await?;

    let mut items: Vec<ProjectEntry> = listings.into_iter().flatten().collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Items::new(items))
}

async fn list_organization(
    source: &dyn BuildSource,
    org: &Organization,
    token: &str,
) -> Result<Vec<ProjectEntry>> {
    let pipelines = source.fetch_pipelines(&org.pipelines_url, token).await?;
    debug!(org = %org.slug, count = pipelines.len(), "fetched pipelines");

    Ok(pipelines
        .into_iter()
        .map(|pipeline| ProjectEntry {
            id: format!("{}/{}", org.slug, pipeline.slug),
            name: pipeline.name,
            group: org.name.clone(),
            is_disabled: false,
        })
        .collect())
}
