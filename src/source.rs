//! The fetch seam between the status pipelines and the CI provider.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Build, Organization, Pipeline};

/// Raw access to the provider. Every call takes the credential explicitly so
/// implementations stay free of per-user state.
#[async_trait]
pub trait BuildSource: Send + Sync {
    /// Organizations visible to `token`.
    async fn fetch_organizations(&self, token: &str) -> Result<Vec<Organization>>;

    /// Pipelines listed at an organization's `pipelines_url`.
    async fn fetch_pipelines(&self, pipelines_url: &str, token: &str) -> Result<Vec<Pipeline>>;

    /// Most recent build of `org/pipeline`, whatever its state.
    /// Fails with `NoBuilds` when the pipeline never ran.
    async fn fetch_latest_build(&self, org: &str, pipeline: &str, token: &str) -> Result<Build>;

    /// Most recent build that reached a terminal state, if any.
    async fn fetch_latest_finished_build(
        &self,
        org: &str,
        pipeline: &str,
        token: &str,
    ) -> Result<Option<Build>>;
}
