//! Scripted in-memory [`BuildSource`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{MonitorError, Result};
use crate::source::BuildSource;
use crate::types::{Build, BuildPipeline, BuildState, Creator, Organization, Pipeline};

enum Reply<T> {
    Ok(T),
    Fail(u16),
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Fail(status) => Err(MonitorError::Api {
                status: *status,
                message: format!("scripted failure {status}"),
            }),
        }
    }
}

#[derive(Default)]
pub struct FakeSource {
    organizations: Vec<Organization>,
    pipelines: HashMap<String, Reply<Vec<Pipeline>>>,
    latest: HashMap<String, Reply<Build>>,
    finished: HashMap<String, Reply<Option<Build>>>,
    delays: HashMap<String, Duration>,
    finished_calls: Mutex<HashMap<String, usize>>,
    completed: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn organization(mut self, slug: &str, name: &str, pipelines: &[(&str, &str)]) -> Self {
        let url = format!("https://api.test/v2/organizations/{slug}/pipelines");
        self.organizations.push(Organization {
            slug: slug.to_string(),
            name: name.to_string(),
            pipelines_url: url.clone(),
        });
        let pipelines = pipelines
            .iter()
            .map(|(slug, name)| Pipeline {
                slug: slug.to_string(),
                name: name.to_string(),
            })
            .collect();
        self.pipelines.insert(url, Reply::Ok(pipelines));
        self
    }

    pub fn failing_organization(mut self, slug: &str, name: &str, status: u16) -> Self {
        let url = format!("https://api.test/v2/organizations/{slug}/pipelines");
        self.organizations.push(Organization {
            slug: slug.to_string(),
            name: name.to_string(),
            pipelines_url: url.clone(),
        });
        self.pipelines.insert(url, Reply::Fail(status));
        self
    }

    pub fn latest(mut self, id: &str, build: Build) -> Self {
        self.latest.insert(id.to_string(), Reply::Ok(build));
        self
    }

    pub fn latest_fails(mut self, id: &str, status: u16) -> Self {
        self.latest.insert(id.to_string(), Reply::Fail(status));
        self
    }

    pub fn finished(mut self, id: &str, build: Option<Build>) -> Self {
        self.finished.insert(id.to_string(), Reply::Ok(build));
        self
    }

    pub fn finished_fails(mut self, id: &str, status: u16) -> Self {
        self.finished.insert(id.to_string(), Reply::Fail(status));
        self
    }

    /// Hold the latest-build reply for `id` back by `ms` milliseconds.
    pub fn delay(mut self, id: &str, ms: u64) -> Self {
        self.delays.insert(id.to_string(), Duration::from_millis(ms));
        self
    }

    pub fn finished_calls(&self, id: &str) -> usize {
        self.finished_calls
            .lock()
            .unwrap()
            .get(id)
            .copied()
            .unwrap_or(0)
    }

    /// Project ids in the order their latest-build fetch resolved.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl BuildSource for FakeSource {
    async fn fetch_organizations(&self, _token: &str) -> Result<Vec<Organization>> {
        Ok(self.organizations.clone())
    }

    async fn fetch_pipelines(&self, pipelines_url: &str, _token: &str) -> Result<Vec<Pipeline>> {
        match self.pipelines.get(pipelines_url) {
            Some(reply) => reply.get(),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_latest_build(&self, org: &str, pipeline: &str, _token: &str) -> Result<Build> {
        let id = format!("{org}/{pipeline}");
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        self.completed.lock().unwrap().push(id.clone());

        match self.latest.get(&id) {
            Some(reply) => reply.get(),
            None => Err(MonitorError::NoBuilds {
                org: org.to_string(),
                pipeline: pipeline.to_string(),
            }),
        }
    }

    async fn fetch_latest_finished_build(
        &self,
        org: &str,
        pipeline: &str,
        _token: &str,
    ) -> Result<Option<Build>> {
        let id = format!("{org}/{pipeline}");
        *self
            .finished_calls
            .lock()
            .unwrap()
            .entry(id.clone())
            .or_default() += 1;

        match self.finished.get(&id) {
            Some(reply) => reply.get(),
            None => Ok(None),
        }
    }
}

pub fn build(state: BuildState) -> Build {
    Build {
        state,
        web_url: format!("https://buildkite.test/builds/{state}"),
        pipeline: None,
        message: None,
        creator: None,
    }
}

pub fn named_build(state: BuildState, name: &str) -> Build {
    Build {
        pipeline: Some(BuildPipeline {
            name: Some(name.to_string()),
        }),
        ..build(state)
    }
}

pub fn build_by(state: BuildState, creator: &str, message: &str) -> Build {
    Build {
        message: Some(message.to_string()),
        creator: Some(Creator {
            name: Some(creator.to_string()),
            email: None,
        }),
        ..build(state)
    }
}
