//! Status pipelines built on top of a [`BuildSource`](crate::source::BuildSource).
//!
//! - [`get_all`] lists every pipeline the credential can see, for picking
//!   which projects to watch.
//! - [`get_latest`] polls the configured projects and derives one dashboard
//!   item per project, isolating failures to the project that caused them.

mod classify;
mod discovery;
#[cfg(test)]
mod fake;
mod latest;

pub use discovery::get_all;
pub use latest::get_latest;

/// Inputs of a poll: the credential and the `org/pipeline` identifiers to watch.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub token: String,
    pub projects: Vec<String>,
}

/// Split `org/pipeline` at the first slash. Both halves must be non-empty.
pub fn split_identifier(id: &str) -> Option<(&str, &str)> {
    id.split_once('/')
        .filter(|(org, project)| !org.is_empty() && !project.is_empty())
}
