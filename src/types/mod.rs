mod build;
mod organization;
mod pipeline;
mod status;
mod user;

#[cfg(test)]
pub use build::BuildPipeline;
pub use build::{Build, BuildState};
pub use organization::Organization;
pub use pipeline::Pipeline;
pub use status::{
    Change, FetchFailure, Items, ProjectEntry, ProjectOutcome, ProjectStatus, ProjectStatusItem,
    Tag,
};
pub use user::Creator;
