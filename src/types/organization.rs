use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Organization {
    pub slug: String,
    pub name: String,
    pub pipelines_url: String,
}
