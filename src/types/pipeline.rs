use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Pipeline {
    pub slug: String,
    pub name: String,
}
