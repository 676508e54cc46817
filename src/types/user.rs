use serde::{Deserialize, Serialize};

/// Person who triggered a build.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Creator {
    pub name: Option<String>,
    pub email: Option<String>,
}
