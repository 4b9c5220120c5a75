use linker_core::CreateLinkParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostLinkRequest {
    pub username: String,
    pub topic: String,
    pub link: String,
    pub alias: Option<String>,
}

impl From<PostLinkRequest> for CreateLinkParams {
    fn from(request: PostLinkRequest) -> Self {
        CreateLinkParams {
            username: request.username,
            topic: request.topic,
            link: request.link,
            alias: request.alias,
        }
    }
}

/// Identifies a single link; used as the pick query and the delete body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinkRef {
    pub username: String,
    pub topic: String,
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct AliasResponse {
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct PickLinkResponse {
    pub link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListLinksQuery {
    pub username: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<String>,
    pub aliases: Vec<String>,
}
