use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TopicRequest {
    pub username: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct TopicIdResponse {
    pub topic_id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListTopicsQuery {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ListTopicsResponse {
    pub topics: Vec<String>,
}
