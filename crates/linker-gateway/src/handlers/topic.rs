use crate::error::Result;
use crate::model::{ListTopicsQuery, ListTopicsResponse, TopicIdResponse, TopicRequest};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;

pub async fn post_topic_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TopicRequest>, JsonRejection>,
) -> Result<Json<TopicIdResponse>> {
    let Json(request) = payload?;

    let id = state
        .linker()
        .create_topic(&request.username, &request.topic)
        .await
        .map_err(|err| state.reject(err))?;
    Ok(Json(TopicIdResponse { topic_id: id.0 }))
}

pub async fn delete_topic_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TopicRequest>, JsonRejection>,
) -> Result<Json<TopicIdResponse>> {
    let Json(request) = payload?;

    let id = state
        .linker()
        .delete_topic(&request.username, &request.topic)
        .await
        .map_err(|err| state.reject(err))?;
    Ok(Json(TopicIdResponse { topic_id: id.0 }))
}

pub async fn list_topics_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListTopicsQuery>, QueryRejection>,
) -> Result<Json<ListTopicsResponse>> {
    let Query(query) = query?;

    let topics = state
        .linker()
        .list_topics(&query.username)
        .await
        .map_err(|err| state.reject(err))?;
    Ok(Json(ListTopicsResponse { topics }))
}
