use crate::error::Result;
use crate::model::{
    AliasResponse, LinkRef, ListLinksQuery, ListLinksResponse, PickLinkResponse, PostLinkRequest,
};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use tracing::debug;

pub async fn post_link_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PostLinkRequest>, JsonRejection>,
) -> Result<Json<AliasResponse>> {
    let Json(request) = payload?;
    debug!(username = %request.username, topic = %request.topic, "post link");

    let alias = state
        .linker()
        .create_link(request.into())
        .await
        .map_err(|err| state.reject(err))?;
    Ok(Json(AliasResponse {
        alias: alias.into_string(),
    }))
}

pub async fn pick_link_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<LinkRef>, QueryRejection>,
) -> Result<Json<PickLinkResponse>> {
    let Query(query) = query?;

    let link = state
        .linker()
        .pick_link(&query.username, &query.topic, &query.alias)
        .await
        .map_err(|err| state.reject(err))?;
    Ok(Json(PickLinkResponse { link }))
}

pub async fn delete_link_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LinkRef>, JsonRejection>,
) -> Result<Json<AliasResponse>> {
    let Json(request) = payload?;

    let alias = state
        .linker()
        .delete_link(&request.username, &request.topic, &request.alias)
        .await
        .map_err(|err| state.reject(err))?;
    Ok(Json(AliasResponse {
        alias: alias.into_string(),
    }))
}

pub async fn list_links_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListLinksQuery>, QueryRejection>,
) -> Result<Json<ListLinksResponse>> {
    let Query(query) = query?;

    let listing = state
        .linker()
        .list_links(&query.username, &query.topic)
        .await
        .map_err(|err| state.reject(err))?;
    Ok(Json(ListLinksResponse {
        links: listing.links,
        aliases: listing.aliases,
    }))
}
