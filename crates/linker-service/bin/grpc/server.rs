use crate::error::StatusMapper;
use linker_core::{Linker, MessageCatalog};
use linker_proto_schema::v1 as proto;
use linker_proto_schema::v1::linker_service_server::LinkerService;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::trace;

pub struct LinkerGrpcServer {
    linker: Arc<dyn Linker>,
    errors: StatusMapper,
}

impl LinkerGrpcServer {
    pub fn new(linker: Arc<dyn Linker>, catalog: Arc<MessageCatalog>) -> Self {
        Self {
            linker,
            errors: StatusMapper::new(catalog),
        }
    }
}

#[tonic::async_trait]
impl LinkerService for LinkerGrpcServer {
    async fn post_topic(
        &self,
        request: Request<proto::PostTopicRequest>,
    ) -> Result<Response<proto::PostTopicResponse>, Status> {
        let request = request.into_inner();
        trace!(username = %request.username, topic = %request.topic, "post topic");

        let id = self
            .linker
            .create_topic(&request.username, &request.topic)
            .await
            .map_err(|err| self.errors.status(err))?;
        Ok(Response::new(proto::PostTopicResponse { topic_id: id.0 }))
    }

    async fn delete_topic(
        &self,
        request: Request<proto::DeleteTopicRequest>,
    ) -> Result<Response<proto::DeleteTopicResponse>, Status> {
        let request = request.into_inner();
        trace!(username = %request.username, topic = %request.topic, "delete topic");

        let id = self
            .linker
            .delete_topic(&request.username, &request.topic)
            .await
            .map_err(|err| self.errors.status(err))?;
        Ok(Response::new(proto::DeleteTopicResponse { topic_id: id.0 }))
    }

    async fn list_topics(
        &self,
        request: Request<proto::ListTopicsRequest>,
    ) -> Result<Response<proto::ListTopicsResponse>, Status> {
        let request = request.into_inner();

        let topics = self
            .linker
            .list_topics(&request.username)
            .await
            .map_err(|err| self.errors.status(err))?;
        Ok(Response::new(proto::ListTopicsResponse { topics }))
    }

    async fn post_link(
        &self,
        request: Request<proto::PostLinkRequest>,
    ) -> Result<Response<proto::PostLinkResponse>, Status> {
        let request = request.into_inner();
        trace!(username = %request.username, topic = %request.topic, "post link");

        let alias = self
            .linker
            .create_link(request.into())
            .await
            .map_err(|err| self.errors.status(err))?;
        Ok(Response::new(proto::PostLinkResponse {
            alias: alias.into_string(),
        }))
    }

    async fn pick_link(
        &self,
        request: Request<proto::PickLinkRequest>,
    ) -> Result<Response<proto::PickLinkResponse>, Status> {
        let request = request.into_inner();

        let link = self
            .linker
            .pick_link(&request.username, &request.topic, &request.alias)
            .await
            .map_err(|err| self.errors.status(err))?;
        Ok(Response::new(proto::PickLinkResponse { link }))
    }

    async fn delete_link(
        &self,
        request: Request<proto::DeleteLinkRequest>,
    ) -> Result<Response<proto::DeleteLinkResponse>, Status> {
        let request = request.into_inner();
        trace!(username = %request.username, topic = %request.topic, alias = %request.alias, "delete link");

        let alias = self
            .linker
            .delete_link(&request.username, &request.topic, &request.alias)
            .await
            .map_err(|err| self.errors.status(err))?;
        Ok(Response::new(proto::DeleteLinkResponse {
            alias: alias.into_string(),
        }))
    }

    async fn list_links(
        &self,
        request: Request<proto::ListLinksRequest>,
    ) -> Result<Response<proto::ListLinksResponse>, Status> {
        let request = request.into_inner();

        let listing = self
            .linker
            .list_links(&request.username, &request.topic)
            .await
            .map_err(|err| self.errors.status(err))?;
        Ok(Response::new(listing.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linker_service::LinkerService as Service;
    use linker_storage::InMemoryStore;
    use tonic::Code;

    fn server() -> LinkerGrpcServer {
        LinkerGrpcServer::new(
            Arc::new(Service::with_store(InMemoryStore::new())),
            Arc::new(MessageCatalog::api()),
        )
    }

    fn post_link(alias: &str) -> Request<proto::PostLinkRequest> {
        Request::new(proto::PostLinkRequest {
            username: "alice1234".to_string(),
            topic: "reading".to_string(),
            link: "https://example.com".to_string(),
            alias: alias.to_string(),
        })
    }

    async fn with_topic() -> LinkerGrpcServer {
        let server = server();
        server
            .post_topic(Request::new(proto::PostTopicRequest {
                username: "alice1234".to_string(),
                topic: "reading".to_string(),
            }))
            .await
            .unwrap();
        server
    }

    #[tokio::test]
    async fn link_round_trip() {
        let server = with_topic().await;

        let alias = server.post_link(post_link("doc1")).await.unwrap().into_inner().alias;
        assert_eq!(alias, "doc1");

        let picked = server
            .pick_link(Request::new(proto::PickLinkRequest {
                username: "alice1234".to_string(),
                topic: "reading".to_string(),
                alias: "doc1".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(picked.link, "https://example.com");

        let listing = server
            .list_links(Request::new(proto::ListLinksRequest {
                username: "alice1234".to_string(),
                topic: "reading".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(listing.aliases, vec!["doc1"]);
        assert_eq!(listing.links, vec!["https://example.com"]);
    }

    #[tokio::test]
    async fn empty_alias_generates_one() {
        let server = with_topic().await;

        let alias = server.post_link(post_link("")).await.unwrap().into_inner().alias;

        assert_eq!(alias.len(), 10);
    }

    #[tokio::test]
    async fn duplicate_alias_is_already_exists() {
        let server = with_topic().await;
        server.post_link(post_link("doc1")).await.unwrap();

        let status = server.post_link(post_link("doc1")).await.unwrap_err();

        assert_eq!(status.code(), Code::AlreadyExists);
        assert_eq!(status.message(), "link with such an alias already exists");
    }

    #[tokio::test]
    async fn short_username_is_invalid_argument() {
        let server = server();

        let status = server
            .list_topics(Request::new(proto::ListTopicsRequest {
                username: "bob".to_string(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn delete_topic_twice() {
        let server = with_topic().await;
        let request = || {
            Request::new(proto::DeleteTopicRequest {
                username: "alice1234".to_string(),
                topic: "reading".to_string(),
            })
        };

        let first = server.delete_topic(request()).await.unwrap().into_inner();
        assert!(first.topic_id > 0);

        let status = server.delete_topic(request()).await.unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "unknown topic");
    }
}
