//! Conversions between wire messages and core types.

use crate::v1::{ListLinksResponse, PostLinkRequest};
use linker_core::{CreateLinkParams, LinkListing};

impl From<PostLinkRequest> for CreateLinkParams {
    fn from(request: PostLinkRequest) -> Self {
        CreateLinkParams {
            username: request.username,
            topic: request.topic,
            link: request.link,
            alias: Some(request.alias).filter(|alias| !alias.is_empty()),
        }
    }
}

impl From<LinkListing> for ListLinksResponse {
    fn from(listing: LinkListing) -> Self {
        ListLinksResponse {
            links: listing.links,
            aliases: listing.aliases,
        }
    }
}
