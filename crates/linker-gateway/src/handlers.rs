mod health;
mod link;
mod topic;

pub use health::health_handler;
pub use link::{delete_link_handler, list_links_handler, pick_link_handler, post_link_handler};
pub use topic::{delete_topic_handler, list_topics_handler, post_topic_handler};
