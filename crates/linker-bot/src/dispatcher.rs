use crate::command::{Command, CommandParser};
use crate::error::{BotError, Result};
use crate::reply::Reply;
use linker_core::{CreateLinkParams, Linker, LinkerError, MessageCatalog};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Upper bound for handling one command, store calls included.
pub const HANDLER_TIMEOUT: Duration = Duration::from_secs(5);

pub const USAGE: &str = "\
Save links under topics and find them again by alias.

/post_topic topic:<name> - create a topic
/delete_topic topic:<name> - delete a topic and all of its links
/list_topics - show your topics
/post_link topic:<name> link:<url> [alias:<alias>] - save a link
/pick_link topic:<name> alias:<alias> - get a saved link
/delete_link topic:<name> alias:<alias> - delete a link
/list_links topic:<name> - show the links of a topic";

/// An incoming chat message, as delivered by the chat transport.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub chat_id: i64,
    /// Sender's chat username; users without one cannot pass validation.
    pub username: Option<String>,
    pub text: String,
}

/// Routes chat commands to a [`Linker`] and renders the replies.
pub struct Dispatcher {
    linker: Arc<dyn Linker>,
    catalog: Arc<MessageCatalog>,
    parser: CommandParser,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(linker: Arc<dyn Linker>, catalog: Arc<MessageCatalog>) -> Result<Self> {
        Ok(Self {
            linker,
            catalog,
            parser: CommandParser::new()?,
            timeout: HANDLER_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Handles one message. Returns `None` for text that is not a command.
    pub async fn handle(&self, message: &ChatMessage) -> Option<Reply> {
        let command = match self.parser.parse(&message.text) {
            Ok(command) => command,
            Err(BotError::NotACommand) => return None,
            Err(err) => {
                debug!(chat_id = message.chat_id, error = %err, "rejected command");
                return Some(Reply::plain(format!(
                    "{}. Send /help for the list of commands.",
                    capitalize(&err.to_string())
                )));
            }
        };

        let username = message.username.as_deref().unwrap_or_default();
        info!(chat_id = message.chat_id, username = %username, command = ?command, "handling command");

        let reply = self
            .bounded(self.execute(username, command))
            .await
            .unwrap_or_else(|err| self.failure(message.chat_id, err));
        Some(reply)
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = std::result::Result<T, LinkerError>>,
    ) -> std::result::Result<T, LinkerError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(timeout = ?self.timeout, "command handler timed out");
                Err(LinkerError::Internal("command handler timed out".to_string()))
            }
        }
    }

    /// Internal failures from the service are already logged there.
    fn failure(&self, chat_id: i64, err: LinkerError) -> Reply {
        debug!(chat_id, error = %err, "command rejected");
        Reply::plain(self.catalog.for_error(&err))
    }

    async fn execute(
        &self,
        username: &str,
        command: Command,
    ) -> std::result::Result<Reply, LinkerError> {
        let reply = match command {
            Command::Start | Command::Help => Reply::plain(USAGE),
            Command::PostTopic { topic } => {
                let id = self.linker.create_topic(username, &topic).await?;
                Reply::plain(format!("Topic created, id = {id}"))
            }
            Command::DeleteTopic { topic } => {
                let id = self.linker.delete_topic(username, &topic).await?;
                Reply::plain(format!("Topic deleted, id = {id}"))
            }
            Command::ListTopics => {
                let topics = self.linker.list_topics(username).await?;
                if topics.is_empty() {
                    Reply::plain("You have no topics yet.")
                } else {
                    let rows: Vec<Vec<String>> = topics.into_iter().map(|t| vec![t]).collect();
                    Reply::table(&["Topic"], &rows)
                }
            }
            Command::PostLink { topic, link, alias } => {
                let alias = self
                    .linker
                    .create_link(CreateLinkParams {
                        username: username.to_string(),
                        topic,
                        link,
                        alias,
                    })
                    .await?;
                Reply::plain(format!("Link saved, alias = {alias}"))
            }
            Command::PickLink { topic, alias } => {
                Reply::plain(self.linker.pick_link(username, &topic, &alias).await?)
            }
            Command::DeleteLink { topic, alias } => {
                let alias = self.linker.delete_link(username, &topic, &alias).await?;
                Reply::plain(format!("Link deleted, alias = {alias}"))
            }
            Command::ListLinks { topic } => {
                let listing = self.linker.list_links(username, &topic).await?;
                if listing.is_empty() {
                    Reply::plain("This topic has no links yet.")
                } else {
                    let rows: Vec<Vec<String>> = listing
                        .iter()
                        .map(|(alias, link)| vec![alias.to_string(), link.to_string()])
                        .collect();
                    Reply::table(&["Alias", "Link"], &rows)
                }
            }
        };
        Ok(reply)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
