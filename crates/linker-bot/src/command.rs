use crate::error::{BotError, Result};
use regex::Regex;

const COMMAND_PATTERN: &str =
    r"^/(?P<command>\w+)(?:@\w+)?(?P<args>(?:\s+(?:topic|link|alias):\S+)*)\s*$";
const ARGUMENT_PATTERN: &str = r"(?P<key>topic|link|alias):(?P<value>\S+)";

/// A chat command with its `key:value` arguments.
///
/// Missing arguments are left empty; the service reports them with the
/// same validation errors as every other front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    PostTopic { topic: String },
    DeleteTopic { topic: String },
    ListTopics,
    PostLink { topic: String, link: String, alias: Option<String> },
    PickLink { topic: String, alias: String },
    DeleteLink { topic: String, alias: String },
    ListLinks { topic: String },
}

#[derive(Debug, Default)]
struct Arguments {
    topic: String,
    link: String,
    alias: String,
}

#[derive(Debug, Clone)]
pub struct CommandParser {
    command: Regex,
    argument: Regex,
}

impl CommandParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            command: Regex::new(COMMAND_PATTERN)?,
            argument: Regex::new(ARGUMENT_PATTERN)?,
        })
    }

    pub fn parse(&self, text: &str) -> Result<Command> {
        let text = text.trim();
        if !text.starts_with('/') {
            return Err(BotError::NotACommand);
        }

        let Some(captures) = self.command.captures(text) else {
            let name = text[1..]
                .split(|c: char| c.is_whitespace() || c == '@')
                .next()
                .unwrap_or_default();
            return Err(BotError::MalformedArguments(name.to_string()));
        };
        let name = &captures["command"];

        // later occurrences of the same key win
        let mut args = Arguments::default();
        for argument in self.argument.captures_iter(&captures["args"]) {
            let value = argument["value"].to_string();
            match &argument["key"] {
                "topic" => args.topic = value,
                "link" => args.link = value,
                _ => args.alias = value,
            }
        }

        let command = match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "post_topic" => Command::PostTopic { topic: args.topic },
            "delete_topic" => Command::DeleteTopic { topic: args.topic },
            "list_topics" => Command::ListTopics,
            "post_link" => Command::PostLink {
                topic: args.topic,
                link: args.link,
                alias: Some(args.alias).filter(|alias| !alias.is_empty()),
            },
            "pick_link" => Command::PickLink {
                topic: args.topic,
                alias: args.alias,
            },
            "delete_link" => Command::DeleteLink {
                topic: args.topic,
                alias: args.alias,
            },
            "list_links" => Command::ListLinks { topic: args.topic },
            other => return Err(BotError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}
