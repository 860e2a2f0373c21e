//! Command parsing and classification.

use url::Url;

pub const START_CMD: &str = "/start";
pub const RANDOM_CMD: &str = "/random";
pub const READ_CMD: &str = "/read";
pub const REMOVE_CMD: &str = "/remove";
pub const LIST_CMD: &str = "/list";
pub const HELP_CMD: &str = "/help";

/// One classified chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Whole message is a URL.
    Save(String),
    Start,
    Random,
    /// `/read <url>`; `None` when the argument is missing.
    Read(Option<String>),
    /// `/remove <url>`; `None` when the argument is missing.
    Remove(Option<String>),
    List,
    Help,
    /// Anything else, including empty text. Holds the leading token.
    Unknown(String),
}

impl Command {
    /// Classifies trimmed text. URL recognition wins over command tokens; only the first two tokens matter.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if is_url(text) {
            return Command::Save(text.to_string());
        }

        let mut fields = text.split_whitespace();
        let cmd = fields.next().unwrap_or("");
        let arg = fields.next().map(str::to_string);

        match strip_bot_mention(cmd) {
            START_CMD => Command::Start,
            RANDOM_CMD => Command::Random,
            READ_CMD => Command::Read(arg),
            REMOVE_CMD => Command::Remove(arg),
            LIST_CMD => Command::List,
            HELP_CMD => Command::Help,
            _ => Command::Unknown(cmd.to_string()),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Save(_) => "save",
            Command::Start => "start",
            Command::Random => "random",
            Command::Read(_) => "read",
            Command::Remove(_) => "remove",
            Command::List => "list",
            Command::Help => "help",
            Command::Unknown(_) => "unknown",
        }
    }
}

/// `/list@my_bot` (group chats) is `/list`.
fn strip_bot_mention(cmd: &str) -> &str {
    if !cmd.starts_with('/') {
        return cmd;
    }
    cmd.split_once('@').map_or(cmd, |(name, _)| name)
}

/// True when the text parses as an absolute URL with a non-empty host.
/// Text with embedded whitespace or control characters is never a URL, even where the parser would strip them.
pub fn is_url(text: &str) -> bool {
    if text.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    Url::parse(text)
        .ok()
        .and_then(|u| u.host_str().map(|h| !h.is_empty()))
        .unwrap_or(false)
}
