//! Reply texts.

pub const MSG_HELLO: &str = "Hi! I'm Linkbot, your reading list.

Send me a link and I'll keep it for later.

When you have time to read:
/random - get a random unread link
/list - see everything you saved

/help shows all commands.";

pub const MSG_HELP: &str = "Linkbot saves links so you can read them later.

/random - get a random unread link
/read <url> - mark a link as read
/remove <url> - delete a link
/list - show all saved links
/help - show this message

Any message that is just a link gets saved.";

pub const MSG_SAVED: &str = "Saved to your reading list!";
pub const MSG_ALREADY_EXISTS: &str = "This page is already in your list";
pub const MSG_NO_SAVED_PAGES: &str = "You have no saved pages yet.\nSend me a link to get started!";
pub const MSG_MARKED_AS_READ: &str = "Marked as read!";
pub const MSG_REMOVED: &str = "Page removed!";
pub const MSG_NOT_IN_LIST: &str = "This page is not in your list";
pub const MSG_URL_REQUIRED: &str = "Please provide a valid URL";
pub const MSG_UNKNOWN_COMMAND: &str = "I didn't understand that command.\nTry /help to see what I can do!";

/// First line of the /list reply; followed by a blank line and one numbered line per page.
pub const LIST_HEADER: &str = "Your saved pages:";
