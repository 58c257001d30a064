//! Bot command parsing.

use std::fmt;

use crate::domain::admin::{AdminRole, Permission};
use crate::domain::id::{ChatId, UserId};
use crate::domain::keyword::Keyword;
use crate::domain::settings::{parse_switch, SettingKey, SettingUpdate};

/// Default and maximum number of events shown by `/recent`.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const MAX_RECENT_LIMIT: usize = 50;

/// Supported bot commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Status,
    MyInfo,
    AddKeyword(Keyword),
    RemoveKeyword(Keyword),
    ListKeywords,
    AddGroup {
        chat: ChatId,
        title: Option<String>,
    },
    RemoveGroup(ChatId),
    ListGroups,
    AddAdmin {
        user: UserId,
        username: Option<String>,
    },
    RemoveAdmin(UserId),
    ListAdmins,
    AddBlacklist(Keyword),
    RemoveBlacklist(Keyword),
    ListBlacklist,
    Block {
        user: UserId,
        reason: Option<String>,
    },
    Unblock(UserId),
    ListBlocked,
    Recent(usize),
    History(UserId),
    DeleteMatch(i64),
    Settings,
    Set(SettingUpdate),
    Notify(bool),
}

impl Command {
    /// Minimum tier allowed to run this command.
    #[must_use]
    pub const fn permission(&self) -> Permission {
        match self {
            Self::MyInfo => Permission::Anyone,
            Self::AddAdmin { .. } | Self::RemoveAdmin(_) => Permission::Owner,
            Self::Start
            | Self::Help
            | Self::Status
            | Self::AddKeyword(_)
            | Self::RemoveKeyword(_)
            | Self::ListKeywords
            | Self::AddGroup { .. }
            | Self::RemoveGroup(_)
            | Self::ListGroups
            | Self::ListAdmins
            | Self::AddBlacklist(_)
            | Self::RemoveBlacklist(_)
            | Self::ListBlacklist
            | Self::Block { .. }
            | Self::Unblock(_)
            | Self::ListBlocked
            | Self::Recent(_)
            | Self::History(_)
            | Self::DeleteMatch(_)
            | Self::Settings
            | Self::Set(_)
            | Self::Notify(_) => Permission::Admin,
        }
    }
}

/// Parse error for command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidArgument { name: &'static str, reason: String },
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            Self::MissingArgument(name) => write!(f, "missing argument `{name}`"),
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid argument `{name}`: {reason}")
            }
        }
    }
}

impl std::error::Error for CommandParseError {}

struct CommandSpec {
    name: &'static str,
    usage: &'static str,
    description: &'static str,
    permission: Permission,
}

const fn spec(
    name: &'static str,
    usage: &'static str,
    description: &'static str,
    permission: Permission,
) -> CommandSpec {
    CommandSpec {
        name,
        usage,
        description,
        permission,
    }
}

/// Every command name the bot answers to, in help order.
const COMMANDS: &[CommandSpec] = &[
    spec("status", "/status", "Bot status and counters", Permission::Admin),
    spec("addkw", "/addkw <keyword>", "Add a keyword", Permission::Admin),
    spec("delkw", "/delkw <keyword>", "Remove a keyword", Permission::Admin),
    spec("listkw", "/listkw", "List keywords", Permission::Admin),
    spec("addgroup", "/addgroup <chat_id> [title]", "Monitor a group", Permission::Admin),
    spec("delgroup", "/delgroup <chat_id>", "Stop monitoring a group", Permission::Admin),
    spec("listgroups", "/listgroups", "List monitored groups", Permission::Admin),
    spec("addbl", "/addbl <term>", "Add a blacklist term", Permission::Admin),
    spec("delbl", "/delbl <term>", "Remove a blacklist term", Permission::Admin),
    spec("listbl", "/listbl", "List blacklist terms", Permission::Admin),
    spec("block", "/block <user_id> [reason]", "Ignore a sender", Permission::Admin),
    spec("unblock", "/unblock <user_id>", "Stop ignoring a sender", Permission::Admin),
    spec("listblocked", "/listblocked", "List ignored senders", Permission::Admin),
    spec("recent", "/recent [limit]", "Latest matches", Permission::Admin),
    spec("history", "/history <user_id>", "Matches from one sender", Permission::Admin),
    spec("delmatch", "/delmatch <id>", "Delete a recorded match", Permission::Admin),
    spec("settings", "/settings", "Show monitor settings", Permission::Admin),
    spec("set", "/set <key> <value>", "Change a monitor setting", Permission::Admin),
    spec("notify", "/notify <on|off>", "Toggle your match alerts", Permission::Admin),
    spec("listadmins", "/listadmins", "List admins", Permission::Admin),
    spec("addadmin", "/addadmin <user_id> [username]", "Add an admin", Permission::Owner),
    spec("deladmin", "/deladmin <user_id>", "Remove an admin", Permission::Owner),
    spec("myinfo", "/myinfo", "Show your user ID and role", Permission::Anyone),
    spec("help", "/help", "Show all commands", Permission::Admin),
    spec("start", "/start", "Show all commands", Permission::Admin),
    spec("stats", "/stats", "Alias of /status", Permission::Admin),
];

fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Split a message into a lower-cased command name and its argument text.
///
/// Strips the leading `/` and any `@botname` suffix.
///
/// # Errors
/// Returns [`CommandParseError::NotACommand`] if the text does not start
/// with `/`.
pub fn split_command(text: &str) -> Result<(String, &str), CommandParseError> {
    let text = text.trim();
    let Some(body) = text.strip_prefix('/') else {
        return Err(CommandParseError::NotACommand);
    };
    let (head, args) = body
        .split_once(char::is_whitespace)
        .map_or((body, ""), |(head, rest)| (head, rest.trim()));
    let name = head.split_once('@').map_or(head, |(name, _)| name);
    if name.is_empty() {
        return Err(CommandParseError::NotACommand);
    }
    Ok((name.to_lowercase(), args))
}

/// Permission required by a command name, or `None` if the name is unknown.
#[must_use]
pub fn required_permission(name: &str) -> Option<Permission> {
    lookup(name).map(|spec| spec.permission)
}

/// Parse a message into a bot command.
///
/// # Errors
/// Returns a [`CommandParseError`] describing why the text is not a valid
/// command.
pub fn parse_command(text: &str) -> Result<Command, CommandParseError> {
    let (name, args) = split_command(text)?;
    let mut words = args.split_whitespace();

    match name.as_str() {
        "start" => Ok(Command::Start),
        "help" => Ok(Command::Help),
        "status" | "stats" => Ok(Command::Status),
        "myinfo" => Ok(Command::MyInfo),
        "addkw" => term(args, "keyword").map(Command::AddKeyword),
        "delkw" => term(args, "keyword").map(Command::RemoveKeyword),
        "listkw" => Ok(Command::ListKeywords),
        "addgroup" => {
            let chat = chat_id(words.next())?;
            let title = rest_after_first(args);
            Ok(Command::AddGroup { chat, title })
        }
        "delgroup" => chat_id(words.next()).map(Command::RemoveGroup),
        "listgroups" => Ok(Command::ListGroups),
        "addadmin" => {
            let user = user_id(words.next())?;
            let username = words
                .next()
                .map(|name| name.trim_start_matches('@'))
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            Ok(Command::AddAdmin { user, username })
        }
        "deladmin" => user_id(words.next()).map(Command::RemoveAdmin),
        "listadmins" => Ok(Command::ListAdmins),
        "addbl" => term(args, "term").map(Command::AddBlacklist),
        "delbl" => term(args, "term").map(Command::RemoveBlacklist),
        "listbl" => Ok(Command::ListBlacklist),
        "block" => {
            let user = user_id(words.next())?;
            let reason = rest_after_first(args);
            Ok(Command::Block { user, reason })
        }
        "unblock" => user_id(words.next()).map(Command::Unblock),
        "listblocked" => Ok(Command::ListBlocked),
        "recent" => recent_limit(words.next()).map(Command::Recent),
        "history" => user_id(words.next()).map(Command::History),
        "delmatch" => match_id(words.next()).map(Command::DeleteMatch),
        "settings" => Ok(Command::Settings),
        "set" => {
            let raw_key = words.next().ok_or(CommandParseError::MissingArgument("key"))?;
            let raw_value = words
                .next()
                .ok_or(CommandParseError::MissingArgument("value"))?;
            let key: SettingKey = raw_key.parse().map_err(|e| invalid("key", e))?;
            SettingUpdate::parse(key, raw_value)
                .map(Command::Set)
                .map_err(|e| invalid("value", e))
        }
        "notify" => {
            let raw = words
                .next()
                .ok_or(CommandParseError::MissingArgument("on|off"))?;
            parse_switch(raw)
                .map(Command::Notify)
                .ok_or_else(|| invalid("on|off", "use on or off"))
        }
        _ => Err(CommandParseError::UnknownCommand(format!("/{name}"))),
    }
}

fn invalid(name: &'static str, reason: impl fmt::Display) -> CommandParseError {
    CommandParseError::InvalidArgument {
        name,
        reason: reason.to_string(),
    }
}

fn term(args: &str, name: &'static str) -> Result<Keyword, CommandParseError> {
    if args.is_empty() {
        return Err(CommandParseError::MissingArgument(name));
    }
    Keyword::parse(args).map_err(|e| invalid(name, e))
}

fn rest_after_first(args: &str) -> Option<String> {
    args.split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn chat_id(raw: Option<&str>) -> Result<ChatId, CommandParseError> {
    let raw = raw.ok_or(CommandParseError::MissingArgument("chat_id"))?;
    match raw.parse::<ChatId>() {
        Ok(chat) if chat.get() != 0 => Ok(chat),
        _ => Err(invalid("chat_id", "expected a numeric chat ID such as -1001234567890")),
    }
}

fn user_id(raw: Option<&str>) -> Result<UserId, CommandParseError> {
    let raw = raw.ok_or(CommandParseError::MissingArgument("user_id"))?;
    match raw.parse::<UserId>() {
        Ok(user) if user.get() > 0 => Ok(user),
        _ => Err(invalid("user_id", "expected a positive numeric user ID")),
    }
}

fn match_id(raw: Option<&str>) -> Result<i64, CommandParseError> {
    let raw = raw.ok_or(CommandParseError::MissingArgument("id"))?;
    match raw.trim_start_matches('#').parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid("id", "expected a match ID as shown by /recent")),
    }
}

fn recent_limit(raw: Option<&str>) -> Result<usize, CommandParseError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_RECENT_LIMIT);
    };
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(invalid("limit", "expected a number greater than 0")),
        Ok(limit) => Ok(limit.min(MAX_RECENT_LIMIT)),
    }
}

/// Help text for a sender with `role`.
///
/// Owner-only commands are listed for owners only.
#[must_use]
pub fn command_help(role: AdminRole) -> String {
    let mut help = String::from("📋 Commands\n");
    for spec in COMMANDS {
        if matches!(spec.name, "start" | "stats") || !role.grants(spec.permission) {
            continue;
        }
        help.push('\n');
        help.push_str(spec.usage);
        help.push_str(" - ");
        help.push_str(spec.description);
    }
    help.push_str("\n\nSettings: push, keyword_mode, blacklist_mode, no_repeat");
    help
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    COMMANDS
        .iter()
        .filter(|spec| !matches!(spec.name, "start" | "stats"))
        .map(|spec| (spec.name, spec.description))
        .collect()
}
