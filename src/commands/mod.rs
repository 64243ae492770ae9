//! Built-in commands outside any flow. Instant responses, no state.

#[cfg(test)]
mod tests;

use crate::gateway::conversation::Event;
use crate::i18n;
use nudge_core::{
    message::{InlineButton, InlineKeyboard},
    traits::UserStore,
};
use std::io::Cursor;
use tracing::error;

/// Prefix of the menu buttons' callback data.
const CHOICE_PREFIX: &str = "choice_";

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub store: &'a dyn UserStore,
    pub text: &'a str,
    pub lang: &'a str,
}

/// Stateless bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Echo,
    Menu,
    Users,
}

/// How a text message enters the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Feeds the user's conversation.
    Flow(Event),
    /// Answered directly, conversation untouched.
    Command(Command),
}

impl Input {
    /// Classify message text. Unknown `/` prefixes are plain text.
    pub fn parse(text: &str) -> Self {
        let Some(first) = text.split_whitespace().next() else {
            return Self::Flow(Event::Text(text.to_string()));
        };
        // Strip @botname suffix (e.g. "/help@nudge_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Self::Flow(Event::Start),
            "/weather" => Self::Flow(Event::Weather),
            "/help" => Self::Command(Command::Help),
            "/echo" => Self::Command(Command::Echo),
            "/menu" => Self::Command(Command::Menu),
            "/users" => Self::Command(Command::Users),
            _ => Self::Flow(Event::Text(text.to_string())),
        }
    }
}

/// A reply with an optional inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub markup: Option<InlineKeyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
        }
    }
}

/// Everything after the command word, trimmed.
fn command_args(text: &str) -> &str {
    text.trim()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or("")
}

/// Handle a command and return the response.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> Reply {
    match cmd {
        Command::Help => Reply::text(i18n::t("help", ctx.lang)),
        Command::Echo => {
            let args = command_args(ctx.text);
            if args.is_empty() {
                Reply::text(i18n::t("echo_empty", ctx.lang))
            } else {
                Reply::text(args)
            }
        }
        Command::Menu => Reply {
            text: i18n::t("menu_prompt", ctx.lang).to_string(),
            markup: Some(menu_keyboard(ctx.lang)),
        },
        Command::Users => match ctx.store.list_users().await {
            Ok(users) => Reply::text(i18n::users_list(ctx.lang, &users)),
            Err(e) => {
                error!("/users: {e}");
                Reply::text(i18n::t("users_error", ctx.lang))
            }
        },
    }
}

/// The two-option menu keyboard.
pub fn menu_keyboard(lang: &str) -> InlineKeyboard {
    InlineKeyboard {
        rows: vec![(1..=2)
            .map(|n| InlineButton::new(i18n::choice_label(lang, n), format!("{CHOICE_PREFIX}{n}")))
            .collect()],
    }
}

/// A press on the menu keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Option(u8),
    /// `choice_*` data the menu never offered.
    Unknown,
}

/// Interpret callback data; `None` when it does not belong to the menu.
pub fn parse_choice(data: &str) -> Option<MenuChoice> {
    let rest = data.strip_prefix(CHOICE_PREFIX)?;
    Some(match rest {
        "1" => MenuChoice::Option(1),
        "2" => MenuChoice::Option(2),
        _ => MenuChoice::Unknown,
    })
}

/// Pixel dimensions of an encoded image.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
}
