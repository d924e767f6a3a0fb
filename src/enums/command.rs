use strum_macros::{Display, EnumString};
use lazy_regex::regex_captures;
use std::str::FromStr;

/// A command sent to the bot.
#[derive(Display, EnumString, Debug, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    /// Subscribe to notifications and show help.
    Start,
    /// Unsubscribe from notifications.
    Stop,
    /// Check the current free games now. Only the requesting chat receives the result.
    CheckNow,
    /// Show help.
    Help,
}

impl Command {
    /// Parses a command from message text, e.g. `/checknow` or `/start@EpicFreeGamesBot`.
    /// Returns `None` for anything that isn't one of the bot's commands, including commands
    /// addressed to a bot other than `bot_username`. Addressed commands are always ignored when
    /// the bot's username isn't known.
    pub fn parse(
        text: &str,
        bot_username: Option<&str>,
    ) -> Option<Self> {
        let (_, name, addressee) = regex_captures!(
            r"^/([A-Za-z_]+)(?:@(\w+))?(?:\s|$)",
            text.trim_start()
        )?;

        if !addressee.is_empty() && !bot_username.is_some_and(|username| username.eq_ignore_ascii_case(addressee)) {
            return None;
        }

        Self::from_str(name).ok()
    }
}
