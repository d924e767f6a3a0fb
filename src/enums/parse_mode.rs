use serde::Serialize;
use strum_macros::Display;

/// Formatting options for message text. Only HTML is used by the bot: bold (`<b>`),
/// strikethrough (`<s>`) and links (`<a>`).
#[derive(Serialize, Display, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    #[strum(serialize = "HTML")]
    Html,
}
