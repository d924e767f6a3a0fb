/// An error reading or writing a data file.
#[derive(thiserror::Error, Debug)]
pub enum FileError {
    #[error("Filesystem error: {}", .0)]
    FileSystem(#[from] std::io::Error),
    #[error("Error parsing file contents: {}", .0)]
    Parse(#[from] serde_json::Error),
}

/// An error making an HTTP request.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Request error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    #[error("Request middleware error: {}", .0)]
    ReqwestMiddleware(anyhow::Error),
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
    #[error("Error {}", .0)]
    Http(reqwest::StatusCode),
    #[error("Invalid URL: {}", .0)]
    Url(#[from] url::ParseError),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Error {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Error::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => Error::ReqwestMiddleware(e),
        }
    }
}

/// An error returned from the Telegram Bot API.
#[derive(thiserror::Error, Debug)]
pub enum TelegramError {
    /// The bot was blocked by the user, kicked from the group, or the user is deactivated.
    #[error("Forbidden: {}", .0)]
    Forbidden(String),
    /// The chat or user no longer exists or was never reachable by the bot.
    #[error("Chat not found: {}", .0)]
    ChatNotFound(String),
    #[error("Bad request: {}", .0)]
    BadRequest(String),
    #[error("Too many requests, retry after {} seconds", .retry_after)]
    TooManyRequests {
        retry_after: u64,
    },
    #[error("Error {}: {}", .code, .description)]
    Api {
        code: i64,
        description: String,
    },
    #[error("Request error: {}", .0)]
    Request(String),
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
}

impl TelegramError {
    /// Classifies an error response from the Bot API using its `error_code`, `description` and
    /// `parameters.retry_after` fields.
    pub fn from_api(
        code: i64,
        description: String,
        retry_after: Option<u64>,
    ) -> Self {
        match code {
            403 => Self::Forbidden(description),
            400 if is_chat_gone(&description) => Self::ChatNotFound(description),
            400 => Self::BadRequest(description),
            429 => Self::TooManyRequests {
                retry_after: retry_after.unwrap_or(1),
            },
            _ => Self::Api {
                code,
                description,
            },
        }
    }

    /// Whether the chat can no longer be reached and should be unsubscribed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::ChatNotFound(_))
    }
}

// Request URLs contain the bot token so they are stripped from errors.
impl From<reqwest::Error> for TelegramError {
    fn from(error: reqwest::Error) -> TelegramError {
        TelegramError::Request(error.without_url().to_string())
    }
}

impl From<reqwest_middleware::Error> for TelegramError {
    fn from(error: reqwest_middleware::Error) -> TelegramError {
        match error {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => TelegramError::Request(e.to_string()),
        }
    }
}

fn is_chat_gone(description: &str) -> bool {
    let description = description.to_lowercase();

    description.contains("chat not found") ||
    description.contains("user not found") ||
    description.contains("peer_id_invalid") ||
    description.contains("group chat was deactivated") ||
    description.contains("chat was upgraded")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_blocked_bot_as_permanent() {
        let error = TelegramError::from_api(403, "Forbidden: bot was blocked by the user".into(), None);

        assert!(matches!(error, TelegramError::Forbidden(_)));
        assert!(error.is_permanent());
    }

    #[test]
    fn classifies_missing_chat_as_permanent() {
        let error = TelegramError::from_api(400, "Bad Request: chat not found".into(), None);

        assert!(matches!(error, TelegramError::ChatNotFound(_)));
        assert!(error.is_permanent());
    }

    #[test]
    fn classifies_other_errors_as_transient() {
        let bad_markup = TelegramError::from_api(400, "Bad Request: can't parse entities".into(), None);
        let flood = TelegramError::from_api(429, "Too Many Requests: retry after 5".into(), Some(5));
        let server = TelegramError::from_api(502, "Bad Gateway".into(), None);

        assert!(!bad_markup.is_permanent());
        assert!(matches!(flood, TelegramError::TooManyRequests { retry_after: 5 }));
        assert!(!flood.is_permanent());
        assert!(!server.is_permanent());
    }
}
