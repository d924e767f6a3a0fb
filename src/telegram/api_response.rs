use crate::types::{ChatId, MessageId, UpdateId};
use serde::Deserialize;

/// The envelope every Bot API response is wrapped in.
#[derive(Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ResponseParameters {
    /// Seconds to wait before the request can be repeated after flood control kicks in.
    #[serde(default)]
    pub retry_after: Option<u64>,
}

/// An incoming update. Only message updates are read.
#[derive(Deserialize, Debug, Clone)]
pub struct Update {
    pub update_id: UpdateId,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub message_id: MessageId,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Chat {
    pub id: ChatId,
}

/// The bot's own account, from `getMe`.
#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_updates_response() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(include_str!("fixtures/get_updates.json")).unwrap();
        let updates = response.result.unwrap();
        let message = updates.first().unwrap().message.as_ref().unwrap();

        assert!(response.ok);
        assert_eq!(updates.len(), 3);
        assert_eq!(message.chat.id, 123456789);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert!(updates[2].message.is_none());
    }

    #[test]
    fn parses_get_me_response() {
        let response: ApiResponse<User> = serde_json::from_str(include_str!("fixtures/get_me.json")).unwrap();
        let user = response.result.unwrap();

        assert_eq!(user.id, 7012345678);
        assert_eq!(user.username.as_deref(), Some("EpicFreeGamesBot"));
    }

    #[test]
    fn parses_error_response() {
        let response: ApiResponse<Message> = serde_json::from_str(include_str!("fixtures/error_too_many_requests.json")).unwrap();

        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error_code, Some(429));
        assert_eq!(response.parameters.unwrap().retry_after, Some(14));
    }
}
