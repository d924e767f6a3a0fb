use super::Dispatcher;
use crate::enums::Command;
use crate::error::TelegramError;
use crate::telegram::{TelegramAPI, Update};
use crate::types::UpdateId;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Pause after failing to get updates.
const RETRY_PAUSE: Duration = Duration::from_secs(5);

/// Where incoming messages come from.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Waits for updates with an ID of at least `offset`.
    async fn get_updates(
        &self,
        offset: Option<UpdateId>,
    ) -> Result<Vec<Update>, TelegramError>;
}

#[async_trait]
impl UpdateSource for TelegramAPI {
    async fn get_updates(
        &self,
        offset: Option<UpdateId>,
    ) -> Result<Vec<Update>, TelegramError> {
        TelegramAPI::get_updates(self, offset).await
    }
}

/// Gets one batch of updates and spawns a task for each command. Commands addressed to other
/// bots than `bot_username` are skipped. Returns the offset to poll with next along with the
/// spawned tasks.
pub async fn poll_updates<S>(
    source: &S,
    dispatcher: &Arc<Dispatcher>,
    bot_username: Option<&str>,
    offset: Option<UpdateId>,
) -> Result<(Option<UpdateId>, Vec<JoinHandle<()>>), TelegramError>
where
    S: UpdateSource + ?Sized,
{
    let updates = source.get_updates(offset).await?;
    let mut next_offset = offset;
    let mut handles = Vec::new();

    for update in updates {
        // Confirms this update so it isn't received again.
        next_offset = next_offset.max(Some(update.update_id + 1));

        let Some(message) = update.message else {
            continue;
        };
        let Some(command) = message.text.as_deref().and_then(|text| Command::parse(text, bot_username)) else {
            continue;
        };
        let dispatcher = Arc::clone(dispatcher);
        let chat_id = message.chat.id;

        // A manual check takes a while so each command gets its own task.
        handles.push(tokio::spawn(async move {
            dispatcher.handle_command(chat_id, command).await;
        }));
    }

    Ok((next_offset, handles))
}

/// Receives commands until the process exits.
pub async fn run_update_loop<S>(
    source: S,
    dispatcher: Arc<Dispatcher>,
    bot_username: Option<String>,
)
where
    S: UpdateSource,
{
    let mut offset = None;

    log::info!("Listening for commands");

    loop {
        match poll_updates(&source, &dispatcher, bot_username.as_deref(), offset).await {
            Ok((next_offset, _handles)) => offset = next_offset,
            Err(error) => {
                let pause = match &error {
                    TelegramError::TooManyRequests { retry_after } => RETRY_PAUSE.max(Duration::from_secs(*retry_after)),
                    _ => RETRY_PAUSE,
                };

                log::error!("Error getting updates: {error}");
                sleep(pause).await;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::notifier::{Notifier, Pacing};
    use crate::store::{MemoryStore, PersistedSet, Subscribers};
    use crate::telegram::{Chat, Message};
    use crate::testing::{RecordingTransport, ScriptedCatalog};
    use crate::types::ChatId;
    use std::collections::HashSet;
    use std::sync::Mutex;

    const BOT: Option<&str> = Some("EpicFreeGamesBot");

    struct ScriptedUpdates {
        updates: Vec<Update>,
        offsets: Mutex<Vec<Option<UpdateId>>>,
    }

    #[async_trait]
    impl UpdateSource for ScriptedUpdates {
        async fn get_updates(
            &self,
            offset: Option<UpdateId>,
        ) -> Result<Vec<Update>, TelegramError> {
            self.offsets.lock().unwrap().push(offset);

            Ok(self.updates.iter()
                .filter(|update| offset.map_or(true, |offset| update.update_id >= offset))
                .cloned()
                .collect())
        }
    }

    fn update(update_id: UpdateId, chat_id: ChatId, text: Option<&str>) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id: update_id,
                chat: Chat {
                    id: chat_id,
                },
                text: text.map(String::from),
            }),
        }
    }

    fn dispatcher() -> (Arc<Dispatcher>, Subscribers) {
        let config = Config::from_vars(|name| (name == "TELEGRAM_BOT_TOKEN").then(|| "123:abc".into())).unwrap();
        let subscribers = PersistedSet::new("subscribers", MemoryStore::new(HashSet::new()));
        let dispatcher = Dispatcher::new(
            &config,
            Arc::new(ScriptedCatalog::default()),
            Notifier::new(Arc::new(RecordingTransport::default()), config.timezone, Pacing::immediate()),
            subscribers.clone(),
            PersistedSet::new("sent games", MemoryStore::new(HashSet::new())),
        );

        (Arc::new(dispatcher), subscribers)
    }

    #[tokio::test]
    async fn handles_commands_and_advances_offset() {
        let (dispatcher, subscribers) = dispatcher();
        let source = ScriptedUpdates {
            updates: vec![
                update(10, 1, Some("/start")),
                update(11, 2, Some("hello")),
                update(12, 3, None),
                update(13, 4, Some("/start@EpicFreeGamesBot")),
                Update { update_id: 14, message: None },
            ],
            offsets: Mutex::new(Vec::new()),
        };
        let (offset, handles) = poll_updates(&source, &dispatcher, BOT, None).await.unwrap();

        assert_eq!(offset, Some(15));
        assert_eq!(handles.len(), 2);

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(subscribers.load().await, HashSet::from([1, 4]));

        let (offset, handles) = poll_updates(&source, &dispatcher, BOT, offset).await.unwrap();

        assert_eq!(offset, Some(15));
        assert!(handles.is_empty());
        assert_eq!(*source.offsets.lock().unwrap(), vec![None, Some(15)]);
    }

    #[tokio::test]
    async fn ignores_commands_for_other_bots() {
        let (dispatcher, subscribers) = dispatcher();

        subscribers.add(1).await;

        let source = ScriptedUpdates {
            updates: vec![
                update(20, 1, Some("/stop@SomeOtherBot")),
                update(21, 2, Some("/start@SomeOtherBot")),
                update(22, 3, Some("/start@epicfreegamesbot")),
            ],
            offsets: Mutex::new(Vec::new()),
        };
        let (offset, handles) = poll_updates(&source, &dispatcher, BOT, None).await.unwrap();

        assert_eq!(offset, Some(23));
        assert_eq!(handles.len(), 1);

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(subscribers.load().await, HashSet::from([1, 3]));
    }
}
