//! Types for common values shared between the catalog, the stores and Telegram.

/// Identifies a Telegram chat. Private chats use the user's ID, groups use negative IDs.
pub type ChatId = i64;
/// Identifies a message within a chat.
pub type MessageId = i64;
/// Identifies an update received from `getUpdates`.
pub type UpdateId = i64;
/// The stable identifier of an offer, usually the store product slug.
pub type OfferSlug = String;

pub use crate::time::ServerTime;

// Types internally used by the crate.
use reqwest_middleware::ClientWithMiddleware;

pub(crate) type HttpClient = ClientWithMiddleware;
