use crate::types::OfferSlug;
use std::fmt;

/// A game which is currently free to claim on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    /// The title of the game.
    pub title: String,
    /// The image to display with the notification.
    pub image_url: String,
    /// When the free promotion started, as an ISO-8601 timestamp from the store.
    pub start_date: String,
    /// When the free promotion ends, as an ISO-8601 timestamp from the store.
    pub end_date: String,
    /// The page to claim the game from. This is the free games page when the product page
    /// could not be resolved.
    pub url: String,
    /// Identifies the offer across checks. This is the product slug, or the title with spaces
    /// replaced by underscores when the catalog doesn't include one.
    pub slug: OfferSlug,
    /// The formatted price before the discount, e.g. `¥70.00`. `N/A` when not given.
    pub original_price: String,
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.slug)
    }
}
