//! Detects which of the current offers have not been broadcast yet.

use crate::response::Offer;
use crate::types::OfferSlug;
use std::collections::HashSet;

/// The result of comparing current offers against the already notified slugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection<'a> {
    /// Offers whose slugs were not notified yet, in the order they were given.
    pub new_offers: Vec<&'a Offer>,
    /// Slugs of all current offers. This is what the notified set becomes after a broadcast,
    /// which also means an empty list of offers clears it.
    pub current_slugs: HashSet<OfferSlug>,
}

/// Compares `offers` against the `notified` slugs.
pub fn detect<'a>(
    offers: &'a [Offer],
    notified: &HashSet<OfferSlug>,
) -> Detection<'a> {
    let mut current_slugs = HashSet::with_capacity(offers.len());
    let mut new_offers = Vec::new();

    for offer in offers {
        // insert returns false for a slug repeated within the same list
        if current_slugs.insert(offer.slug.clone()) && !notified.contains(&offer.slug) {
            new_offers.push(offer);
        }
    }

    Detection {
        new_offers,
        current_slugs,
    }
}
