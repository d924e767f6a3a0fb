use super::raw::{RawElement, RawKeyImage, RawMapping, RawPromotions};
use super::api_response::FreeGamesPromotionsResponse;
use super::Storefront;
use crate::enums::ImageType;
use crate::response::Offer;
use crate::time::{parse_iso_date, ServerTime};
use std::collections::HashMap;
use std::str::FromStr;

/// Used when a catalog element has none of the preferred images.
pub const FALLBACK_IMAGE_URL: &str = "https://cdn2.unrealengine.com/epic-games-store-logo-uv-1920x1080-f43677841470.png";

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_PRICE: &str = "N/A";
const PRODUCT_HOME_PAGE_TYPE: &str = "productHome";
/// The catalog sometimes serializes an empty slug list into the slug field.
const EMPTY_SLUG_MARKER: &str = "[]";

/// Parses a `freeGamesPromotions` response body into the offers which are free at `now`.
pub fn parse_free_offers(
    body: &[u8],
    now: &ServerTime,
    storefront: &Storefront,
) -> Result<Vec<Offer>, serde_json::Error> {
    let response: FreeGamesPromotionsResponse = serde_json::from_slice(body)?;

    Ok(offers_from_elements(response.into_elements(), now, storefront))
}

/// Converts catalog elements into offers, skipping elements which are not free at `now`.
pub fn offers_from_elements(
    elements: Vec<RawElement>,
    now: &ServerTime,
    storefront: &Storefront,
) -> Vec<Offer> {
    elements
        .into_iter()
        .filter_map(|element| from_raw_element(element, now, storefront))
        .collect()
}

fn from_raw_element(
    element: RawElement,
    now: &ServerTime,
    storefront: &Storefront,
) -> Option<Offer> {
    let (start_date, end_date) = free_window(element.promotions.as_ref()?, now)?;
    let total_price = element.price.as_ref()?.total_price.as_ref()?;

    if total_price.discount_price != Some(0.0) {
        return None;
    }

    let original_price = total_price.fmt_price.as_ref()
        .and_then(|fmt_price| fmt_price.original_price.clone())
        .unwrap_or_else(|| UNKNOWN_PRICE.into());
    let title = element.title.clone()
        .unwrap_or_else(|| UNKNOWN_TITLE.into());
    let image_url = select_image_url(&element.key_images);
    let (url, slug) = match resolve_slug(&element) {
        Some(slug) => (storefront.product_url(&slug), slug),
        None => (storefront.free_games_url(), title.replace(' ', "_")),
    };

    Some(Offer {
        title,
        image_url,
        start_date,
        end_date,
        url,
        slug,
        original_price,
    })
}

/// Finds the first running promotion which makes the game free, returning its start and end
/// dates. A promotion is running when `start <= now < end`.
pub fn free_window(
    promotions: &RawPromotions,
    now: &ServerTime,
) -> Option<(String, String)> {
    promotions.promotional_offers
        .iter()
        .flat_map(|group| group.promotional_offers.iter())
        .filter(|offer| {
            offer.discount_setting.as_ref()
                .and_then(|setting| setting.discount_percentage) == Some(0.0)
        })
        .find_map(|offer| {
            let start_date = offer.start_date.as_deref()?;
            let end_date = offer.end_date.as_deref()?;
            let start = parse_iso_date(start_date)?;
            let end = parse_iso_date(end_date)?;

            if start <= *now && *now < end {
                Some((start_date.to_string(), end_date.to_string()))
            } else {
                None
            }
        })
}

/// Selects the most preferred image by type, falling back to the store logo.
pub fn select_image_url(key_images: &[RawKeyImage]) -> String {
    let mut images: HashMap<ImageType, &str> = HashMap::new();

    for image in key_images {
        let image_type = image.image_type.as_deref()
            .and_then(|image_type| ImageType::from_str(image_type).ok());

        if let (Some(image_type), Some(url)) = (image_type, image.url.as_deref()) {
            if !url.is_empty() {
                // The last image of a type wins, same as building a map from the list.
                images.insert(image_type, url);
            }
        }
    }

    ImageType::PRIORITY
        .iter()
        .find_map(|image_type| images.get(image_type))
        .map(|url| url.to_string())
        .unwrap_or_else(|| FALLBACK_IMAGE_URL.into())
}

/// Resolves the product slug used in store URLs. Tries the `productHome` page mapping, then the
/// legacy `productSlug` and `urlSlug` fields.
pub fn resolve_slug(element: &RawElement) -> Option<String> {
    let mappings: &[RawMapping] = match &element.catalog_ns {
        Some(catalog_ns) if !catalog_ns.mappings.is_empty() => &catalog_ns.mappings,
        _ => &element.offer_mappings,
    };
    let page_slug = mappings
        .iter()
        .filter(|mapping| mapping.page_type.as_deref() == Some(PRODUCT_HOME_PAGE_TYPE))
        .filter_map(|mapping| mapping.page_slug.as_deref())
        .find(|slug| !slug.is_empty() && !slug.contains('/'));

    if let Some(slug) = page_slug {
        return Some(slug.to_string());
    }

    // Only the first path segment of the product slug is the slug, e.g. `some-game/home`.
    let product_slug = element.product_slug.as_deref()
        .and_then(|slug| slug.split('/').next())
        .filter(|slug| !slug.is_empty());

    if let Some(slug) = product_slug {
        return Some(slug.to_string());
    }

    element.url_slug.as_deref()
        .filter(|slug| !slug.is_empty() && *slug != EMPTY_SLUG_MARKER)
        .map(String::from)
}
