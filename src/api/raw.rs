//! Raw catalog types as they appear in the `freeGamesPromotions` response. Almost every field is
//! optional upstream, and `null` shows up in place of lists regularly.

use serde::{Deserialize, Deserializer};

/// Treats `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A product in the catalog.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_images: Vec<RawKeyImage>,
    #[serde(default)]
    pub product_slug: Option<String>,
    #[serde(default)]
    pub url_slug: Option<String>,
    #[serde(default)]
    pub catalog_ns: Option<RawCatalogNs>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offer_mappings: Vec<RawMapping>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub promotions: Option<RawPromotions>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawKeyImage {
    #[serde(rename = "type", default)]
    pub image_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawCatalogNs {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mappings: Vec<RawMapping>,
}

/// Maps a page on the store to the product.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawMapping {
    #[serde(default)]
    pub page_slug: Option<String>,
    #[serde(default)]
    pub page_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPrice {
    #[serde(default)]
    pub total_price: Option<RawTotalPrice>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTotalPrice {
    /// The price after discounts in the currency's smallest unit.
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub fmt_price: Option<RawFmtPrice>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawFmtPrice {
    #[serde(default)]
    pub original_price: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPromotions {
    /// Promotions which are running now. Upcoming promotions are listed separately and are not
    /// read.
    #[serde(default, deserialize_with = "null_as_default")]
    pub promotional_offers: Vec<RawPromotionalOfferGroup>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPromotionalOfferGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub promotional_offers: Vec<RawPromotionalOffer>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPromotionalOffer {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub discount_setting: Option<RawDiscountSetting>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawDiscountSetting {
    /// The percentage of the original price left to pay. `0` means the game is free.
    #[serde(default)]
    pub discount_percentage: Option<f64>,
}
