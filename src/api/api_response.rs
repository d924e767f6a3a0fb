use super::raw;
use serde::Deserialize;

/// The body of the `freeGamesPromotions` response: `data.Catalog.searchStore.elements`.
#[derive(Deserialize, Debug, Default)]
pub struct FreeGamesPromotionsResponse {
    #[serde(default)]
    pub data: Option<FreeGamesPromotionsData>,
}

#[derive(Deserialize, Debug, Default)]
pub struct FreeGamesPromotionsData {
    #[serde(rename = "Catalog", default)]
    pub catalog: Option<Catalog>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Catalog {
    #[serde(rename = "searchStore", default)]
    pub search_store: Option<SearchStore>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchStore {
    #[serde(default)]
    pub elements: Option<Vec<raw::RawElement>>,
}

impl FreeGamesPromotionsResponse {
    /// Takes the catalog elements out of the response. Missing levels yield no elements.
    pub fn into_elements(self) -> Vec<raw::RawElement> {
        self.data
            .and_then(|data| data.catalog)
            .and_then(|catalog| catalog.search_store)
            .and_then(|search_store| search_store.elements)
            .unwrap_or_default()
    }
}
