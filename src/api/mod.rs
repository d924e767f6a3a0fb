//! Client for the Epic Games Store free games promotions endpoint.

mod api_response;
mod builder;
mod helpers;
mod raw;

pub use builder::EpicStoreAPIBuilder;
pub use helpers::{parse_free_offers, FALLBACK_IMAGE_URL};

use crate::error::Error;
use crate::helpers::check_response;
use crate::response::Offer;
use crate::time;
use crate::types::HttpClient;
use async_trait::async_trait;
use url::Url;

const API_URL: &str = "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions";
const STORE_HOSTNAME: &str = "https://store.epicgames.com";

/// The locale and country of the store. Determines prices, availability and the language of
/// store pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storefront {
    /// e.g. `zh-CN`.
    pub locale: String,
    /// e.g. `CN`.
    pub country: String,
}

impl Storefront {
    pub fn new<T, U>(locale: T, country: U) -> Self
    where
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            locale: locale.into(),
            country: country.into(),
        }
    }

    /// The URL of the promotions endpoint for this storefront.
    pub fn api_url(&self) -> Result<Url, Error> {
        self.api_url_at(API_URL)
    }

    /// The URL of the promotions endpoint at `endpoint` for this storefront.
    pub fn api_url_at(&self, endpoint: &str) -> Result<Url, Error> {
        let url = Url::parse_with_params(endpoint, &[
            ("locale", self.locale.as_str()),
            ("country", self.country.as_str()),
            ("allowCountries", self.country.as_str()),
        ])?;

        Ok(url)
    }

    /// The page listing all current free games.
    pub fn free_games_url(&self) -> String {
        format!("{}/{}/free-games", STORE_HOSTNAME, self.locale)
    }

    /// The store page of a product.
    pub fn product_url(&self, slug: &str) -> String {
        format!("{}/{}/p/{}", STORE_HOSTNAME, self.locale, slug)
    }
}

/// A source of the offers which are currently free.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Gets the offers which are free right now. Failures are logged and yield no offers.
    async fn fetch_free_offers(&self) -> Vec<Offer>;
}

/// Fetches free games from the Epic Games Store.
#[derive(Debug, Clone)]
pub struct EpicStoreAPI {
    client: HttpClient,
    api_url: Url,
    /// The storefront to get offers for.
    pub storefront: Storefront,
}

impl EpicStoreAPI {
    /// Builder for constructing an [`EpicStoreAPI`].
    pub fn builder(storefront: Storefront) -> EpicStoreAPIBuilder {
        EpicStoreAPIBuilder::new(storefront)
    }

    /// Gets the offers which are free right now.
    pub async fn get_free_offers(&self) -> Result<Vec<Offer>, Error> {
        let response = self.client.get(self.api_url.clone())
            .send()
            .await?;
        let body = check_response(response).await?;
        let offers = parse_free_offers(&body, &time::get_server_time_now(), &self.storefront)?;

        Ok(offers)
    }
}

#[async_trait]
impl Catalog for EpicStoreAPI {
    async fn fetch_free_offers(&self) -> Vec<Offer> {
        log::info!("Fetching free games from the Epic Games Store...");

        match self.get_free_offers().await {
            Ok(offers) => {
                log::info!("Found {} free games", offers.len());
                offers
            },
            Err(error) => {
                log::error!("Error fetching free games: {error}");
                Vec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{http_response, serve};
    use std::time::Duration;

    fn api_at(endpoint: &str) -> EpicStoreAPI {
        EpicStoreAPI::builder(Storefront::new("en-US", "US"))
            .endpoint(endpoint)
            .max_retries(0)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn builds_storefront_urls() {
        let storefront = Storefront::new("zh-CN", "CN");

        assert_eq!(
            storefront.api_url().unwrap().as_str(),
            "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions?locale=zh-CN&country=CN&allowCountries=CN",
        );
        assert_eq!(storefront.free_games_url(), "https://store.epicgames.com/zh-CN/free-games");
        assert_eq!(storefront.product_url("foo"), "https://store.epicgames.com/zh-CN/p/foo");
    }

    #[test]
    fn builds_api_url_at_endpoint() {
        let api = api_at("http://127.0.0.1:8080/freeGamesPromotions");

        assert_eq!(
            api.api_url.as_str(),
            "http://127.0.0.1:8080/freeGamesPromotions?locale=en-US&country=US&allowCountries=US",
        );
    }

    #[tokio::test]
    async fn no_offers_when_store_is_unreachable() {
        // Nothing listens on the port once the listener is dropped.
        let address = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let api = api_at(&format!("http://{address}/freeGamesPromotions"));

        assert!(matches!(api.get_free_offers().await, Err(Error::Reqwest(_))));
        assert!(api.fetch_free_offers().await.is_empty());
    }

    #[tokio::test]
    async fn no_offers_on_error_status() {
        let api = api_at(&serve(http_response("503 Service Unavailable", "")).await);

        assert!(matches!(api.get_free_offers().await, Err(Error::Http(status)) if status == 503));
        assert!(api.fetch_free_offers().await.is_empty());
    }

    #[tokio::test]
    async fn no_offers_on_malformed_body() {
        let api = api_at(&serve(http_response("200 OK", "<html>oops</html>")).await);

        assert!(matches!(api.get_free_offers().await, Err(Error::Parse(_))));
        assert!(api.fetch_free_offers().await.is_empty());
    }

    #[tokio::test]
    async fn reads_promotions_from_endpoint() {
        let body = include_str!("fixtures/free_games_promotions.json");
        let api = api_at(&serve(http_response("200 OK", body)).await);

        // The fixture's promotions are over so none are free now.
        assert!(api.get_free_offers().await.unwrap().is_empty());
    }
}
