use super::{EpicStoreAPI, Storefront};
use crate::error::Error;
use crate::helpers::{get_default_middleware, USER_AGENT_STRING};
use std::time::Duration;
use reqwest_middleware::ClientWithMiddleware;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Builder for constructing an [`EpicStoreAPI`].
#[derive(Debug, Clone)]
pub struct EpicStoreAPIBuilder {
    /// The storefront to get offers for.
    pub(crate) storefront: Storefront,
    /// Timeout for each request. Defaults to 20 seconds.
    pub(crate) timeout: Duration,
    /// How many times to retry transient failures. Defaults to 3.
    pub(crate) max_retries: u32,
    /// Client to use for requests.
    pub(crate) client: Option<ClientWithMiddleware>,
    /// User agent for requests.
    pub(crate) user_agent: &'static str,
    /// The promotions endpoint. Defaults to the store's.
    pub(crate) endpoint: Option<String>,
}

impl EpicStoreAPIBuilder {
    /// Creates a new [`EpicStoreAPIBuilder`].
    pub fn new(storefront: Storefront) -> Self {
        Self {
            storefront,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            client: None,
            user_agent: USER_AGENT_STRING,
            endpoint: None,
        }
    }

    /// Timeout for each request. Defaults to 20 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How many times to retry transient failures. Defaults to 3.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Client to use for requests. The timeout and retry settings are ignored when a client is
    /// given.
    pub fn client(mut self, client: ClientWithMiddleware) -> Self {
        self.client = Some(client);
        self
    }

    /// The promotions endpoint, without query parameters. Defaults to the store's.
    pub fn endpoint<T>(mut self, endpoint: T) -> Self
    where
        T: Into<String>,
    {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Builds the [`EpicStoreAPI`].
    pub fn build(self) -> Result<EpicStoreAPI, Error> {
        let client = match self.client {
            Some(client) => client,
            None => get_default_middleware(self.user_agent, self.timeout, self.max_retries)?,
        };

        let api_url = match &self.endpoint {
            Some(endpoint) => self.storefront.api_url_at(endpoint)?,
            None => self.storefront.api_url()?,
        };

        Ok(EpicStoreAPI {
            client,
            api_url,
            storefront: self.storefront,
        })
    }
}
