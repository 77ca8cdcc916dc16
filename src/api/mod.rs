pub mod datocms;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::config::Config;

pub use datocms::DatoClient;

/// HTTP client shared by the content clients: request timeout from the
/// config, transient failures retried up to `--retries` times (none by
/// default).
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries());

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Ok(Self { client })
    }

    pub fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }
}
