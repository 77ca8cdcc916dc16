use log::{debug, log_enabled, trace, warn};
use reqwest::header;
use reqwest_middleware::RequestBuilder;
use serde_json::{json, Value};

use crate::{
    config::Config,
    datocms::{AllBlogPosts, GraphQLResponse, RawPost},
    error::SourceUnavailable,
    post::ContentSource,
};

use super::ApiClient;

/// Every field the blog needs, for every post regardless of status.
pub const BLOG_POSTS_QUERY: &str = r#"query AllBlogPosts {
  allBlogPosts {
    id
    _status
    _firstPublishedAt
    slug
    headings
    richText {
      value
      blocks
      links
    }
    date
    media {
      url
      alt
    }
    seo {
      title
      description
    }
  }
}"#;

#[derive(Debug, Clone)]
pub struct DatoClient {
    inner: ApiClient,
    endpoint: String,
    authorization: String,
}

impl DatoClient {
    pub fn new(config: &Config) -> Result<Self, SourceUnavailable> {
        let inner = ApiClient::new(config)?;
        let endpoint = config.endpoint().to_string();
        let authorization = config.authorization();
        Ok(Self {
            inner,
            endpoint,
            authorization,
        })
    }

    fn wrap_request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(header::AUTHORIZATION, &self.authorization)
            .header(header::ACCEPT, "application/json")
    }

    /// The response body of the blog query, untouched.
    pub async fn fetch_raw_json(&self) -> Result<Value, SourceUnavailable> {
        let request = self
            .inner
            .client()
            .post(&self.endpoint)
            .json(&json!({ "query": BLOG_POSTS_QUERY }));
        let response = self.wrap_request(request).send().await?;

        debug!("POST {} ({})", self.endpoint, response.status());
        let status = response.status();
        if !status.is_success() {
            return Err(SourceUnavailable::Status(status));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        if log_enabled!(log::Level::Trace) {
            trace!("{}", serde_json::to_string_pretty(&value)?);
        }

        Ok(value)
    }
}

impl ContentSource for DatoClient {
    async fn fetch_raw_posts(&self) -> Result<Vec<RawPost>, SourceUnavailable> {
        let value = self.fetch_raw_json().await?;
        let response: GraphQLResponse<AllBlogPosts> = serde_json::from_value(value)?;

        if !response.errors.is_empty() {
            let messages = response.errors.into_iter().map(|e| e.message).collect();
            return Err(SourceUnavailable::Query(messages));
        }

        let items = response.data.unwrap_or_default().all_blog_posts;
        let posts = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<RawPost>(item) {
                Ok(post) => Some(post),
                Err(e) => {
                    warn!("Skipping malformed post #{}: {}", index, e);
                    None
                }
            })
            .collect();

        Ok(posts)
    }
}
