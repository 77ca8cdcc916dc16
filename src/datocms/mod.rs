pub mod post;

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

pub use post::{RawMedia, RawPost, Seo, StructuredText};

/// Envelope of every GraphQL response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllBlogPosts {
    /// Kept as raw values so one malformed item does not sink the whole list.
    #[serde(default)]
    pub all_blog_posts: Vec<Value>,
}

/// A record embedded in structured text, either as a block or an inline item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "__typename", default, deserialize_with = "lenient")]
    pub typename: Option<String>,
    #[serde(rename = "_modelApiKey", default, deserialize_with = "lenient")]
    pub model_api_key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageAsset>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageAsset {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<u32>,
}

impl Record {
    pub fn is_image(&self) -> bool {
        self.model_api_key.as_deref() == Some("image")
            || self.typename.as_deref() == Some("ImageRecord")
    }

    pub fn image_url(&self) -> Option<&str> {
        let from_image = self.image.as_ref().and_then(|image| image.url.as_deref());
        non_empty(from_image).or(non_empty(self.url.as_deref()))
    }

    pub fn image_alt(&self) -> Option<&str> {
        let from_image = self.image.as_ref().and_then(|image| image.alt.as_deref());
        non_empty(from_image).or(non_empty(self.alt.as_deref()))
    }

    pub fn image_size(&self) -> (Option<u32>, Option<u32>) {
        match &self.image {
            Some(image) => (image.width, image.height),
            None => (None, None),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Deserializes a field, turning any type mismatch into `None`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes a list field, accepting a single object in place of a list
/// and skipping entries that do not fit.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let list = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Value::Null => vec![],
        item => serde_json::from_value(item).ok().into_iter().collect(),
    };
    Ok(list)
}
