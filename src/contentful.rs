//! Contentful Delivery/Preview API client.
//!
//! Fetches What's New Panel entries over the Contentful REST API. The REST
//! API returns linked entries and assets unresolved, as `{sys: {type:
//! "Link"}}` stubs next to an `includes` section; [`LinkIndex`] splices the
//! targets back in so the result matches the `{fields: {...}}` shape the
//! transform expects.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::entry::RawEntry;

const DELIVERY_HOST: &str = "https://cdn.contentful.com";
const PREVIEW_HOST: &str = "https://preview.contentful.com";

/// Content type of panel entries in the Contentful space.
const CONTENT_TYPE: &str = "whatsNewPanel";

/// Link depth requested from the API and honored during resolution:
/// entry -> content/targeting -> icon asset / targeting sub-records.
const INCLUDE_DEPTH: usize = 3;

/// Error type for Contentful operations.
#[derive(Debug)]
pub enum ContentfulError {
    /// Required configuration is missing.
    Config(String),
    /// Transport-level failure.
    Http(reqwest::Error),
    /// Non-success response from the API.
    Status { status: u16, body: String },
    /// Response body does not have the expected shape.
    Decode(String),
    /// No published entry with the requested id.
    NotFound { id: String },
}

impl From<reqwest::Error> for ContentfulError {
    fn from(err: reqwest::Error) -> Self {
        ContentfulError::Http(err)
    }
}

impl From<serde_json::Error> for ContentfulError {
    fn from(err: serde_json::Error) -> Self {
        ContentfulError::Decode(err.to_string())
    }
}

impl std::fmt::Display for ContentfulError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentfulError::Config(msg) => write!(f, "Contentful configuration error: {}", msg),
            ContentfulError::Http(e) => write!(f, "Contentful request failed: {}", e),
            ContentfulError::Status { status, body } => {
                write!(f, "Contentful responded with status {}: {}", status, body)
            }
            ContentfulError::Decode(msg) => {
                write!(f, "Contentful response has unexpected shape: {}", msg)
            }
            ContentfulError::NotFound { id } => write!(f, "No entry with id '{}'", id),
        }
    }
}

impl std::error::Error for ContentfulError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentfulError::Http(e) => Some(e),
            _ => None,
        }
    }
}

/// Contentful access configuration, read from the environment.
#[derive(Clone)]
pub struct ContentfulConfig {
    pub space_id: String,
    pub access_token: String,
    /// Preview API token; only needed for unpublish webhooks, where the
    /// entry is no longer on the Delivery API.
    pub preview_token: Option<String>,
    pub environment: String,
}

impl ContentfulConfig {
    /// Read configuration from the environment.
    ///
    /// `SPACE_ID` and `ACCESS_TOKEN` are required; `PREVIEW_TOKEN` is
    /// optional; `CONTENTFUL_ENVIRONMENT` defaults to `master`.
    pub fn from_env() -> Result<Self, ContentfulError> {
        Ok(Self {
            space_id: require_env("SPACE_ID")?,
            access_token: require_env("ACCESS_TOKEN")?,
            preview_token: std::env::var("PREVIEW_TOKEN").ok(),
            environment: std::env::var("CONTENTFUL_ENVIRONMENT")
                .unwrap_or_else(|_| "master".to_string()),
        })
    }
}

fn require_env(name: &str) -> Result<String, ContentfulError> {
    std::env::var(name).map_err(|_| ContentfulError::Config(format!("{} is not set", name)))
}

/// Client for the Contentful Delivery and Preview APIs.
#[derive(Clone)]
pub struct ContentfulClient {
    http: reqwest::Client,
    config: ContentfulConfig,
}

impl ContentfulClient {
    pub fn new(config: ContentfulConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch all published panel entries.
    pub async fn fetch_all(&self) -> Result<Vec<RawEntry>, ContentfulError> {
        let body = self
            .get_entries(DELIVERY_HOST, &self.config.access_token, None)
            .await?;
        let entries = collection_to_entries(&body)?;
        tracing::info!("Fetched {} entries from Contentful", entries.len());
        Ok(entries)
    }

    /// Fetch one published entry by id.
    ///
    /// Filters the collection endpoint by `sys.id` rather than using the
    /// single-entry endpoint: single-entry responses carry no `includes`
    /// section, so links could not be resolved.
    pub async fn fetch_one(&self, id: &str) -> Result<RawEntry, ContentfulError> {
        let body = self
            .get_entries(DELIVERY_HOST, &self.config.access_token, Some(id))
            .await?;
        first_entry(&body, id)
    }

    /// Fetch one entry by id from the Preview API, which still serves
    /// entries after they are unpublished.
    pub async fn fetch_one_preview(&self, id: &str) -> Result<RawEntry, ContentfulError> {
        let token = self.config.preview_token.as_deref().ok_or_else(|| {
            ContentfulError::Config("PREVIEW_TOKEN is not set".to_string())
        })?;
        let body = self.get_entries(PREVIEW_HOST, token, Some(id)).await?;
        first_entry(&body, id)
    }

    async fn get_entries(
        &self,
        host: &str,
        token: &str,
        id: Option<&str>,
    ) -> Result<JsonValue, ContentfulError> {
        let url = format!(
            "{}/spaces/{}/environments/{}/entries",
            host, self.config.space_id, self.config.environment
        );

        let include = INCLUDE_DEPTH.to_string();
        let mut query: Vec<(&str, &str)> =
            vec![("content_type", CONTENT_TYPE), ("include", &include)];
        if let Some(id) = id {
            query.push(("sys.id", id));
        }

        tracing::debug!("GET {} (filter: {:?})", url, id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentfulError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Map a collection response to raw entries, resolving links first.
fn collection_to_entries(body: &JsonValue) -> Result<Vec<RawEntry>, ContentfulError> {
    let index = LinkIndex::from_response(body);

    let items = body
        .get("items")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| {
            ContentfulError::Decode("response has no 'items' collection".to_string())
        })?;

    items
        .iter()
        .map(|item| {
            let fields = item.get("fields").cloned().unwrap_or(JsonValue::Null);
            let resolved = index.resolve(fields, INCLUDE_DEPTH);
            Ok(serde_json::from_value(resolved)?)
        })
        .collect()
}

fn first_entry(body: &JsonValue, id: &str) -> Result<RawEntry, ContentfulError> {
    collection_to_entries(body)?
        .into_iter()
        .next()
        .ok_or_else(|| ContentfulError::NotFound { id: id.to_string() })
}

/// Index of link targets in a collection response.
///
/// Targets come from `includes.Entry`, `includes.Asset`, and the `items`
/// themselves (links may point at other matched entries).
struct LinkIndex<'a> {
    targets: HashMap<(&'a str, &'a str), &'a JsonValue>,
}

impl<'a> LinkIndex<'a> {
    fn from_response(body: &'a JsonValue) -> Self {
        let mut targets = HashMap::new();

        for kind in ["Entry", "Asset"] {
            let included = body
                .pointer(&format!("/includes/{}", kind))
                .and_then(JsonValue::as_array);
            for target in included.into_iter().flatten() {
                if let Some(id) = target.pointer("/sys/id").and_then(JsonValue::as_str) {
                    targets.insert((kind, id), target);
                }
            }
        }

        let items = body.get("items").and_then(JsonValue::as_array);
        for target in items.into_iter().flatten() {
            if let Some(id) = target.pointer("/sys/id").and_then(JsonValue::as_str) {
                targets.insert(("Entry", id), target);
            }
        }

        Self { targets }
    }

    /// Replace every link stub in `value` with `{fields: ...}` of its
    /// target, up to `depth` levels. Dangling links are left untouched and
    /// surface later as a shape error if the transform needs them.
    fn resolve(&self, value: JsonValue, depth: usize) -> JsonValue {
        if depth == 0 {
            return value;
        }

        match value {
            JsonValue::Object(map) => {
                if let Some((kind, id)) = link_target(&map) {
                    if let Some(target) = self.targets.get(&(kind.as_str(), id.as_str())) {
                        if let Some(fields) = target.get("fields") {
                            return serde_json::json!({
                                "fields": self.resolve(fields.clone(), depth - 1)
                            });
                        }
                    }
                    return JsonValue::Object(map);
                }

                JsonValue::Object(
                    map.into_iter()
                        .map(|(key, value)| (key, self.resolve(value, depth)))
                        .collect(),
                )
            }
            JsonValue::Array(values) => JsonValue::Array(
                values
                    .into_iter()
                    .map(|value| self.resolve(value, depth))
                    .collect(),
            ),
            other => other,
        }
    }
}

fn link_target(map: &serde_json::Map<String, JsonValue>) -> Option<(String, String)> {
    let sys = map.get("sys")?;
    if sys.get("type")?.as_str()? != "Link" {
        return None;
    }
    let kind = sys.get("linkType")?.as_str()?.to_string();
    let id = sys.get("id")?.as_str()?.to_string();
    Some((kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection_fixture() -> JsonValue {
        json!({
            "items": [
                {
                    "sys": { "id": "entry-1", "type": "Entry" },
                    "fields": {
                        "id": "MSG_1",
                        "order": 0,
                        "content": {
                            "sys": { "type": "Link", "linkType": "Entry", "id": "content-1" }
                        }
                    }
                }
            ],
            "includes": {
                "Entry": [
                    {
                        "sys": { "id": "content-1", "type": "Entry" },
                        "fields": {
                            "publish_date": "2020-11-06",
                            "title": "Title",
                            "body": "Body",
                            "icon_url": {
                                "sys": { "type": "Link", "linkType": "Asset", "id": "asset-1" }
                            },
                            "icon_alt": "alt",
                            "cta_type": "OPEN_URL",
                            "cta_where": "tab",
                            "link_text": "Learn more"
                        }
                    }
                ],
                "Asset": [
                    {
                        "sys": { "id": "asset-1", "type": "Asset" },
                        "fields": {
                            "file": {
                                "fileName": "lockwise-mobile.svg",
                                "contentType": "image/svg+xml"
                            }
                        }
                    }
                ]
            }
        })
    }

    #[test]
    fn test_collection_resolves_entry_and_asset_links() {
        let entries = collection_to_entries(&collection_fixture()).unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.id, "MSG_1");
        assert_eq!(entry.content.fields.title, "Title");
        assert_eq!(
            entry.content.fields.icon_url.as_ref().unwrap().fields.file.file_name,
            "lockwise-mobile.svg"
        );
    }

    #[test]
    fn test_dangling_link_fails_shaping() {
        let mut body = collection_fixture();
        body["includes"]["Entry"] = json!([]);

        // The content link cannot be resolved, so the item no longer
        // matches the entry shape.
        let result = collection_to_entries(&body);

        assert!(matches!(result, Err(ContentfulError::Decode(_))));
    }

    #[test]
    fn test_resolution_stops_at_include_depth() {
        let body = json!({
            "items": [{
                "sys": { "id": "a", "type": "Entry" },
                "fields": { "next": { "sys": { "type": "Link", "linkType": "Entry", "id": "a" } } }
            }]
        });
        let index = LinkIndex::from_response(&body);

        let resolved = index.resolve(body["items"][0]["fields"].clone(), INCLUDE_DEPTH);

        // A self-referencing link chain terminates instead of recursing
        // forever; the innermost stub stays a link.
        let innermost = resolved
            .pointer("/next/fields/next/fields/next/fields/next")
            .expect("three levels resolved");
        assert_eq!(innermost.pointer("/sys/type").and_then(JsonValue::as_str), Some("Link"));
    }

    #[test]
    fn test_first_entry_not_found() {
        let body = json!({ "items": [] });

        let result = first_entry(&body, "missing-id");

        assert!(matches!(result, Err(ContentfulError::NotFound { .. })));
    }
}
