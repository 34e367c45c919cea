// GitHub API response types.
// Every field is optional: a missing or mistyped key falls back to its own
// default without discarding the other fields.

use base64::{Engine, engine::general_purpose::STANDARD};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

/// GitHub repository, as returned by `/repos/{owner}/{repo}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepoInfo {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub stargazers_count: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub subscribers_count: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub forks_count: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub open_issues_count: Option<u64>,
}

/// GitHub release.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Release {
    #[serde(deserialize_with = "lenient")]
    pub tag_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
}

/// File payload from the contents and readme endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentFile {
    #[serde(deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub encoding: Option<String>,
}

impl ContentFile {
    /// Decode the base64 payload to text.
    ///
    /// GitHub wraps the payload at 60 columns, so whitespace is dropped first.
    /// A missing or undecodable payload yields an empty string.
    pub fn decode(&self) -> String {
        let Some(content) = self.content.as_deref() else {
            return String::new();
        };

        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        match STANDARD.decode(compact.as_bytes()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(error = %e, "Failed to decode base64 content");
                String::new()
            }
        }
    }
}

/// Package manifest (composer.json layout).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub package_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub license: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub require: Option<IndexMap<String, Value>>,
    #[serde(rename = "require-dev", deserialize_with = "lenient")]
    pub require_dev: Option<IndexMap<String, Value>>,
}

/// Deserialize one field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode an API value into `T`, falling back to `T::default()` on mismatch.
pub fn decode_lenient<T: DeserializeOwned + Default>(value: Value, endpoint: &str) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(endpoint, error = %e, "Unexpected response shape, using defaults");
        T::default()
    })
}

/// Render a JSON value as plain text: strings unquoted, null empty, others compact.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
