use serde::{Deserialize, Deserializer, Serialize};

pub mod top_k;
pub mod upload;

pub use top_k::TopK;
pub use upload::{SelectedFile, SelectedFileSummary, UploadRequest};

/// A single recommended title as returned by the recommendation service
///
/// The service fills `genre` and `director` with an empty string when its catalog
/// has no value; `null` or a missing key is read the same way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationItem {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub director: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body returned by the recommendation service on a non-2xx status
///
/// `detail` is usually a string. Request validation failures carry a list of
/// `{ "loc": [...], "msg": "...", "type": "..." }` objects instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ServiceErrorBody {
    /// Extracts a displayable message, if the body carries one
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(entries) => {
                let msgs: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(|m| m.as_str()))
                    .collect();

                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}
