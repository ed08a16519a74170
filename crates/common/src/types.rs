//! Read-only views of FLAIR sourcing data
//!
//! These mirror the backend's `/api/item-sourcing` response. Parsing is
//! tolerant: missing or `null` fields fall back to defaults, unknown fields
//! are kept in `extra`, and list entries that are not valid records are
//! skipped rather than failing the whole page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A sourcing record: one supplier and its items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcingRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub supplier_name: String,

    #[serde(default, deserialize_with = "skip_invalid")]
    pub items: Vec<Item>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An item listed under a sourcing record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Envelope of a paged item-sourcing response. A `data` field that is not a
/// list is still an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcingPage {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub data: Vec<SourcingRecord>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A list (or `null`) whose entries are kept only when they parse as `T`
fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Skipping unreadable sourcing entry: {}", e);
                None
            }
        })
        .collect())
}

impl SourcingRecord {
    /// First item whose name matches exactly
    pub fn find_item(&self, item_name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.item_name == item_name)
    }
}
