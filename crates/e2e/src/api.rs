//! Read-only sourcing verification client
//!
//! Lets a test confirm through the backend what it created through the UI.
//! The client never fails a test on its own: when the backend is not
//! configured, unreachable, slow, or answers with something unexpected, the
//! lookups return `None` and the checks return `false`.

use std::time::Duration;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use flair_common::config::join_url;
use flair_common::{ApiConfig, Item, SourcingPage, SourcingRecord};

pub const ITEM_SOURCING_PATH: &str = "/api/item-sourcing";
pub const DEFAULT_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone)]
pub struct SourcingApi {
    backend: Option<Backend>,
}

#[derive(Debug, Clone)]
struct Backend {
    base_url: String,
    client: reqwest::Client,
}

impl SourcingApi {
    pub fn new(config: &ApiConfig) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from);

        match base_url {
            Some(url) => Self::from_client(url, build_client(config)),
            None => Self::disabled(),
        }
    }

    /// A client with no backend; every lookup returns `None`
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    // Lookups require the timeout and default headers; no client, no backend
    fn from_client(base_url: String, client: reqwest::Result<reqwest::Client>) -> Self {
        match client {
            Ok(client) => Self {
                backend: Some(Backend { base_url, client }),
            },
            Err(e) => {
                warn!("Could not build the sourcing API client, verification disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_api_available(&self) -> bool {
        self.backend.is_some()
    }

    /// GET `path` with `query`; `None` on any failure
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Option<Value> {
        let backend = self.backend.as_ref()?;
        let url = join_url(&backend.base_url, path);

        let response = match backend.client.get(&url).query(query).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!("GET {} failed: {}", url, e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                debug!("GET {} returned error status: {}", url, e);
                return None;
            }
        };

        match response.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!("GET {} returned an unreadable body: {}", url, e);
                None
            }
        }
    }

    /// One page of sourcing records. An absent `data` field is an empty page.
    pub async fn list_sourcing_records(&self, page_size: u32, page: u32) -> Option<Vec<SourcingRecord>> {
        let body = self
            .get(
                ITEM_SOURCING_PATH,
                &[("pageSize", page_size.to_string()), ("page", page.to_string())],
            )
            .await?;

        match serde_json::from_value::<SourcingPage>(body) {
            Ok(page) => Some(page.data),
            Err(e) => {
                debug!("Unexpected item-sourcing response shape: {}", e);
                None
            }
        }
    }

    /// First record on the default page whose supplier name matches exactly
    pub async fn find_supplier_by_name(&self, name: &str) -> Option<SourcingRecord> {
        self.list_sourcing_records(DEFAULT_PAGE_SIZE, 1)
            .await?
            .into_iter()
            .find(|record| record.supplier_name == name)
    }

    pub fn find_item_in_record<'a>(&self, record: &'a SourcingRecord, item_name: &str) -> Option<&'a Item> {
        record.find_item(item_name)
    }

    pub async fn verify_supplier_exists(&self, name: &str) -> bool {
        self.find_supplier_by_name(name).await.is_some()
    }

    pub async fn verify_item_exists_under_supplier(&self, supplier: &str, item: &str) -> bool {
        match self.find_supplier_by_name(supplier).await {
            Some(record) => self.find_item_in_record(&record, item).is_some(),
            None => false,
        }
    }
}

fn build_client(config: &ApiConfig) -> reqwest::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = &config.token {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => debug!("API token is not a valid header value; sending no auth"),
        }
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}
