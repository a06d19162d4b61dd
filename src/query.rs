//! Remote option lookup.
//!
//! A query substitutes the search text into a URL template, fetches the
//! body through a [`Transport`], extracts the record list and normalizes each
//! record into a [`SelectOption`]. Every failure ends up as an empty result:
//! the caller only ever sees options.

use std::sync::Arc;

use futures::future::BoxFuture;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::field::{lookup, scalar_text};
use crate::option::SelectOption;

/// Placeholder substituted with the encoded search text
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Characters left alone by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const VALUE_FIELDS: [&str; 2] = ["id", "value"];
const TEXT_FIELDS: [&str; 3] = ["name", "text", "label"];

/// Why a remote query produced no options
#[derive(Error, Debug)]
pub enum QueryError {
    /// The request could not be performed
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status
    #[error("server answered with status {0}")]
    Status(u16),
    /// The body was not valid JSON
    #[error("malformed response body: {0}")]
    Decode(String),
    /// The items path did not resolve
    #[error("items path `{0}` not found in response")]
    MissingPath(String),
    /// The resolved items were not a list
    #[error("response items are not a list")]
    NotAList,
}

/// Future returned by a transport
pub type FetchFuture = BoxFuture<'static, Result<Value, QueryError>>;

/// Performs a GET for a fully substituted URL and returns the parsed body
pub trait Transport: Send + Sync {
    /// Fetches `url`
    fn get(&self, url: &str) -> FetchFuture;
}

/// Where and how to look options up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// URL containing a `{query}` placeholder
    pub url_template: String,
    /// Dotted path to the record list inside the response body
    pub items_path: Option<String>,
}

impl RemoteConfig {
    /// Substitutes the encoded search text into the first placeholder
    pub fn url_for(&self, search: &str) -> String {
        let encoded = utf8_percent_encode(search, URI_COMPONENT).to_string();
        self.url_template.replacen(QUERY_PLACEHOLDER, &encoded, 1)
    }
}

/// Extracts the record list from a response body
pub fn extract_items(body: Value, items_path: Option<&str>) -> Result<Vec<Value>, QueryError> {
    let items = match items_path {
        None | Some("") => body,
        Some(path) => lookup(&body, path)
            .cloned()
            .ok_or_else(|| QueryError::MissingPath(path.to_string()))?,
    };
    match items {
        Value::Array(records) => Ok(records),
        _ => Err(QueryError::NotAList),
    }
}

fn truthy_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = record.get(*key)?;
        let truthy = match value {
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Array(_) | Value::Object(_) => false,
        };
        truthy.then(|| scalar_text(value)).flatten().map(|v| v.into_owned())
    })
}

/// Normalizes one remote record.
///
/// Primitives become their own value and label. Objects take their value
/// from `id` or `value` and their label from `name`, `text` or `label`,
/// first present wins. Records where either cannot be resolved are dropped.
pub fn normalize_record(record: Value) -> Option<SelectOption> {
    match &record {
        Value::String(_) | Value::Number(_) => {
            let text = scalar_text(&record)?.into_owned();
            Some(SelectOption::new(text.clone(), text).with_raw(record))
        }
        Value::Object(map) => {
            let value = truthy_field(map, &VALUE_FIELDS)?;
            let text = truthy_field(map, &TEXT_FIELDS)?;
            Some(SelectOption::new(value, text).with_raw(record))
        }
        _ => None,
    }
}

/// Runs remote queries for one control
#[derive(Clone)]
pub struct QueryEngine {
    config: RemoteConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine").field("config", &self.config).finish()
    }
}

impl QueryEngine {
    /// Creates an engine
    pub fn new(config: RemoteConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The remote configuration
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Looks options up for `search`.
    ///
    /// Empty search text yields no options without touching the network.
    /// Failures are logged and yield no options.
    pub async fn query(&self, search: &str) -> Vec<SelectOption> {
        if search.is_empty() {
            return Vec::new();
        }
        match self.try_query(search).await {
            Ok(options) => options,
            Err(e) => {
                error!("error fetching items for {search:?}: {e}");
                Vec::new()
            }
        }
    }

    /// Like [`QueryEngine::query`], but surfaces the failure
    pub async fn try_query(&self, search: &str) -> Result<Vec<SelectOption>, QueryError> {
        let url = self.config.url_for(search);
        debug!("fetching {url}");
        let body = self.transport.get(&url).await?;
        let records = extract_items(body, self.config.items_path.as_deref())?;
        let total = records.len();
        let options: Vec<SelectOption> = records.into_iter().filter_map(normalize_record).collect();
        if options.len() != total {
            debug!("dropped {} records that had no value or label", total - options.len());
        }
        Ok(options)
    }
}
