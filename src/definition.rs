//! Best-effort dictionary lookups.
//!
//! Lookups run off the event loop. Each request is tagged with the word
//! generation it was issued for, and the result comes back as an
//! [`AppEvent::Definition`] so the controller can drop stale answers.

use crate::error::DefinitionError;
use crate::runtime::AppEvent;
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// A lookup issued for the word shown at `generation`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRequest {
    pub generation: u64,
    pub language: String,
    /// Which load of the word list `index` refers to
    pub load_epoch: u64,
    pub session_id: u64,
    pub index: usize,
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionResponse {
    pub request: DefinitionRequest,
    pub result: Result<String, DefinitionError>,
}

/// Resolves a single word to a definition
pub trait DefinitionLookup: Send + Sync + 'static {
    fn lookup(&self, word: &str) -> Result<String, DefinitionError>;
}

/// Runs lookups without blocking the caller
pub trait DefinitionDispatcher {
    fn dispatch(&self, request: DefinitionRequest);
}

/// Pull `[0].meanings[0].definitions[0].definition` out of a dictionary response
pub fn extract_definition(data: &Value) -> Option<String> {
    data.get(0)?
        .get("meanings")?
        .get(0)?
        .get("definitions")?
        .get(0)?
        .get("definition")?
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Free Dictionary style HTTP lookup: `GET {endpoint}/{word}`
#[derive(Debug, Clone)]
pub struct HttpDefinitionLookup {
    client: Client,
    endpoint: Url,
}

impl HttpDefinitionLookup {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, DefinitionError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| DefinitionError::Unavailable(format!("bad endpoint '{endpoint}': {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(DefinitionError::Unavailable(format!(
                "endpoint '{endpoint}' cannot take a path"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DefinitionError::Unavailable(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    fn url_for(&self, word: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }
}

impl DefinitionLookup for HttpDefinitionLookup {
    fn lookup(&self, word: &str) -> Result<String, DefinitionError> {
        let url = self.url_for(word);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DefinitionError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DefinitionError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let data: Value = response
            .json()
            .map_err(|e| DefinitionError::Unavailable(format!("bad body: {e}")))?;

        extract_definition(&data)
            .ok_or_else(|| DefinitionError::Unavailable("no definition in response".to_string()))
    }
}

/// Runs each lookup on its own thread and posts the answer to the event loop
pub struct ThreadDispatcher<L: DefinitionLookup> {
    lookup: Arc<L>,
    tx: Sender<AppEvent>,
}

impl<L: DefinitionLookup> ThreadDispatcher<L> {
    pub fn new(lookup: L, tx: Sender<AppEvent>) -> Self {
        Self {
            lookup: Arc::new(lookup),
            tx,
        }
    }
}

impl<L: DefinitionLookup> DefinitionDispatcher for ThreadDispatcher<L> {
    fn dispatch(&self, request: DefinitionRequest) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();

        std::thread::spawn(move || {
            let result = lookup.lookup(&request.word);
            if let Err(ref err) = result {
                tracing::debug!(word = %request.word, error = %err, "definition lookup failed");
            }
            // receiver gone means the app is shutting down
            let _ = tx.send(AppEvent::Definition(DefinitionResponse { request, result }));
        });
    }
}
