use anyhow::{Context, Result};
use log::{info, warn};

use super::prompt::request_body;
use super::response::decode_graph;
use super::transport::{CurlTransport, Transport};
use crate::skill::Graph;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Checked in order; the first non-blank value wins.
pub const KEY_VARIABLES: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Caller-owned handle to the generation service.
#[derive(Clone, Debug)]
pub struct GeminiClient<T = CurlTransport> {
    api_key: String,
    model: String,
    base_url: String,
    transport: T,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_transport(api_key, model, CurlTransport::default())
    }
}

impl<T: Transport> GeminiClient<T> {
    pub fn with_transport(
        api_key: impl Into<String>,
        model: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE.to_owned(),
            transport,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Blocks until the service answers with a decodable skill tree.
    pub fn generate(&self, topic: &str) -> Result<Graph> {
        let body = serde_json::to_string(&request_body(topic))
            .context("failed to encode generation request")?;
        info!("requesting skill tree for {topic:?} from {}", self.model);

        let raw = self
            .transport
            .post_json(&self.endpoint(), &self.api_key, &body)
            .with_context(|| format!("generation request for {topic:?} failed"))?;
        let graph = decode_graph(&raw)
            .with_context(|| format!("could not use the response for {topic:?}"))?;

        info!(
            "received skill tree: {} nodes, {} links",
            graph.nodes.len(),
            graph.links.len()
        );
        Ok(graph)
    }
}

/// Outcome of looking for credentials. Missing credentials are a normal
/// state: callers fall back to the bundled tree.
#[derive(Clone, Debug)]
pub enum ClientSetup {
    Ready(GeminiClient),
    MissingCredentials,
}

impl ClientSetup {
    pub fn from_key(api_key: Option<String>, model: &str) -> Self {
        match api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => Self::Ready(GeminiClient::new(key.trim(), model)),
            None => Self::MissingCredentials,
        }
    }

    pub fn from_env(model: &str) -> Self {
        let key = KEY_VARIABLES
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());
        let setup = Self::from_key(key, model);
        if matches!(setup, Self::MissingCredentials) {
            warn!(
                "no API key in {}; using the bundled skill tree",
                KEY_VARIABLES.join(" or ")
            );
        }
        setup
    }

    pub fn client(&self) -> Option<&GeminiClient> {
        match self {
            Self::Ready(client) => Some(client),
            Self::MissingCredentials => None,
        }
    }
}
