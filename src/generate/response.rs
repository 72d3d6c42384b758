use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::skill::Graph;

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

/// Text of the first candidate, its parts joined in order.
pub fn candidate_text(raw: &str) -> Result<String> {
    let envelope: Envelope =
        serde_json::from_str(raw).context("generation response was not valid JSON")?;

    if let Some(error) = envelope.error {
        let code = error
            .code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "?".to_owned());
        bail!("generation service returned error {code}: {}", error.message);
    }
    if let Some(reason) = envelope
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        bail!("prompt was blocked: {reason}");
    }

    let candidate = envelope
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("generation response contained no candidates"))?;
    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        bail!("generation returned no text (finish reason: {reason})");
    }
    Ok(text)
}

/// Drops a surrounding Markdown code fence, with or without a language tag.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Decodes a full service response into a graph with at least one node.
pub fn decode_graph(raw: &str) -> Result<Graph> {
    let text = candidate_text(raw)?;
    let graph = Graph::from_json(strip_code_fence(&text))
        .context("generated text was not a skill tree")?;
    if graph.is_empty() {
        bail!("generated skill tree has no nodes");
    }
    Ok(graph)
}
