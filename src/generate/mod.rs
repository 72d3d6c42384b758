//! Boundary to the generative service that turns a topic into a skill tree.
//! The layout core never sees any of this; it only receives finished graphs.

mod client;
mod prompt;
mod response;
mod transport;

pub use client::{API_BASE, ClientSetup, DEFAULT_MODEL, GeminiClient, KEY_VARIABLES};
pub use prompt::{build_prompt, request_body, response_schema};
pub use response::{candidate_text, decode_graph, strip_code_fence};
pub use transport::{CurlTransport, Transport};
