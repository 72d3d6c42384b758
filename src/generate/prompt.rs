use serde_json::{Value, json};

use crate::skill::Category;

/// Instructions sent for one topic. The tree uses a single root anchored at
/// the bottom and five levels above it.
pub fn build_prompt(topic: &str) -> String {
    let topic = topic.trim();
    format!(
        r#"CONTEXT: The user wants to explore "{topic}". It may be a career, a field of study,
a project idea or a technical interest.

TASK: Build a skill tree showing how AI tools and concepts apply to "{topic}".
Edges point from the prerequisite (lower) node to the node it unlocks (higher).

STRUCTURE (five levels, bottom to top):
0. Exactly one CORE node with id "root" labelled "Domain Knowledge", standing for {topic}.
1. INFRASTRUCTURE: "Automation" (e.g. n8n), "Containerization" (e.g. Docker) and
   "Version Control" (e.g. GitHub), each linked from the root.
2. SKILL: "Vibe Coding", linked from every level 1 node.
3. CONCEPT: "Cursor", "ChatGPT Codex", "Antigravity" and "Ollama", linked from Vibe Coding.
4. TOOL: "Google Gemini" (from Antigravity), "ChatGPT" (from ChatGPT Codex) and
   "Model Selection" (from Ollama).

CONTENT:
- Descriptions must be factually correct and written for a non-technical reader,
  using analogies instead of jargon.
- Every node needs a "link" to an official site or a high quality resource.
- Give each node two or three tags.

Return only a JSON object of the form
{{"nodes": [{{"id": "...", "label": "...", "category": "...", "description": "...",
"difficulty": "...", "tags": ["..."], "link": "https://..."}}],
"links": [{{"source": "id", "target": "id", "relationship": "..."}}]}}"#
    )
}

/// Structured output schema matching [`crate::skill::Graph`].
pub fn response_schema() -> Value {
    let categories = Category::LEGEND
        .iter()
        .map(|category| category.wire_name())
        .collect::<Vec<_>>();

    json!({
        "type": "OBJECT",
        "properties": {
            "nodes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "label": { "type": "STRING" },
                        "category": { "type": "STRING", "enum": categories },
                        "description": { "type": "STRING" },
                        "difficulty": {
                            "type": "STRING",
                            "enum": ["Beginner", "Intermediate", "Advanced"]
                        },
                        "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "link": { "type": "STRING" },
                        "resources": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["id", "label", "category", "description", "difficulty", "tags"]
                }
            },
            "links": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "source": {
                            "type": "STRING",
                            "description": "id of the prerequisite node"
                        },
                        "target": {
                            "type": "STRING",
                            "description": "id of the node it unlocks"
                        },
                        "relationship": { "type": "STRING" }
                    },
                    "required": ["source", "target", "relationship"]
                }
            }
        },
        "required": ["nodes", "links"]
    })
}

pub fn request_body(topic: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(topic) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}
