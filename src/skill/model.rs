use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Root,
    Tool,
    Infrastructure,
    Concept,
    Skill,
    #[default]
    Unknown,
}

impl Category {
    pub const LEGEND: [Category; 5] = [
        Self::Root,
        Self::Concept,
        Self::Skill,
        Self::Tool,
        Self::Infrastructure,
    ];

    /// Decodes a wire category. `CORE` is the historical name of the anchor
    /// category; anything unrecognised lands in [`Category::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ROOT" | "CORE" => Self::Root,
            "TOOL" => Self::Tool,
            "INFRASTRUCTURE" => Self::Infrastructure,
            "CONCEPT" => Self::Concept,
            "SKILL" => Self::Skill,
            _ => Self::Unknown,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Root => "CORE",
            Self::Tool => "TOOL",
            Self::Infrastructure => "INFRASTRUCTURE",
            Self::Concept => "CONCEPT",
            Self::Skill => "SKILL",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Root => "Core",
            Self::Tool => "AI Tool",
            Self::Infrastructure => "Infra",
            Self::Concept => "Concept",
            Self::Skill => "Skill",
            Self::Unknown => "Other",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Root => "☀",
            Self::Tool => "🛠",
            Self::Infrastructure => "🏗",
            Self::Concept => "🧠",
            Self::Skill => "⚡",
            Self::Unknown => "",
        }
    }

    /// Drawn radius in canvas units; collision adds its own padding on top.
    pub fn radius(self) -> f32 {
        match self {
            Self::Root => 35.0,
            Self::Concept => 25.0,
            Self::Infrastructure => 22.0,
            Self::Skill => 20.0,
            Self::Tool | Self::Unknown => 18.0,
        }
    }

    pub fn is_root(self) -> bool {
        self == Self::Root
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    Unknown,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Unknown => "Unrated",
        }
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        alias = "externalLink",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

impl Node {
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(alias = "sourceId")]
    pub source: String,
    #[serde(alias = "targetId")]
    pub target: String,
    #[serde(default)]
    pub relationship: String,
}

/// One generation result: replaced wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default, alias = "edges")]
    pub links: Vec<Edge>,
}

impl Graph {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("graph JSON does not match the nodes/links shape")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read graph file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to decode {}", path.display()))
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
