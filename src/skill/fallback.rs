use super::model::{Category, Difficulty, Edge, Graph, Node};

fn node(
    id: &str,
    label: &str,
    category: Category,
    difficulty: Difficulty,
    tags: &[&str],
    link: &str,
    description: &str,
) -> Node {
    Node {
        id: id.to_owned(),
        label: label.to_owned(),
        category,
        description: description.to_owned(),
        difficulty,
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        link: Some(link.to_owned()),
        resources: Vec::new(),
    }
}

fn edge(source: &str, target: &str, relationship: &str) -> Edge {
    Edge {
        source: source.to_owned(),
        target: target.to_owned(),
        relationship: relationship.to_owned(),
    }
}

/// Bundled single-root tree shown at startup and whenever generation is
/// unavailable.
pub fn fallback_graph() -> Graph {
    use Category::{Concept, Infrastructure, Root, Skill, Tool};
    use Difficulty::{Advanced, Beginner, Intermediate};

    let nodes = vec![
        node(
            "root",
            "Domain Knowledge",
            Root,
            Advanced,
            &["Foundation", "Domain"],
            "https://en.wikipedia.org/wiki/Domain_knowledge",
            "Your own field of expertise, whether nursing, law, biology or engineering. \
             AI tools only become useful when they are steered by a deep understanding \
             of the subject they are applied to.",
        ),
        node(
            "inf1",
            "Automation",
            Infrastructure,
            Intermediate,
            &["Automation", "Workflow"],
            "https://n8n.io/",
            "Workflow tools such as n8n connect apps like mail, chat and spreadsheets so \
             data moves between them without hand-written glue code.",
        ),
        node(
            "inf2",
            "Containerization",
            Infrastructure,
            Intermediate,
            &["DevOps", "Containers"],
            "https://www.docker.com/",
            "Docker packages an application with everything it needs, so it behaves the \
             same on a laptop and on a cloud server.",
        ),
        node(
            "inf3",
            "Version Control",
            Infrastructure,
            Beginner,
            &["Collaboration", "Git"],
            "https://github.com/",
            "Git hosting such as GitHub keeps every revision of a project and lets a team \
             work on the same code without overwriting each other.",
        ),
        node(
            "sk1",
            "Vibe Coding",
            Skill,
            Intermediate,
            &["Coding", "Flow"],
            "https://twitter.com/karpathy/status/1754213778556539356",
            "Building software by directing intent and outcome while an AI assistant \
             handles most of the syntax.",
        ),
        node(
            "t2",
            "Cursor",
            Concept,
            Intermediate,
            &["Editor", "AI"],
            "https://cursor.sh/",
            "A code editor with an assistant built into its core: it predicts edits, \
             explains bugs and drafts whole functions.",
        ),
        node(
            "t3",
            "ChatGPT Codex",
            Concept,
            Advanced,
            &["Code Generation", "Model"],
            "https://openai.com/blog/openai-codex",
            "A language model trained on large amounts of source code that turns plain \
             instructions into working programs.",
        ),
        node(
            "con1",
            "Antigravity",
            Concept,
            Advanced,
            &["UI/UX", "Experimental"],
            "https://www.antigravity.com/",
            "An experimental design approach for interfaces that feel weightless, driven \
             by physics-based motion and direct interaction.",
        ),
        node(
            "t4",
            "Ollama",
            Concept,
            Intermediate,
            &["Local AI", "Privacy"],
            "https://ollama.com/",
            "Runs language models on your own machine, keeping data private and working \
             offline.",
        ),
        node(
            "adv1",
            "Google Gemini",
            Tool,
            Advanced,
            &["Multimodal", "Reasoning"],
            "https://deepmind.google/technologies/gemini/",
            "A multimodal model family that reasons across text, images, audio and video.",
        ),
        node(
            "adv2",
            "ChatGPT",
            Tool,
            Beginner,
            &["Chat", "Assistant"],
            "https://chat.openai.com/",
            "A conversational assistant for drafting, coding, learning and brainstorming.",
        ),
        node(
            "sk2",
            "Model Selection",
            Tool,
            Advanced,
            &["Strategy", "Optimization"],
            "https://huggingface.co/models",
            "Knowing which model fits which job, trading off cost, speed and capability.",
        ),
    ];

    let links = vec![
        edge("root", "inf1", "automates"),
        edge("root", "inf2", "runs on"),
        edge("root", "inf3", "stored in"),
        edge("inf1", "sk1", "enables"),
        edge("inf2", "sk1", "supports"),
        edge("inf3", "sk1", "facilitates"),
        edge("sk1", "t2", "uses"),
        edge("sk1", "t3", "powered by"),
        edge("sk1", "con1", "explores"),
        edge("sk1", "t4", "deploys"),
        edge("con1", "adv1", "visualizes"),
        edge("t3", "adv2", "powers"),
        edge("t4", "sk2", "requires"),
        edge("t2", "adv2", "integrates"),
    ];

    Graph { nodes, links }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fallback_is_a_single_root_tree_with_resolvable_edges() {
        let graph = fallback_graph();
        let ids = graph
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();

        assert_eq!(ids.len(), graph.nodes.len());
        assert_eq!(
            graph
                .nodes
                .iter()
                .filter(|node| node.category.is_root())
                .count(),
            1
        );
        for link in &graph.links {
            assert!(ids.contains(link.source.as_str()), "{}", link.source);
            assert!(ids.contains(link.target.as_str()), "{}", link.target);
        }
    }
}
