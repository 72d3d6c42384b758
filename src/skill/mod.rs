mod fallback;
mod model;

pub use fallback::fallback_graph;
pub use model::{Category, Difficulty, Edge, Graph, Node};
