mod graph;
mod load;
mod parse;

pub use graph::{KnowledgeGraph, MasteryLevel, TopicEdge, TopicNode};
pub use load::load_knowledge_graph;
