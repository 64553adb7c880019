use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::graph::KnowledgeGraph;
use super::parse::parse_knowledge_graph;

/// Reads and validates a provider dataset from disk. The engine itself does
/// no network I/O; whatever produced the file is out of scope.
pub fn load_knowledge_graph(path: &Path) -> Result<KnowledgeGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph dataset {}", path.display()))?;

    let graph = parse_knowledge_graph(&raw)
        .with_context(|| format!("failed to parse graph dataset {}", path.display()))?;

    log::info!(
        "loaded knowledge graph: {} topics, {} connections, {} categories",
        graph.node_count(),
        graph.edge_count(),
        graph.categories.len()
    );

    Ok(graph)
}
