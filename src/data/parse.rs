use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::graph::{KnowledgeGraph, MasteryLevel, TopicEdge, TopicNode};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawPayload {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    connections: Vec<RawConnection>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    total_topics: Option<usize>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: String,
    display_name: String,
    #[serde(default)]
    category: Option<String>,
    mastery_level: MasteryLevel,
    #[serde(default)]
    review_count: u32,
    #[serde(default)]
    origin_session_title: String,
}

#[derive(Clone, Debug, Deserialize)]
struct RawConnection {
    source: String,
    target: String,
    #[serde(default = "default_strength")]
    strength: f32,
}

fn default_strength() -> f32 {
    1.0
}

/// Turns the provider payload into a clean dataset: duplicate node ids keep
/// the first occurrence, connections with a missing endpoint or identical
/// endpoints are dropped, and the category list is completed from the nodes.
pub(super) fn parse_knowledge_graph(raw: &str) -> Result<KnowledgeGraph> {
    let payload: RawPayload =
        serde_json::from_str(raw).context("invalid JSON from graph data provider")?;

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(payload.nodes.len());
    for raw_node in payload.nodes {
        if raw_node.id.is_empty() {
            return Err(anyhow!("graph node with empty id"));
        }
        if !seen.insert(raw_node.id.clone()) {
            continue;
        }
        nodes.push(TopicNode {
            id: raw_node.id,
            display_name: raw_node.display_name,
            category: raw_node.category.filter(|category| !category.is_empty()),
            mastery: raw_node.mastery_level,
            review_count: raw_node.review_count,
            origin_session_title: raw_node.origin_session_title,
        });
    }

    let known_ids = nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
    let connections = payload
        .connections
        .into_iter()
        .filter(|connection| {
            connection.source != connection.target
                && known_ids.contains(connection.source.as_str())
                && known_ids.contains(connection.target.as_str())
        })
        .map(|connection| TopicEdge {
            source: connection.source,
            target: connection.target,
            strength: connection.strength,
        })
        .collect::<Vec<_>>();

    let mut categories = payload.categories;
    for node in &nodes {
        if let Some(category) = &node.category
            && !categories.contains(category)
        {
            categories.push(category.clone());
        }
    }

    let total_topics = payload.total_topics.unwrap_or(nodes.len());

    Ok(KnowledgeGraph {
        nodes,
        connections,
        categories,
        total_topics,
    })
}
