use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::data::KnowledgeGraph;
use crate::layout::{LayoutEdge, LayoutNode, LayoutRequest};
use crate::util::truncate_label;

use super::super::style::{mastery_color, mastery_radius};
use super::super::{SceneEdge, SceneGraph, SceneNode, ViewModel};

impl SceneGraph {
    /// Derives the render state from a dataset. Node order matches the
    /// dataset's node order, so indices are valid into both.
    pub(in crate::app) fn build(graph: &KnowledgeGraph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|topic| SceneNode {
                id: topic.id.clone(),
                display_name: topic.display_name.clone(),
                label: truncate_label(&topic.display_name),
                category: topic.category.clone(),
                radius: mastery_radius(topic.mastery),
                fill: mastery_color(topic.mastery),
            })
            .collect::<Vec<_>>();

        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        // Dangling or self references are already dropped at parse time;
        // skipping them again keeps the scene safe for any dataset.
        let edges = graph
            .connections
            .iter()
            .filter_map(|connection| {
                let source = *index_by_id.get(connection.source.as_str())?;
                let target = *index_by_id.get(connection.target.as_str())?;
                if source == target {
                    return None;
                }
                Some(SceneEdge {
                    source,
                    target,
                    strength: connection.strength,
                })
            })
            .collect();

        Self {
            nodes,
            edges,
            index_by_id,
            positions: None,
        }
    }

    /// Installs a freshly computed position map, replacing any previous one
    /// wholesale.
    pub(in crate::app) fn apply_positions(&mut self, map: &HashMap<String, Vec2>) {
        let positions = self
            .nodes
            .iter()
            .map(|node| map.get(&node.id).copied().unwrap_or(Vec2::ZERO))
            .collect();
        self.positions = Some(positions);
    }

    pub(in crate::app) fn node_visible(&self, index: usize, filter: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(category) => self.nodes[index].category.as_deref() == Some(category),
        }
    }

    /// An edge is shown only when both endpoints survive the category filter.
    pub(in crate::app) fn edge_visible(&self, edge: &SceneEdge, filter: Option<&str>) -> bool {
        self.node_visible(edge.source, filter) && self.node_visible(edge.target, filter)
    }

    pub(in crate::app) fn neighbors(&self, index: usize) -> Vec<usize> {
        let mut neighbors = Vec::new();
        for edge in &self.edges {
            if edge.source == index {
                neighbors.push(edge.target);
            } else if edge.target == index {
                neighbors.push(edge.source);
            }
        }
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }
}

impl ViewModel {
    pub(in crate::app) fn layout_request(&self, surface: Vec2) -> LayoutRequest {
        LayoutRequest {
            nodes: self
                .graph
                .nodes
                .iter()
                .map(|topic| LayoutNode {
                    id: topic.id.clone(),
                    category: topic.category.clone(),
                })
                .collect(),
            edges: self
                .graph
                .connections
                .iter()
                .map(|connection| LayoutEdge {
                    source: connection.source.clone(),
                    target: connection.target.clone(),
                    strength: connection.strength,
                })
                .collect(),
            width: surface.x,
            height: surface.y,
        }
    }
}
