use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::util::seeded_fraction;

mod forces;

use forces::{apply_attraction, apply_gravity, apply_repulsion, integrate};

/// Fraction of the shorter surface edge used for the initial placement ring
/// and for the small-graph fallback circle.
const RING_RADIUS_FRACTION: f32 = 0.35;
const PROGRESS_STRIDE: usize = 20;

#[derive(Clone, Debug)]
pub struct LayoutNode {
    pub id: String,
    pub category: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LayoutEdge {
    pub source: String,
    pub target: String,
    pub strength: f32,
}

/// One layout computation over a fixed dataset and surface size. Positions
/// for a new dataset or surface are always a fresh request, never an update.
#[derive(Clone, Debug)]
pub struct LayoutRequest {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub width: f32,
    pub height: f32,
}

/// Tunable layout constants. The threshold and iteration bounds are
/// empirical; they are configuration rather than invariants.
#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    pub small_graph_threshold: usize,
    pub base_iterations: usize,
    pub max_iterations: usize,
    pub padding: f32,
    pub min_separation: f32,
    pub repulsion: f32,
    pub attraction: f32,
    pub gravity: f32,
    pub damping: f32,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            small_graph_threshold: 50,
            base_iterations: 50,
            max_iterations: 150,
            padding: 40.0,
            min_separation: 60.0,
            repulsion: 6_000.0,
            attraction: 0.02,
            gravity: 0.01,
            damping: 0.9,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    pub fn iteration_count(&self, node_count: usize) -> usize {
        (self.base_iterations + node_count).min(self.max_iterations)
    }
}

/// Computes a 2D arrangement for the requested graph. Pure apart from the
/// progress callback: same request and config (including seed) always yield
/// the same positions.
///
/// `on_progress` receives percentages in [0, 100], non-decreasing, with a
/// final 100 on completion; returning `false` abandons the simulation early
/// (the partial result is still returned and simply discarded by a caller
/// that cancelled).
pub fn compute_layout(
    request: &LayoutRequest,
    config: &LayoutConfig,
    mut on_progress: impl FnMut(f32) -> bool,
) -> HashMap<String, Vec2> {
    let node_count = request.nodes.len();
    if node_count == 0 {
        on_progress(100.0);
        return HashMap::new();
    }

    let center = vec2(request.width * 0.5, request.height * 0.5);

    if node_count < config.small_graph_threshold {
        let positions = circle_positions(request, center);
        on_progress(100.0);
        return collect_positions(request, positions);
    }

    let mut positions = initial_placement(request, config, center);
    let mut velocities = vec![Vec2::ZERO; node_count];
    let edges = resolve_edges(request);
    let iterations = config.iteration_count(node_count);

    for round in 0..iterations {
        let alpha = 1.0 - round as f32 / iterations as f32;

        apply_repulsion(&positions, &mut velocities, alpha, config);
        apply_attraction(&edges, &positions, &mut velocities, alpha, config);
        apply_gravity(center, &positions, &mut velocities, alpha, config);
        integrate(
            &mut positions,
            &mut velocities,
            config,
            request.width,
            request.height,
        );

        if round % PROGRESS_STRIDE == 0
            && !on_progress(round as f32 / iterations as f32 * 100.0)
        {
            break;
        }
    }

    on_progress(100.0);
    collect_positions(request, positions)
}

/// Small graphs skip the simulation: nodes go on a fixed-radius circle at
/// angle `2π·i/n`, trading category grouping for determinism and speed.
fn circle_positions(request: &LayoutRequest, center: Vec2) -> Vec<Vec2> {
    let radius = RING_RADIUS_FRACTION * request.width.min(request.height);
    let node_count = request.nodes.len() as f32;

    (0..request.nodes.len())
        .map(|index| {
            let angle = TAU * index as f32 / node_count;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Buckets nodes by category and hands each bucket an angular arc
/// proportional to its share of nodes, then spreads the bucket across its
/// arc with a seeded radial jitter in [0.6, 1.0] of the ring radius.
fn initial_placement(request: &LayoutRequest, config: &LayoutConfig, center: Vec2) -> Vec<Vec2> {
    let ring_radius = RING_RADIUS_FRACTION * request.width.min(request.height);
    let node_count = request.nodes.len() as f32;

    let mut buckets: Vec<(Option<&str>, Vec<usize>)> = Vec::new();
    for (index, node) in request.nodes.iter().enumerate() {
        let key = node.category.as_deref();
        if let Some((_, bucket)) = buckets.iter_mut().find(|(bucket_key, _)| *bucket_key == key) {
            bucket.push(index);
        } else {
            buckets.push((key, vec![index]));
        }
    }

    let mut positions = vec![Vec2::ZERO; request.nodes.len()];
    let mut arc_start = 0.0_f32;
    for (_, bucket) in &buckets {
        let arc_span = TAU * bucket.len() as f32 / node_count;
        for (slot, &index) in bucket.iter().enumerate() {
            let angle = arc_start + arc_span * (slot as f32 + 0.5) / bucket.len() as f32;
            let radial = 0.6 + 0.4 * seeded_fraction(config.seed, index as u64);
            positions[index] = center + vec2(angle.cos(), angle.sin()) * (ring_radius * radial);
        }
        arc_start += arc_span;
    }

    positions
}

/// Resolves edge endpoints to node indices, dropping self-edges and
/// references to nodes that are not part of the request.
fn resolve_edges(request: &LayoutRequest) -> Vec<(usize, usize, f32)> {
    let index_by_id = request
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect::<HashMap<_, _>>();

    request
        .edges
        .iter()
        .filter_map(|edge| {
            let source = *index_by_id.get(edge.source.as_str())?;
            let target = *index_by_id.get(edge.target.as_str())?;
            if source == target {
                return None;
            }
            Some((source, target, edge.strength))
        })
        .collect()
}

fn collect_positions(request: &LayoutRequest, positions: Vec<Vec2>) -> HashMap<String, Vec2> {
    request
        .nodes
        .iter()
        .zip(positions)
        .map(|(node, position)| (node.id.clone(), position))
        .collect()
}
