use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::LayoutConfig;

/// Pairwise repulsion, limited to pairs closer than three minimum
/// separations. Coincident nodes are treated as distance 1 apart and pushed
/// along a deterministic direction so they cannot pin each other in place.
pub(super) fn apply_repulsion(
    positions: &[Vec2],
    velocities: &mut [Vec2],
    alpha: f32,
    config: &LayoutConfig,
) {
    let cutoff = config.min_separation * 3.0;
    let cutoff_sq = cutoff * cutoff;

    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[i] - positions[j];
            let mut distance_sq = delta.length_sq();
            if distance_sq >= cutoff_sq {
                continue;
            }

            let direction = if distance_sq <= f32::EPSILON {
                distance_sq = 1.0;
                let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * TAU;
                vec2(angle.cos(), angle.sin())
            } else {
                delta / distance_sq.sqrt()
            };

            let push = config.repulsion * alpha / distance_sq;
            velocities[i] += direction * push;
            velocities[j] -= direction * push;
        }
    }
}

/// Spring attraction along each edge, proportional to the displacement
/// between the endpoints and the edge strength.
pub(super) fn apply_attraction(
    edges: &[(usize, usize, f32)],
    positions: &[Vec2],
    velocities: &mut [Vec2],
    alpha: f32,
    config: &LayoutConfig,
) {
    for &(source, target, strength) in edges {
        let displacement = positions[target] - positions[source];
        let pull = displacement * (strength * config.attraction * alpha);
        velocities[source] += pull;
        velocities[target] -= pull;
    }
}

/// Weak pull toward the surface center so disconnected components do not
/// drift into the margins.
pub(super) fn apply_gravity(
    center: Vec2,
    positions: &[Vec2],
    velocities: &mut [Vec2],
    alpha: f32,
    config: &LayoutConfig,
) {
    let scale = config.gravity * alpha;
    for (position, velocity) in positions.iter().zip(velocities.iter_mut()) {
        *velocity += (center - *position) * scale;
    }
}

/// Damps velocities, advances positions, and clamps them into the padding
/// margin. Non-finite coordinates (runaway forces) reset to the center.
pub(super) fn integrate(
    positions: &mut [Vec2],
    velocities: &mut [Vec2],
    config: &LayoutConfig,
    width: f32,
    height: f32,
) {
    let max_x = (width - config.padding).max(config.padding);
    let max_y = (height - config.padding).max(config.padding);

    for (position, velocity) in positions.iter_mut().zip(velocities.iter_mut()) {
        *velocity *= config.damping;
        *position += *velocity;

        if !position.x.is_finite() {
            position.x = width * 0.5;
            velocity.x = 0.0;
        }
        if !position.y.is_finite() {
            position.y = height * 0.5;
            velocity.y = 0.0;
        }

        position.x = position.x.clamp(config.padding, max_x);
        position.y = position.y.clamp(config.padding, max_y);
    }
}
