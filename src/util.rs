use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const LABEL_MAX_CHARS: usize = 15;

/// Shortens a node label to at most [`LABEL_MAX_CHARS`] characters plus an
/// ellipsis, splitting on character boundaries.
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() <= LABEL_MAX_CHARS {
        return name.to_owned();
    }
    let mut truncated = name.chars().take(LABEL_MAX_CHARS).collect::<String>();
    truncated.push('…');
    truncated
}

/// Deterministic pseudo-random fraction in [0, 1) derived from a seed and a
/// sample index. Hash-based so the layout engine needs no RNG dependency and
/// an injected seed reproduces placements exactly.
pub fn seeded_fraction(seed: u64, index: u64) -> f32 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    index.hash(&mut hasher);
    let hash = hasher.finish();

    ((hash & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32
}
