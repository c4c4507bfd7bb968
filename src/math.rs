//! Small numeric and random helpers shared by the rest of the core.

use rand::seq::SliceRandom;
use rand::Rng;

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Unit vector from `(x1, y1)` towards `(x2, y2)`.
///
/// Coincident points yield `(0.0, 0.0)` instead of NaN.
pub fn direction(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32) {
    let dist = distance(x1, y1, x2, y2);
    if dist == 0.0 || !dist.is_finite() {
        return (0.0, 0.0);
    }
    ((x2 - x1) / dist, (y2 - y1) / dist)
}

/// Uniform float in `[min, max)`; degenerate ranges return `min`.
pub fn random_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Uniform integer in `[min, max]`.
pub fn random_int(rng: &mut impl Rng, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// `true` with the given probability; values outside `[0, 1]` are clamped.
pub fn random_bool(rng: &mut impl Rng, probability: f64) -> bool {
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

/// Uniformly chosen element, or `None` for an empty slice.
pub fn random_pick<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}
