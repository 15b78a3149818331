//! Injectable randomness and weighted choice

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in [0, 1)
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<ChaCha8Rng> {
    /// Reproducible source for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    position: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, position: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.position % self.draws.len()];
        self.position += 1;
        draw
    }
}

/// Pick an item with probability `weight / total` by cumulative sampling
///
/// Items whose weight is not a positive finite number are never picked.
/// Returns `None` when nothing is pickable.
pub fn select_weighted<'a, T, S>(
    items: &'a [T],
    weight: impl Fn(&T) -> f64,
    source: &mut S,
) -> Option<&'a T>
where
    S: RandomSource + ?Sized,
{
    let usable = |w: f64| w.is_finite() && w > 0.0;
    let total: f64 = items.iter().map(&weight).filter(|w| usable(*w)).sum();
    if total <= 0.0 {
        return None;
    }

    let draw = source.next_unit();
    let draw = if draw.is_finite() { draw.clamp(0.0, 1.0) } else { 0.0 };
    let target = draw * total;

    let mut cumulative = 0.0;
    let mut last_usable = None;
    for item in items {
        let w = weight(item);
        if !usable(w) {
            continue;
        }
        cumulative += w;
        last_usable = Some(item);
        if target < cumulative {
            return Some(item);
        }
    }
    // A draw of 1.0 or float drift past the total lands on the last item
    last_usable
}
