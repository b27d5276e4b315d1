pub mod svd;

use num::Float;

/// dot積
/// d(a, b) = Σ(a_i * b_i)
#[inline]
pub fn dot<F>(vec: impl Iterator<Item = F>, other: impl Iterator<Item = F>) -> F
where
    F: Float,
{
    vec.zip(other).fold(F::zero(), |acc, (a, b)| acc + a * b)
}

/// L2ノルム
/// ||a|| = sqrt(Σ(a_i^2))
#[inline]
pub fn norm<F>(vec: impl Iterator<Item = F>) -> F
where
    F: Float,
{
    vec.fold(F::zero(), |acc, a| acc + a * a).sqrt()
}

/// コサイン類似度
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// A zero-norm side has no direction, so the score is 0.
/// Non-finite results are also mapped to 0 so nothing NaN leaks out.
#[inline]
pub fn cosine_similarity<F>(vec: impl Iterator<Item = F>, other: impl Iterator<Item = F>) -> F
where
    F: Float,
{
    let mut dot = F::zero();
    let mut norm_a = F::zero();
    let mut norm_b = F::zero();
    for (a, b) in vec.zip(other) {
        dot = dot + a * b;
        norm_a = norm_a + a * a;
        norm_b = norm_b + b * b;
    }
    if norm_a == F::zero() || norm_b == F::zero() {
        return F::zero();
    }
    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_finite() { score } else { F::zero() }
}

/// Round to `places` decimals, ties to even on the scaled value
/// 0.005 at 2 places scales to exactly 0.5 and rounds to 0.0.
#[inline]
pub fn round_to<F>(value: F, places: u32) -> F
where
    F: Float,
{
    let scale = F::from(10u64.pow(places.min(18))).unwrap_or_else(F::one);
    round_ties_even(value * scale) / scale
}

#[inline]
fn round_ties_even<F>(x: F) -> F
where
    F: Float,
{
    let floor = x.floor();
    let half = F::from(0.5).unwrap_or_else(F::zero);
    let diff = x - floor;
    if diff > half {
        floor + F::one()
    } else if diff < half {
        floor
    } else if (floor / (F::one() + F::one())).fract() == F::zero() {
        floor
    } else {
        floor + F::one()
    }
}
