//! Numeric primitives shared by every downstream component: clamping,
//! interpolation, and RNG sampling helpers.
//!
//! Every sampling helper takes `&mut impl Rng` explicitly rather than
//! reaching for a hidden global generator. Callers at the edges of the
//! engine (CLI, season driver) own a `rand_chacha::ChaCha8Rng` seeded from a
//! `u64`, chosen over `rand::rngs::StdRng` because ChaCha8's output stream is
//! documented stable across `rand` releases.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Clamp `x` into `[lo, hi]`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Linear interpolation between `a` and `b` at `t`. `t` is not clamped here;
/// callers that need clamped interpolation should clamp `t` first.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Piecewise-linear interpolation over a sorted list of `(x, y)` nodes.
/// Clamps to the first/last node's `y` outside the node range.
pub fn interp(curve: &[(f64, f64)], x: f64) -> f64 {
    if curve.is_empty() {
        return 0.0;
    }
    if x <= curve[0].0 {
        return curve[0].1;
    }
    if x >= curve[curve.len() - 1].0 {
        return curve[curve.len() - 1].1;
    }
    for w in curve.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if x >= x0 && x <= x1 {
            let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
            return lerp(y0, y1, t);
        }
    }
    curve[curve.len() - 1].1
}

/// Standard normal deviate scaled to `N(mu, sigma^2)`.
pub fn gauss(rng: &mut impl Rng, mu: f64, sigma: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    mu + z * sigma
}

/// Sum of `n` independent Bernoulli(p) draws.
pub fn binomial(rng: &mut impl Rng, n: u32, p: f64) -> u32 {
    let p = clamp(p, 0.0, 1.0);
    (0..n).filter(|_| rng.gen_bool(p)).count() as u32
}

/// Knuth's multiplicative Poisson sampler. `lambda` must be finite and >= 0.
pub fn poisson(rng: &mut impl Rng, lambda: f64) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    let l = (-lambda).exp();
    let mut k = 0u32;
    let mut p = 1.0;
    loop {
        k += 1;
        p *= rng.gen::<f64>();
        if p <= l {
            return k - 1;
        }
    }
}

/// Round `x` up with probability equal to its fractional part, down otherwise.
pub fn stoch_round(rng: &mut impl Rng, x: f64) -> i64 {
    let floor = x.floor();
    let frac = x - floor;
    if rng.gen::<f64>() < frac {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
    }

    #[test]
    fn interp_endpoints_and_midpoint() {
        let curve = [(0.0, 1.1), (50.0, 3.3), (100.0, 11.6)];
        assert_eq!(interp(&curve, -10.0), 1.1);
        assert_eq!(interp(&curve, 200.0), 11.6);
        assert_eq!(interp(&curve, 25.0), lerp(1.1, 3.3, 0.5));
    }

    #[test]
    fn stoch_round_is_deterministic_for_seed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = stoch_round(&mut rng, 3.25);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);
        let b = stoch_round(&mut rng2, 3.25);
        assert_eq!(a, b);
    }

    #[test]
    fn poisson_zero_lambda_is_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(poisson(&mut rng, 0.0), 0);
    }

    #[test]
    fn binomial_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let n = binomial(&mut rng, 20, 0.5);
        assert!(n <= 20);
    }
}
