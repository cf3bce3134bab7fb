//! Label-specific post-processing
//!
//! Entering a label reshapes the active layer vector with exactly one
//! transform. Dispatch is an exhaustive `match`, so adding a label without
//! a transform does not compile.

use hyperstate_core::StateLabel;
use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

/// Standard deviation of the Collapsed perturbation
const COLLAPSE_NOISE: f64 = 0.01;

/// Lattice spacing of the Crystalline snap
const LATTICE_STEPS: f64 = 16.0;

/// Apply the transform for `label` to `v` in place
///
/// `eigenfrequencies` must be at least as long as `v`. The result is not
/// renormalized.
pub fn apply<R: Rng + ?Sized>(
    label: StateLabel,
    v: &mut Array1<f64>,
    eigenfrequencies: ArrayView1<'_, f64>,
    rng: &mut R,
) {
    let n = v.len();
    if n == 0 {
        return;
    }

    match label {
        StateLabel::Superposition => spectral_reweight(v),
        StateLabel::Entangled => {
            for i in 0..n - 1 {
                // v[i + 1] has not been touched yet
                v[i] = 0.85 * v[i] + 0.15 * v[i + 1];
            }
        }
        StateLabel::Collapsed => {
            v.mapv_inplace(|x| x + COLLAPSE_NOISE * rng.sample::<f64, _>(StandardNormal));
        }
        StateLabel::Tunneling => rotate(v, 1),
        StateLabel::Coherent => {
            for (x, &w) in v.iter_mut().zip(eigenfrequencies.iter()) {
                *x *= (0.01 * w).cos();
            }
        }
        StateLabel::Decoherent => {
            let mean = v.sum() / n as f64;
            v.mapv_inplace(|x| 0.9 * x + 0.1 * mean);
        }
        StateLabel::Resonant => {
            for (i, x) in v.iter_mut().enumerate() {
                *x *= 1.0 + 0.1 * (2.0 * PI * i as f64 / n as f64).sin();
            }
        }
        StateLabel::Fractal => {
            let original = v.clone();
            for (i, x) in v.iter_mut().enumerate() {
                *x += 0.05 * original[(2 * i) % n];
            }
        }
        StateLabel::Hyperbolic => v.mapv_inplace(|x| (2.0 * x).tanh()),
        StateLabel::Toroidal => rotate(v, n - 1),
        StateLabel::Chaotic => v.mapv_inplace(|x| {
            let r = x.abs().min(1.0);
            x + 0.05 * x.signum() * 3.9 * r * (1.0 - r)
        }),
        StateLabel::Crystalline => v.mapv_inplace(|x| {
            0.5 * x + 0.5 * (x * LATTICE_STEPS).round() / LATTICE_STEPS
        }),
        StateLabel::Holographic => {
            let original = v.clone();
            for (i, x) in v.iter_mut().enumerate() {
                *x = 0.5 * original[i] + 0.5 * original[n - 1 - i];
            }
        }
        StateLabel::Topological => {
            let original = v.clone();
            for (i, x) in v.iter_mut().enumerate() {
                let prev = original[(i + n - 1) % n];
                let next = original[(i + 1) % n];
                *x = (prev + original[i] + next) / 3.0;
            }
        }
        StateLabel::Transcendent => {}
    }
}

/// Circular shift right by `k`
fn rotate(v: &mut Array1<f64>, k: usize) {
    let n = v.len();
    let original = v.clone();
    for i in 0..n {
        v[(i + k) % n] = original[i];
    }
}

/// Gain applied to DFT bin `k` of an `n`-point transform
pub fn spectral_gain(k: usize, n: usize) -> f64 {
    let distance = k.min(n - k) as f64;
    1.0 + 0.5 * distance / (n as f64 / 2.0)
}

/// Boost higher frequencies in the DFT domain and keep the real part
fn spectral_reweight(v: &mut Array1<f64>) {
    let n = v.len();
    let nf = n as f64;

    let spectrum: Vec<Complex64> = (0..n)
        .map(|k| {
            let bin: Complex64 = v
                .iter()
                .enumerate()
                .map(|(t, &x)| x * Complex64::from_polar(1.0, -2.0 * PI * (k * t % n) as f64 / nf))
                .sum();
            bin * spectral_gain(k, n)
        })
        .collect();

    for t in 0..n {
        let value: Complex64 = spectrum
            .iter()
            .enumerate()
            .map(|(k, &c)| c * Complex64::from_polar(1.0, 2.0 * PI * (k * t % n) as f64 / nf))
            .sum();
        v[t] = value.re / nf;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(label: StateLabel, v: Array1<f64>) -> Array1<f64> {
        let mut v = v;
        let eigen = Array1::from_elem(v.len(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        apply(label, &mut v, eigen.view(), &mut rng);
        v
    }

    fn assert_close(a: &Array1<f64>, b: &Array1<f64>) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_every_label_preserves_length_and_finiteness() {
        let v = Array1::from_shape_fn(9, |i| ((i as f64) * 0.7).sin() / 3.0);
        for label in StateLabel::ALL {
            let out = run(label, v.clone());
            assert_eq!(out.len(), 9);
            assert!(out.iter().all(|x| x.is_finite()), "{}", label);
        }
    }

    #[test]
    fn test_entangled_neighbor_mixing() {
        let out = run(StateLabel::Entangled, array![1.0, 2.0, 3.0]);
        assert_close(&out, &array![0.85 + 0.3, 1.7 + 0.45, 3.0]);
    }

    #[test]
    fn test_shifts_are_inverse() {
        let v = array![1.0, 2.0, 3.0, 4.0];
        let right = run(StateLabel::Tunneling, v.clone());
        assert_eq!(right, array![4.0, 1.0, 2.0, 3.0]);
        let back = run(StateLabel::Toroidal, right);
        assert_eq!(back, v);
    }

    #[test]
    fn test_transcendent_is_identity() {
        let v = array![0.3, -0.2, 0.9];
        assert_eq!(run(StateLabel::Transcendent, v.clone()), v);
    }

    #[test]
    fn test_spectral_reweight_of_constant_is_unchanged() {
        // Only the DC bin is populated and its gain is 1
        let v = Array1::from_elem(8, 0.25);
        assert_close(&run(StateLabel::Superposition, v.clone()), &v);
    }

    #[test]
    fn test_spectral_reweight_boosts_nyquist() {
        let v = array![1.0, -1.0, 1.0, -1.0];
        let out = run(StateLabel::Superposition, v.clone());
        assert_close(&out, &(v * 1.5));
    }

    #[test]
    fn test_collapsed_noise_is_small_and_seeded() {
        let v = Array1::from_elem(32, 0.5);
        let a = run(StateLabel::Collapsed, v.clone());
        let b = run(StateLabel::Collapsed, v.clone());
        assert_eq!(a, b);
        assert_ne!(a, v);
        assert!(a.iter().all(|x| (x - 0.5).abs() < 0.1));
    }

    #[test]
    fn test_holographic_is_symmetric() {
        let out = run(StateLabel::Holographic, array![1.0, 2.0, 3.0, 5.0]);
        assert_close(&out, &array![3.0, 2.5, 2.5, 3.0]);
    }

    #[test]
    fn test_topological_smoothing_wraps() {
        let out = run(StateLabel::Topological, array![3.0, 0.0, 0.0]);
        assert_close(&out, &array![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_crystalline_snap() {
        let out = run(StateLabel::Crystalline, array![0.5, 0.04]);
        assert_close(&out, &array![0.5, 0.5 * 0.04 + 0.5 * 0.0625]);
    }

    #[test]
    fn test_coherent_uses_eigenfrequencies() {
        let mut v = array![1.0, 1.0];
        let eigen = array![0.0, 100.0 * PI];
        apply(
            StateLabel::Coherent,
            &mut v,
            eigen.view(),
            &mut ChaCha8Rng::seed_from_u64(0),
        );
        assert_close(&v, &array![1.0, -1.0]);
    }

    #[test]
    fn test_spectral_gain() {
        assert_eq!(spectral_gain(0, 8), 1.0);
        assert_eq!(spectral_gain(4, 8), 1.5);
        assert_eq!(spectral_gain(6, 8), 1.25);
        assert_eq!(spectral_gain(0, 1), 1.0);
    }
}
