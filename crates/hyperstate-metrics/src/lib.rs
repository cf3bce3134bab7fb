//! # Hyperstate Metrics
//!
//! Diagnostic metrics derived from a state-vector bank after every
//! transition: entropy, coherence, complexity and a composite index.

use hyperstate_core::vector::{self, MIN_DENOMINATOR};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Metrics for a single step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    /// Shannon entropy of the squared-amplitude distribution over the bank
    pub entropy: f64,
    /// Mean absolute cosine similarity between layers
    pub coherence: f64,
    /// Mean normalized total variation of the layer vectors
    pub complexity: f64,
    /// Average of normalized entropy, coherence and complexity
    pub composite: f64,
}

impl StepMetrics {
    /// Compute every metric from a (layers × dimensions) bank
    pub fn from_bank(bank: ArrayView2<'_, f64>) -> Self {
        let entropy = entropy(bank);
        let coherence = coherence(bank);
        let complexity = complexity(bank);

        let max_entropy = (bank.len() as f64).ln().max(MIN_DENOMINATOR);
        let composite = (entropy / max_entropy + coherence + complexity) / 3.0;

        Self {
            entropy,
            coherence,
            complexity,
            composite,
        }
    }
}

/// -Σ p ln p with p proportional to squared amplitude
pub fn entropy(bank: ArrayView2<'_, f64>) -> f64 {
    let total: f64 = bank.iter().map(|x| x * x).sum();
    if total <= 0.0 {
        return 0.0;
    }

    bank.iter()
        .map(|x| x * x / total)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// Mean |cos| over all layer pairs; a single layer is fully coherent
pub fn coherence(bank: ArrayView2<'_, f64>) -> f64 {
    let layers = bank.nrows();
    if layers < 2 {
        return 1.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for a in 0..layers {
        for b in (a + 1)..layers {
            total += vector::cosine(bank.row(a), bank.row(b)).abs();
            pairs += 1;
        }
    }
    total / pairs as f64
}

/// Mean over layers of Σ|v[i+1] - v[i]| / (n - 1)
pub fn complexity(bank: ArrayView2<'_, f64>) -> f64 {
    let layers = bank.nrows();
    if layers == 0 || bank.ncols() < 2 {
        return 0.0;
    }

    let steps = (bank.ncols() - 1) as f64;
    let total: f64 = bank
        .rows()
        .into_iter()
        .map(|row| {
            row.windows(2)
                .into_iter()
                .map(|w| (w[1] - w[0]).abs())
                .sum::<f64>()
                / steps
        })
        .sum();
    total / layers as f64
}

/// Aggregated view of a metrics series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub steps: usize,
    pub mean: StepMetrics,
    pub peak: StepMetrics,
    pub latest: Option<StepMetrics>,
}

/// Trait for collecting and aggregating metrics
pub trait MetricsCollector: Send + Sync {
    /// Record metrics for the bank as it stands after a step
    fn record(&mut self, bank: ArrayView2<'_, f64>) -> StepMetrics;

    /// Metrics recorded at a given step
    fn step_metrics(&self, step: usize) -> Option<StepMetrics>;

    /// Aggregated metrics across all recorded steps
    fn summary(&self) -> MetricsSummary;
}

/// Four append-only series, one value per transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSeries {
    pub entropy: Vec<f64>,
    pub coherence: Vec<f64>,
    pub complexity: Vec<f64>,
    pub composite: Vec<f64>,
}

impl MetricsSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metrics: StepMetrics) {
        self.entropy.push(metrics.entropy);
        self.coherence.push(metrics.coherence);
        self.complexity.push(metrics.complexity);
        self.composite.push(metrics.composite);
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.entropy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entropy.is_empty()
    }
}

impl MetricsCollector for MetricsSeries {
    fn record(&mut self, bank: ArrayView2<'_, f64>) -> StepMetrics {
        let metrics = StepMetrics::from_bank(bank);
        self.push(metrics);
        metrics
    }

    fn step_metrics(&self, step: usize) -> Option<StepMetrics> {
        Some(StepMetrics {
            entropy: *self.entropy.get(step)?,
            coherence: *self.coherence.get(step)?,
            complexity: *self.complexity.get(step)?,
            composite: *self.composite.get(step)?,
        })
    }

    fn summary(&self) -> MetricsSummary {
        let steps = self.len();
        let mean = |series: &[f64]| {
            if series.is_empty() {
                0.0
            } else {
                series.iter().sum::<f64>() / series.len() as f64
            }
        };
        let peak = |series: &[f64]| series.iter().copied().fold(0.0f64, f64::max);

        MetricsSummary {
            steps,
            mean: StepMetrics {
                entropy: mean(&self.entropy),
                coherence: mean(&self.coherence),
                complexity: mean(&self.complexity),
                composite: mean(&self.composite),
            },
            peak: StepMetrics {
                entropy: peak(&self.entropy),
                coherence: peak(&self.coherence),
                complexity: peak(&self.complexity),
                composite: peak(&self.composite),
            },
            latest: steps.checked_sub(1).and_then(|last| self.step_metrics(last)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_entropy_uniform_bank() {
        let bank = Array2::from_elem((2, 4), 0.5);
        let expected = (8.0f64).ln();
        assert!((entropy(bank.view()) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_single_spike() {
        let bank = array![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(entropy(bank.view()), 0.0);
    }

    #[test]
    fn test_coherence() {
        let aligned = array![[1.0, 0.0], [-1.0, 0.0]];
        assert!((coherence(aligned.view()) - 1.0).abs() < 1e-12);

        let orthogonal = array![[1.0, 0.0], [0.0, 1.0]];
        assert_eq!(coherence(orthogonal.view()), 0.0);

        let single = array![[0.3, 0.4]];
        assert_eq!(coherence(single.view()), 1.0);
    }

    #[test]
    fn test_complexity() {
        let bank = array![[0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        // Layer 0: (1 + 1) / 2 = 1, layer 1: 0
        assert!((complexity(bank.view()) - 0.5).abs() < 1e-12);

        let narrow = array![[1.0]];
        assert_eq!(complexity(narrow.view()), 0.0);
    }

    #[test]
    fn test_series_grows_one_per_record() {
        let mut series = MetricsSeries::new();
        let bank = Array2::from_elem((2, 4), 0.5);

        for step in 0..5 {
            series.record(bank.view());
            assert_eq!(series.len(), step + 1);
            assert_eq!(series.coherence.len(), step + 1);
            assert_eq!(series.complexity.len(), step + 1);
            assert_eq!(series.composite.len(), step + 1);
        }

        let summary = series.summary();
        assert_eq!(summary.steps, 5);
        assert_eq!(summary.latest, series.step_metrics(4));
        assert!((summary.mean.coherence - 1.0).abs() < 1e-12);
        assert!(series.step_metrics(5).is_none());
    }

    #[test]
    fn test_empty_summary() {
        let summary = MetricsSeries::new().summary();
        assert_eq!(summary.steps, 0);
        assert!(summary.latest.is_none());
        assert_eq!(summary.mean.entropy, 0.0);
    }
}
