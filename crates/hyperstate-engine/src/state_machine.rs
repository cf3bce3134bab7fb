//! Hyperstate machine
//!
//! Owns the state-vector bank and drives label transitions:
//!
//! 1. record `(label, layer)` in the history log
//! 2. pick the next label (forced, or sampled by transition response)
//! 3. apply `0.7 M·v + 0.3 v`, renormalize, post-process for the new label
//! 4. maybe move to another layer along a connection or by a random jump
//! 5. append one value to each metrics series
//!
//! Every random draw comes from the machine's own [`ChaCha8Rng`], so a
//! seeded machine replays the same run.

use crate::config::MachineConfig;
use crate::connections::{blend_window, ConnectionTable, REVERSE_STRENGTH};
use crate::initial_state;
use crate::matrix_bank::TransitionMatrixBank;
use crate::post_process;
use hyperstate_core::invariants::{self, InvariantViolation};
use hyperstate_core::{
    vector, HistoryEntry, HyperstateError, LayerMove, StateLabel, TransitionEvent,
    TransitionObserver,
};
use hyperstate_metrics::{MetricsCollector, MetricsSeries, MetricsSummary};
use hyperstate_patterns::{DynamicTransforms, ResonanceBank};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Weight of the transformed vector in the transition blend
pub const TRANSITION_MIX: f64 = 0.7;

/// Chance per step of trying a hyperspatial connection
const CONNECTION_PROBABILITY: f64 = 0.3;

/// Chance of a random layer jump when no connection fired
const JUMP_PROBABILITY: f64 = 0.1;

/// Share of the arriving layer kept by a random jump
const JUMP_RETENTION: f64 = 0.9;

/// `0.7 · (M · v) + 0.3 · v`, before normalization
pub fn blend_transition(matrix: ArrayView2<'_, f64>, v: ArrayView1<'_, f64>) -> Array1<f64> {
    matrix.dot(&v) * TRANSITION_MIX + &v * (1.0 - TRANSITION_MIX)
}

/// Stochastic multi-layer state machine
pub struct HyperstateMachine {
    /// Validated configuration the machine was built from
    config: MachineConfig,
    /// First `num_states` catalog labels
    labels: &'static [StateLabel],
    /// Label entered by the last transition
    current_label: StateLabel,
    /// Index into `state_vectors` of the layer transitions act on
    current_layer: usize,
    /// `(reality_layers × dimensions)`, one unit vector per layer
    state_vectors: Array2<f64>,
    /// One matrix per ordered pair of distinct active labels
    transitions: Arc<TransitionMatrixBank>,
    /// Fixed routing between layers, detached on first mutation
    connections: Arc<ConnectionTable>,
    /// Resonance families used to seed the layers
    resonance: Arc<ResonanceBank>,
    /// Per-dimension eigenfrequencies, informational only
    eigenfrequencies: Array1<f64>,
    /// `(label, layer)` held before each completed step
    history: Vec<HistoryEntry>,
    /// One entry per series per completed step
    metrics: MetricsSeries,
    /// Hooks notified after every completed step
    observers: Vec<Box<dyn TransitionObserver>>,
    /// Sole random source; seeded machines replay exactly
    rng: ChaCha8Rng,
    /// Completed transitions
    steps: u64,
}

impl HyperstateMachine {
    /// Build a machine, seeding its random source from `config.seed` or OS entropy
    pub fn new(config: MachineConfig) -> Result<Self, HyperstateError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Build a machine around a caller-supplied random source
    pub fn with_rng(config: MachineConfig, mut rng: ChaCha8Rng) -> Result<Self, HyperstateError> {
        config.validate()?;

        let transitions = TransitionMatrixBank::build(
            config.active_labels(),
            config.dimensions,
            config.transition_complexity,
            config.zero_free,
        );
        let connections =
            ConnectionTable::generate(&mut rng, config.reality_layers, config.dimensions);

        Self::assemble(config, Arc::new(transitions), Arc::new(connections), rng)
    }

    /// Build a machine that reuses banks already built by another machine
    ///
    /// Both banks are read-only after construction, so sharing them is safe.
    /// They must match the configuration's labels, width and layer count.
    pub fn with_shared_banks(
        config: MachineConfig,
        transitions: Arc<TransitionMatrixBank>,
        connections: Arc<ConnectionTable>,
        rng: ChaCha8Rng,
    ) -> Result<Self, HyperstateError> {
        config.validate()?;

        if transitions.dimensions() != config.dimensions {
            return Err(HyperstateError::DimensionMismatch {
                expected: config.dimensions,
                actual: transitions.dimensions(),
            });
        }
        if transitions.labels() != config.active_labels() {
            return Err(HyperstateError::config(
                "num_states",
                format!(
                    "shared bank has {} labels, configuration has {}",
                    transitions.labels().len(),
                    config.num_states
                ),
            ));
        }
        if let Some(c) = connections.iter().find(|c| {
            c.source_layer >= config.reality_layers
                || c.target_layer >= config.reality_layers
                || c.center >= config.dimensions
        }) {
            return Err(HyperstateError::config(
                "reality_layers",
                format!("shared connection {} does not fit the configuration", c),
            ));
        }

        Self::assemble(config, transitions, connections, rng)
    }

    fn assemble(
        config: MachineConfig,
        transitions: Arc<TransitionMatrixBank>,
        connections: Arc<ConnectionTable>,
        rng: ChaCha8Rng,
    ) -> Result<Self, HyperstateError> {
        let transforms = DynamicTransforms::new(
            config.dimensions,
            config.fractal_depth,
            config.interference_patterns,
        );
        let resonance = ResonanceBank::generate(config.dimensions, &transforms);
        let state_vectors = initial_state::initial_bank(
            config.reality_layers,
            &resonance,
            &transforms,
            config.zero_free,
        );

        info!(
            dimensions = config.dimensions,
            layers = config.reality_layers,
            states = config.num_states,
            matrices = transitions.len(),
            connections = connections.len(),
            zero_free = config.zero_free,
            target = %config.compute_target,
            seeded = config.seed.is_some(),
            "Hyperstate machine initialized"
        );

        Ok(Self {
            labels: config.active_labels(),
            current_label: StateLabel::INITIAL,
            current_layer: 0,
            state_vectors,
            transitions,
            connections,
            resonance: Arc::new(resonance),
            eigenfrequencies: initial_state::eigenfrequencies(config.dimensions),
            history: Vec::new(),
            metrics: MetricsSeries::new(),
            observers: Vec::new(),
            rng,
            steps: 0,
            config,
        })
    }

    /// Configuration the machine was built from
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Label the machine currently occupies
    pub fn current_label(&self) -> StateLabel {
        self.current_label
    }

    /// Layer the next transition acts on
    pub fn current_layer(&self) -> usize {
        self.current_layer
    }

    /// Labels the machine can occupy, in catalog order
    pub fn active_labels(&self) -> &'static [StateLabel] {
        self.labels
    }

    /// Number of completed transitions
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Copy of the full state-vector bank
    pub fn state_vectors(&self) -> Array2<f64> {
        self.state_vectors.clone()
    }

    /// Copy of one layer vector
    pub fn layer_vector(&self, layer: usize) -> Option<Array1<f64>> {
        (layer < self.state_vectors.nrows()).then(|| self.state_vectors.row(layer).to_owned())
    }

    /// Copy of the `(label, layer)` log, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.clone()
    }

    /// Copy of the four metric series
    pub fn metrics(&self) -> MetricsSeries {
        self.metrics.clone()
    }

    /// Mean and peak of each metric series
    pub fn metrics_summary(&self) -> MetricsSummary {
        self.metrics.summary()
    }

    /// Per-dimension eigenfrequencies
    pub fn eigenfrequencies(&self) -> ArrayView1<'_, f64> {
        self.eigenfrequencies.view()
    }

    /// Shared handle to the resonance families
    pub fn resonance_patterns(&self) -> Arc<ResonanceBank> {
        Arc::clone(&self.resonance)
    }

    /// Shared handle to the transition matrix bank
    pub fn transition_bank(&self) -> Arc<TransitionMatrixBank> {
        Arc::clone(&self.transitions)
    }

    /// Shared handle to the connection table
    pub fn connections(&self) -> Arc<ConnectionTable> {
        Arc::clone(&self.connections)
    }

    /// Mutable connection table, detached from any machine sharing it
    pub fn connections_mut(&mut self) -> &mut ConnectionTable {
        Arc::make_mut(&mut self.connections)
    }

    /// Register a hook that receives every transition event
    pub fn add_observer<O: TransitionObserver + 'static>(&mut self, mut observer: O) {
        observer.on_attach(self.current_label, self.current_layer);
        self.observers.push(Box::new(observer));
    }

    /// Advance one step, optionally forcing the next label
    ///
    /// A forced label must be active and differ from the current label.
    /// Errors leave the machine untouched.
    pub fn transition(
        &mut self,
        forced: Option<StateLabel>,
    ) -> Result<StateLabel, HyperstateError> {
        let from = self.current_label;
        let layer_before = self.current_layer;

        if let Some(label) = forced {
            self.check_forced(label)?;
        }

        self.history.push(HistoryEntry {
            label: from,
            layer: layer_before,
        });

        let to = match forced {
            Some(label) => label,
            None => self.sample_next_label()?,
        };

        self.apply_transition(from, to)?;
        let layer_move = self.cross_layer();
        self.metrics.record(self.state_vectors.view());

        let event = TransitionEvent {
            step: self.steps,
            from,
            to,
            forced: forced.is_some(),
            layer_before,
            layer_after: self.current_layer,
            layer_move,
        };
        self.steps += 1;

        debug!(
            step = event.step,
            %from,
            %to,
            forced = event.forced,
            layer = self.current_layer,
            "Transition complete"
        );
        for observer in &mut self.observers {
            observer.on_transition(&event);
        }

        Ok(to)
    }

    /// Perform `steps` unforced transitions and return the labels entered
    pub fn run(&mut self, steps: usize) -> Result<Vec<StateLabel>, HyperstateError> {
        (0..steps).map(|_| self.transition(None)).collect()
    }

    fn check_forced(&self, label: StateLabel) -> Result<(), HyperstateError> {
        if !self.labels.contains(&label) {
            return Err(HyperstateError::InactiveLabel(label));
        }
        if label == self.current_label {
            return Err(HyperstateError::SelfTransition(label));
        }
        Ok(())
    }

    /// Unnormalized response `Σ|M·v|` of every other active label
    fn candidate_weights(&self) -> Vec<(StateLabel, f64)> {
        let v = self.state_vectors.row(self.current_layer);
        self.labels
            .iter()
            .filter(|&&label| label != self.current_label)
            .map(|&label| {
                let weight = self
                    .transitions
                    .get(self.current_label, label)
                    .map(|m| m.dot(&v).mapv(f64::abs).sum())
                    .unwrap_or(0.0);
                (label, weight)
            })
            .collect()
    }

    /// Probability of entering each other active label on the next unforced step
    ///
    /// Falls back to a uniform distribution when no label gets positive weight.
    pub fn transition_probabilities(&self) -> Vec<(StateLabel, f64)> {
        let weights = self.candidate_weights();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let uniform = 1.0 / weights.len().max(1) as f64;

        weights
            .into_iter()
            .map(|(label, w)| {
                if total > 0.0 && total.is_finite() {
                    (label, w / total)
                } else {
                    (label, uniform)
                }
            })
            .collect()
    }

    fn sample_next_label(&mut self) -> Result<StateLabel, HyperstateError> {
        let weights = self.candidate_weights();
        if weights.is_empty() {
            return Err(HyperstateError::config(
                "num_states",
                format!("no transition target from {}", self.current_label),
            ));
        }

        let index = match WeightedIndex::new(weights.iter().map(|(_, w)| *w)) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(err) => {
                warn!(
                    from = %self.current_label,
                    %err,
                    "Transition weights unusable, sampling uniformly"
                );
                self.rng.gen_range(0..weights.len())
            }
        };
        Ok(weights[index].0)
    }

    fn apply_transition(
        &mut self,
        from: StateLabel,
        to: StateLabel,
    ) -> Result<(), HyperstateError> {
        let layer = self.current_layer;
        let matrix = self.transitions.require(from, to)?;
        let mut v = blend_transition(matrix, self.state_vectors.row(layer));

        self.normalize_layer(layer, &mut v);
        post_process::apply(to, &mut v, self.eigenfrequencies.view(), &mut self.rng);
        self.finish_layer(layer, &mut v);

        self.state_vectors.row_mut(layer).assign(&v);
        self.current_label = to;
        Ok(())
    }

    /// Connection or random jump, at most one per step
    fn cross_layer(&mut self) -> LayerMove {
        if self.rng.gen_bool(CONNECTION_PROBABILITY) {
            let outgoing = self.connections.from_layer(self.current_layer);
            if let Some(&index) = outgoing.choose(&mut self.rng) {
                let strength = self
                    .connections
                    .get(index)
                    .map_or(0.0, |c| c.strength)
                    .clamp(0.0, 1.0);
                if !strength.is_nan() && self.rng.gen_bool(strength) {
                    if let Some(layer_move) = self.fire_connection(index) {
                        return layer_move;
                    }
                }
            }
        }

        if self.rng.gen_bool(JUMP_PROBABILITY) {
            let to = self.rng.gen_range(0..self.config.reality_layers);
            return self.jump(to);
        }

        LayerMove::Stayed
    }

    /// Fire connection `index` from the current layer
    ///
    /// Moves to the connection's target layer and blends its window toward
    /// the current layer. Does not touch history, metrics or the label.
    pub fn apply_connection(&mut self, index: usize) -> Result<LayerMove, HyperstateError> {
        let connection = self
            .connections
            .get(index)
            .ok_or(HyperstateError::UnknownConnection(index))?;
        if connection.source_layer != self.current_layer {
            return Err(HyperstateError::ConnectionNotFromLayer {
                index,
                layer: self.current_layer,
            });
        }
        self.fire_connection(index)
            .ok_or(HyperstateError::UnknownConnection(index))
    }

    fn fire_connection(&mut self, index: usize) -> Option<LayerMove> {
        let c = self.connections.get(index)?.clone();
        let source = self.state_vectors.row(c.source_layer).to_owned();
        let mut target = self.state_vectors.row(c.target_layer).to_owned();
        blend_window(&mut target, source.view(), c.center, c.radius, c.strength);
        self.finish_layer(c.target_layer, &mut target);
        self.state_vectors.row_mut(c.target_layer).assign(&target);

        if c.bidirectional {
            let mut back = self.state_vectors.row(c.source_layer).to_owned();
            blend_window(
                &mut back,
                target.view(),
                c.center,
                c.radius,
                c.strength * REVERSE_STRENGTH,
            );
            self.finish_layer(c.source_layer, &mut back);
            self.state_vectors.row_mut(c.source_layer).assign(&back);
        }

        debug!(
            connection = index,
            from = c.source_layer,
            to = c.target_layer,
            strength = c.strength,
            bidirectional = c.bidirectional,
            "Crossed hyperspatial connection"
        );
        self.current_layer = c.target_layer;

        Some(LayerMove::Connection {
            index,
            from: c.source_layer,
            to: c.target_layer,
            strength: c.strength,
            bidirectional: c.bidirectional,
        })
    }

    fn jump(&mut self, to: usize) -> LayerMove {
        let from = self.current_layer;
        let source = self.state_vectors.row(from).to_owned();
        let mut v = self.state_vectors.row(to).to_owned() * JUMP_RETENTION
            + source * (1.0 - JUMP_RETENTION);
        self.finish_layer(to, &mut v);
        self.state_vectors.row_mut(to).assign(&v);
        self.current_layer = to;

        debug!(from, to, "Random layer jump");
        LayerMove::Jump { from, to }
    }

    fn normalize_layer(&self, layer: usize, v: &mut Array1<f64>) {
        if vector::normalize(v).is_degenerate() {
            warn!(layer, "Zero-norm layer vector left unnormalized");
        }
    }

    /// Renormalize and, for zero-free machines, floor near-zero components
    fn finish_layer(&self, layer: usize, v: &mut Array1<f64>) {
        self.normalize_layer(layer, v);
        if self.config.zero_free {
            vector::zero_free_correct(v);
        }
    }

    /// Audit every structural invariant, returning all violations found
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations: Vec<InvariantViolation> = self
            .state_vectors
            .rows()
            .into_iter()
            .enumerate()
            .filter_map(|(layer, v)| invariants::check_unit_norm(layer, v).err())
            .collect();

        violations.extend(self.transitions.check_invariants(self.config.zero_free));

        for (family, pattern) in self.resonance.iter() {
            if let Err(v) = invariants::check_zero_free(format!("pattern {}", family), pattern.iter())
            {
                violations.push(v);
            }
        }

        if self.config.zero_free {
            for (layer, v) in self.state_vectors.rows().into_iter().enumerate() {
                if let Err(v) = invariants::check_zero_free(format!("layer {}", layer), v.iter()) {
                    violations.push(v);
                }
            }
        }

        violations
    }
}

impl fmt::Debug for HyperstateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperstateMachine")
            .field("config", &self.config)
            .field("current_label", &self.current_label)
            .field("current_layer", &self.current_layer)
            .field("steps", &self.steps)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::HyperspatialConnection;
    use hyperstate_core::RecordingObserver;
    use ndarray::array;

    fn machine(seed: u64) -> HyperstateMachine {
        HyperstateMachine::new(MachineConfig::new(8, 3, 2).with_seed(seed)).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let m = machine(42);
        assert_eq!(m.current_label(), StateLabel::Superposition);
        assert_eq!(m.current_layer(), 0);
        assert_eq!(m.state_vectors().dim(), (2, 8));
        assert_eq!(m.connections().len(), 4);
        assert_eq!(m.transition_bank().len(), 6);
        assert_eq!(m.eigenfrequencies().len(), 8);
        assert!(m.history().is_empty());
        assert!(m.metrics().is_empty());
        assert!(m.check_invariants().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = HyperstateMachine::new(MachineConfig::new(0, 3, 2)).unwrap_err();
        assert!(err.is_configuration());

        let err = HyperstateMachine::new(MachineConfig::new(8, 99, 2)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_blend_transition_formula() {
        let m = array![[0.5, 0.5], [0.25, 0.75]];
        let v = array![1.0, 2.0];
        let out = blend_transition(m.view(), v.view());
        assert!((out[0] - (0.7 * 1.5 + 0.3)).abs() < 1e-12);
        assert!((out[1] - (0.7 * 1.75 + 0.6)).abs() < 1e-12);
    }

    #[test]
    fn test_forced_label_errors_leave_state_untouched() {
        let mut m = machine(1);
        assert_eq!(
            m.transition(Some(StateLabel::Superposition)),
            Err(HyperstateError::SelfTransition(StateLabel::Superposition))
        );
        assert_eq!(
            m.transition(Some(StateLabel::Chaotic)),
            Err(HyperstateError::InactiveLabel(StateLabel::Chaotic))
        );
        assert!(m.history().is_empty());
        assert!(m.metrics().is_empty());
        assert_eq!(m.step_count(), 0);
    }

    #[test]
    fn test_unforced_steps_never_self_transition() {
        let mut m = machine(3);
        let mut previous = m.current_label();
        for _ in 0..30 {
            let next = m.transition(None).unwrap();
            assert_ne!(next, previous);
            assert!(m.active_labels().contains(&next));
            previous = next;
        }
    }

    #[test]
    fn test_probabilities_form_a_distribution() {
        let m = machine(5);
        let probs = m.transition_probabilities();
        assert_eq!(probs.len(), 2);
        assert!(probs.iter().all(|(l, p)| *l != m.current_label() && *p >= 0.0));
        let total: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_history_and_metrics_grow_per_step() {
        let mut m = machine(11);
        let labels = m.run(10).unwrap();
        assert_eq!(labels.len(), 10);
        assert_eq!(m.history().len(), 10);
        assert_eq!(m.metrics().len(), 10);
        assert_eq!(m.step_count(), 10);
        assert_eq!(m.history()[0].label, StateLabel::Superposition);
        assert_eq!(m.current_label(), labels[9]);
        assert_eq!(m.metrics_summary().steps, 10);
    }

    #[test]
    fn test_observer_receives_events() {
        let mut m = machine(2);
        let recorder = RecordingObserver::new();
        m.add_observer(recorder.clone());

        m.transition(Some(StateLabel::Entangled)).unwrap();
        m.transition(None).unwrap();

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].step, 0);
        assert!(events[0].forced);
        assert_eq!(events[0].from, StateLabel::Superposition);
        assert_eq!(events[0].to, StateLabel::Entangled);
        assert!(!events[1].forced);
        assert_eq!(events[1].from, StateLabel::Entangled);
        assert_eq!(events[1].layer_after, m.current_layer());
    }

    #[test]
    fn test_apply_connection_errors() {
        let mut m = machine(4);
        assert_eq!(
            m.apply_connection(99),
            Err(HyperstateError::UnknownConnection(99))
        );
        // Connection 1 leaves layer 1, the machine sits on layer 0
        assert_eq!(
            m.apply_connection(1),
            Err(HyperstateError::ConnectionNotFromLayer { index: 1, layer: 0 })
        );
    }

    #[test]
    fn test_apply_connection_moves_layer() {
        let mut m = machine(4);
        let layer_move = m.apply_connection(0).unwrap();
        assert_eq!(m.current_layer(), 1);
        assert!(matches!(layer_move, LayerMove::Connection { index: 0, from: 0, to: 1, .. }));
        assert!(m.check_invariants().is_empty());
    }

    #[test]
    fn test_connections_mut_detaches_shared_table() {
        let mut m = machine(8);
        let shared = m.connections();
        m.connections_mut().get_mut(0).unwrap().strength = 1.0;
        assert_eq!(m.connections().get(0).unwrap().strength, 1.0);
        assert_ne!(shared.get(0).unwrap().strength, 1.0);
    }

    #[test]
    fn test_shared_banks() {
        let config = MachineConfig::new(8, 3, 2).with_seed(6);
        let first = HyperstateMachine::new(config.clone()).unwrap();
        let second = HyperstateMachine::with_shared_banks(
            config,
            first.transition_bank(),
            first.connections(),
            ChaCha8Rng::seed_from_u64(7),
        )
        .unwrap();
        assert!(Arc::ptr_eq(&first.transition_bank(), &second.transition_bank()));

        let mismatched = HyperstateMachine::with_shared_banks(
            MachineConfig::new(16, 3, 2),
            first.transition_bank(),
            first.connections(),
            ChaCha8Rng::seed_from_u64(7),
        );
        assert_eq!(
            mismatched.unwrap_err(),
            HyperstateError::DimensionMismatch {
                expected: 16,
                actual: 8
            }
        );
    }

    #[test]
    fn test_shared_connections_must_fit_layers() {
        let config = MachineConfig::new(8, 3, 2).with_seed(6);
        let first = HyperstateMachine::new(config.clone()).unwrap();
        let table = ConnectionTable::from_connections(vec![HyperspatialConnection {
            source_layer: 2,
            target_layer: 0,
            center: 1,
            radius: 3,
            strength: 0.4,
            bidirectional: false,
        }]);

        let err = HyperstateMachine::with_shared_banks(
            config,
            first.transition_bank(),
            Arc::new(table),
            ChaCha8Rng::seed_from_u64(7),
        )
        .unwrap_err();
        assert!(err.is_configuration(), "{}", err);
    }

    #[test]
    fn test_zero_vector_falls_back_to_uniform() {
        let mut m =
            HyperstateMachine::new(MachineConfig::new(8, 4, 1).with_seed(13)).unwrap();
        m.state_vectors.row_mut(0).fill(0.0);

        let probs = m.transition_probabilities();
        assert_eq!(probs.len(), 3);
        for (label, p) in &probs {
            assert_ne!(*label, StateLabel::Superposition);
            assert!((p - 1.0 / 3.0).abs() < 1e-12, "{} has {}", label, p);
        }

        let next = m.transition(None).unwrap();
        assert_ne!(next, StateLabel::Superposition);
        assert!(m.active_labels().contains(&next));
        assert!(m.check_invariants().is_empty());
    }

    #[test]
    fn test_without_zero_free_still_unit_norm() {
        let mut m =
            HyperstateMachine::new(MachineConfig::new(16, 5, 3).with_zero_free(false).with_seed(9))
                .unwrap();
        m.run(25).unwrap();
        assert!(m.check_invariants().is_empty());
    }
}
