use ndarray::{Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activations::Activation;
use crate::error::{ensure_positive, NetError, Result};
use crate::layers::{DenseLayer, LayerTrait};
use super::encoder::ValueParamEncoder;

/// How the advantage and value branches are wired.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum DuelingBranches {
    /// One trunk over `[state, action_params]`, both heads branch off it.
    Shared {
        trunk: ValueParamEncoder,
        advantage: DenseLayer,
        value: DenseLayer,
    },
    /// Each head has its own trunk over `[state, param_state]`.
    Independent {
        advantage_trunk: ValueParamEncoder,
        advantage: DenseLayer,
        value_trunk: ValueParamEncoder,
        value: DenseLayer,
    },
}

/// Both halves of a dueling evaluation along with the combined estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct DuelingOutput {
    /// `(batch, 1)` state value
    pub value: Array2<f32>,
    /// `(batch, action_dim)` raw advantages
    pub advantage: Array2<f32>,
    /// `(batch, action_dim)` action values
    pub q: Array2<f32>,
}

/// Dueling action-value network: `Q[i] = V + A[i] - mean_j(A[j])`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DuelingValueHead {
    state_dim: usize,
    action_dim: usize,
    branches: DuelingBranches,
}

impl DuelingValueHead {
    /// Shared-trunk network over `state_dim + action_dim` inputs.
    pub fn shared<R: Rng + ?Sized>(
        state_dim: usize,
        action_dim: usize,
        hidden: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("action_dim", action_dim)?;
        let trunk = ValueParamEncoder::new(state_dim, action_dim, hidden, rng)?;
        let features = trunk.output_dim();
        let advantage = DenseLayer::new(features, action_dim, Activation::Linear, rng)?;
        let value = DenseLayer::new(features, 1, Activation::Linear, rng)?;

        let head = DuelingValueHead {
            state_dim,
            action_dim,
            branches: DuelingBranches::Shared { trunk, advantage, value },
        };
        debug!(state_dim, action_dim, parameters = head.num_parameters(), "shared dueling head constructed");
        Ok(head)
    }

    /// Independent-branch network over `state_dim + param_state_dim` inputs.
    pub fn independent<R: Rng + ?Sized>(
        state_dim: usize,
        action_dim: usize,
        param_state_dim: usize,
        advantage_hidden: &[usize],
        value_hidden: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("action_dim", action_dim)?;
        let advantage_trunk = ValueParamEncoder::new(state_dim, param_state_dim, advantage_hidden, rng)?;
        let advantage = DenseLayer::new(advantage_trunk.output_dim(), action_dim, Activation::Linear, rng)?;
        let value_trunk = ValueParamEncoder::new(state_dim, param_state_dim, value_hidden, rng)?;
        let value = DenseLayer::new(value_trunk.output_dim(), 1, Activation::Linear, rng)?;

        let head = DuelingValueHead {
            state_dim,
            action_dim,
            branches: DuelingBranches::Independent {
                advantage_trunk,
                advantage,
                value_trunk,
                value,
            },
        };
        debug!(
            state_dim,
            action_dim,
            param_state_dim,
            parameters = head.num_parameters(),
            "independent dueling head constructed"
        );
        Ok(head)
    }

    /// Combined action values, `(batch, action_dim)`.
    pub fn forward(&self, states: ArrayView2<f32>, params: ArrayView2<f32>) -> Result<Array2<f32>> {
        Ok(self.decompose(states, params)?.q)
    }

    /// Evaluate both branches and return them alongside the combined estimate.
    pub fn decompose(&self, states: ArrayView2<f32>, params: ArrayView2<f32>) -> Result<DuelingOutput> {
        let (value, advantage) = match &self.branches {
            DuelingBranches::Shared { trunk, advantage, value } => {
                let features = trunk.encode(states, params)?;
                (value.forward_batch(features.view())?, advantage.forward_batch(features.view())?)
            }
            DuelingBranches::Independent {
                advantage_trunk,
                advantage,
                value_trunk,
                value,
            } => {
                let adv_features = advantage_trunk.encode(states, params)?;
                let val_features = value_trunk.encode(states, params)?;
                (
                    value.forward_batch(val_features.view())?,
                    advantage.forward_batch(adv_features.view())?,
                )
            }
        };
        let q = combine(value.view(), advantage.view())?;
        Ok(DuelingOutput { value, advantage, q })
    }

    /// Two action-value estimates for double-Q style targets.
    ///
    /// Evaluation is deterministic, so both estimates are equal; the pair is
    /// computed once and cloned.
    pub fn q1_q2(&self, states: ArrayView2<f32>, params: ArrayView2<f32>) -> Result<(Array2<f32>, Array2<f32>)> {
        let q = self.forward(states, params)?;
        Ok((q.clone(), q))
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    /// Action-parameter width expected by `forward`.
    pub fn param_dim(&self) -> usize {
        match &self.branches {
            DuelingBranches::Shared { trunk, .. } => trunk.param_dim(),
            DuelingBranches::Independent { advantage_trunk, .. } => advantage_trunk.param_dim(),
        }
    }

    pub fn branches(&self) -> &DuelingBranches {
        &self.branches
    }

    /// Every layer, trunk layers first, advantage branch before value branch.
    pub fn layers(&self) -> Vec<&DenseLayer> {
        match &self.branches {
            DuelingBranches::Shared { trunk, advantage, value } => {
                trunk.layers().iter().chain([advantage, value]).collect()
            }
            DuelingBranches::Independent {
                advantage_trunk,
                advantage,
                value_trunk,
                value,
            } => advantage_trunk
                .layers()
                .iter()
                .chain(std::iter::once(advantage))
                .chain(value_trunk.layers())
                .chain(std::iter::once(value))
                .collect(),
        }
    }

    /// Mutable access for an external optimizer, same order as `layers`.
    pub fn layers_mut(&mut self) -> Vec<&mut DenseLayer> {
        match &mut self.branches {
            DuelingBranches::Shared { trunk, advantage, value } => {
                trunk.layers_mut().iter_mut().chain([advantage, value]).collect()
            }
            DuelingBranches::Independent {
                advantage_trunk,
                advantage,
                value_trunk,
                value,
            } => advantage_trunk
                .layers_mut()
                .iter_mut()
                .chain(std::iter::once(advantage))
                .chain(value_trunk.layers_mut().iter_mut())
                .chain(std::iter::once(value))
                .collect(),
        }
    }

    pub fn num_parameters(&self) -> usize {
        self.layers().iter().map(|l| l.num_parameters()).sum()
    }
}

/// Row-wise dueling combination of a `(batch, 1)` value and `(batch, n)` advantages.
pub fn combine(value: ArrayView2<f32>, advantage: ArrayView2<f32>) -> Result<Array2<f32>> {
    if value.ncols() != 1 || value.nrows() != advantage.nrows() {
        return Err(NetError::dimension_mismatch(
            format!("({}, 1) value", advantage.nrows()),
            format!("{:?} value", value.dim()),
        ));
    }
    let mean = advantage
        .mean_axis(Axis(1))
        .ok_or_else(|| NetError::Numerical("advantage mean over zero actions".to_string()))?
        .insert_axis(Axis(1));
    Ok(&advantage - &mean + &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_combine_subtracts_advantage_mean() {
        let value = array![[1.0], [-2.0]];
        let advantage = array![[1.0, 3.0], [0.0, 0.0]];
        let q = combine(value.view(), advantage.view()).unwrap();
        assert_eq!(q, array![[0.0, 2.0], [-2.0, -2.0]]);
    }

    #[test]
    fn test_combine_rejects_wide_value() {
        let value = array![[1.0, 2.0]];
        let advantage = array![[1.0, 3.0]];
        assert!(matches!(
            combine(value.view(), advantage.view()),
            Err(NetError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_combine_shifted_advantage_is_invariant() {
        let value = array![[0.5]];
        let advantage = array![[1.0, -1.0, 4.0]];
        let shifted = &advantage + 10.0;
        let a = combine(value.view(), advantage.view()).unwrap();
        let b = combine(value.view(), shifted.view()).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-5);
        }
    }
}
