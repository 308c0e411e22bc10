use ndarray::{concatenate, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_positive, NetError, Result};
use crate::layers::DenseLayer;
use crate::network::LayerStack;

/// Shared ReLU trunk over the concatenation `[state, action_params]`.
///
/// `param_dim` is the action-parameter width: `action_dim` for the
/// shared-trunk dueling network, `param_state_dim` for the independent one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValueParamEncoder {
    state_dim: usize,
    param_dim: usize,
    trunk: LayerStack,
}

impl ValueParamEncoder {
    pub fn new<R: Rng + ?Sized>(
        state_dim: usize,
        param_dim: usize,
        hidden: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("state_dim", state_dim)?;
        ensure_positive("param_dim", param_dim)?;
        let trunk = LayerStack::relu_trunk(state_dim + param_dim, hidden, rng)?;
        debug!(
            state_dim,
            param_dim,
            hidden = ?hidden,
            parameters = trunk.num_parameters(),
            "value-param encoder constructed"
        );
        Ok(ValueParamEncoder {
            state_dim,
            param_dim,
            trunk,
        })
    }

    /// Concatenate `states` and `params` along the feature axis and encode.
    pub fn encode(&self, states: ArrayView2<f32>, params: ArrayView2<f32>) -> Result<Array2<f32>> {
        let joint = concat_features(states, params, self.state_dim, self.param_dim)?;
        self.trunk.forward_batch(joint.view())
    }

    /// Encode an already-concatenated `(batch, state_dim + param_dim)` input.
    pub fn encode_joint(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.trunk.forward_batch(inputs)
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn param_dim(&self) -> usize {
        self.param_dim
    }

    pub fn input_dim(&self) -> usize {
        self.state_dim + self.param_dim
    }

    /// Width of the latent feature vector.
    pub fn output_dim(&self) -> usize {
        self.trunk.output_size()
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.trunk.layers
    }

    pub fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.trunk.layers
    }
}

/// Column-concatenate a state batch and a parameter batch after checking widths.
pub fn concat_features(
    states: ArrayView2<f32>,
    params: ArrayView2<f32>,
    state_dim: usize,
    param_dim: usize,
) -> Result<Array2<f32>> {
    if states.ncols() != state_dim {
        return Err(NetError::dimension_mismatch(
            format!("{} state features", state_dim),
            format!("{} state features", states.ncols()),
        ));
    }
    if params.ncols() != param_dim {
        return Err(NetError::dimension_mismatch(
            format!("{} action-parameter features", param_dim),
            format!("{} action-parameter features", params.ncols()),
        ));
    }
    if states.nrows() != params.nrows() {
        return Err(NetError::dimension_mismatch(
            format!("{} parameter rows", states.nrows()),
            format!("{} parameter rows", params.nrows()),
        ));
    }
    Ok(concatenate(Axis(1), &[states.view(), params.view()])?)
}
