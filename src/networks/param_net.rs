use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activations::{sigmoid, Activation};
use crate::debug::check_finite;
use crate::error::{ensure_positive, Result};
use crate::layers::DenseLayer;
use crate::network::LayerStack;

/// Lower edge of the proposal interval.
pub const PARAM_LOW: f32 = 5.0;
/// Width of the proposal interval.
pub const PARAM_RANGE: f32 = 10.0;

/// Sigmoid is kept this far from 0 and 1 so the interval stays open in `f32`.
const SIGMOID_MARGIN: f32 = 1e-6;

/// Maps state to continuous action parameters in `(5, 15)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParameterProposalNetwork {
    state_dim: usize,
    param_dim: usize,
    stack: LayerStack,
}

impl ParameterProposalNetwork {
    pub fn new<R: Rng + ?Sized>(
        state_dim: usize,
        param_dim: usize,
        hidden: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("state_dim", state_dim)?;
        ensure_positive("param_dim", param_dim)?;
        let stack = LayerStack::with_output(state_dim, hidden, param_dim, Activation::Linear, rng)?;
        debug!(state_dim, param_dim, parameters = stack.num_parameters(), "parameter network constructed");
        Ok(ParameterProposalNetwork {
            state_dim,
            param_dim,
            stack,
        })
    }

    /// `sigmoid(x) * 10 + 5` over the final affine output.
    ///
    /// Huge finite states can overflow the affine stack; infinite logits
    /// saturate to the clamped edges and NaN logits fall back to the
    /// midpoint, so every entry stays inside `(5, 15)`. Both cases are
    /// logged as numerical warnings.
    pub fn forward(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut out = self.stack.forward_batch(states)?;
        check_finite(out.view(), "param_logits");
        out.mapv_inplace(|x| {
            let s = if x.is_nan() { 0.5 } else { sigmoid(x) };
            s.clamp(SIGMOID_MARGIN, 1.0 - SIGMOID_MARGIN) * PARAM_RANGE + PARAM_LOW
        });
        Ok(out)
    }

    pub fn forward_one(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        let out = self.forward(state.insert_axis(Axis(0)))?;
        Ok(out.index_axis_move(Axis(0), 0))
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn param_dim(&self) -> usize {
        self.param_dim
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.stack.layers
    }

    pub fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.stack.layers
    }

    pub fn num_parameters(&self) -> usize {
        self.stack.num_parameters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerTrait;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_output_layer_gives_midpoint() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = ParameterProposalNetwork::new(2, 3, &[4], &mut rng).unwrap();
        let last = net.layers_mut().last_mut().unwrap();
        last.weights_mut().fill(0.0);

        let out = net.forward_one(array![1.0, -1.0].view()).unwrap();
        assert_eq!(out, array![10.0f32, 10.0, 10.0]);
    }

    #[test]
    fn test_saturated_output_stays_open() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = ParameterProposalNetwork::new(1, 2, &[2], &mut rng).unwrap();
        let layers = net.layers_mut();
        layers[0].weights_mut().fill(1.0);
        layers[1].weights_mut().fill(1.0);
        layers[1].biases_mut().assign(&array![1e6, -1e6]);

        let out = net.forward_one(array![1.0].view()).unwrap();
        assert!(out[0] < 15.0 && out[0] > 14.9);
        assert!(out[1] > 5.0 && out[1] < 5.1);
    }

    #[test]
    fn test_overflowing_states_stay_in_interval() {
        let states = Array2::from_elem((1, 4), 1e38f32);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let net = ParameterProposalNetwork::new(4, 3, &[8, 8], &mut rng).unwrap();
            let out = net.forward(states.view()).unwrap();
            assert!(
                out.iter().all(|&p| p > PARAM_LOW && p < PARAM_LOW + PARAM_RANGE),
                "seed {} gave {:?}",
                seed,
                out
            );
        }
    }

    #[test]
    fn test_nan_logits_fall_back_to_midpoint() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut net = ParameterProposalNetwork::new(1, 2, &[2], &mut rng).unwrap();
        let layers = net.layers_mut();
        layers[1].biases_mut().assign(&array![f32::NAN, f32::INFINITY]);

        let out = net.forward_one(array![0.5f32].view()).unwrap();
        assert_eq!(out[0], 10.0);
        assert!(out[1] < 15.0 && out[1] > 14.9);
    }
}
