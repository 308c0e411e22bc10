use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::activations::Activation;
use crate::error::{ensure_hidden_widths, ensure_positive, Result};
use crate::layers::{DenseLayer, LayerTrait};

/// An owned, ordered sequence of dense layers.
///
/// The structure is fixed at construction from a runtime-length width list;
/// evaluation walks the layers in order. Layer `i` maps `widths[i - 1]` to
/// `widths[i]`, with `widths[-1]` being the input width.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayerStack {
    pub layers: Vec<DenseLayer>,
}

impl LayerStack {
    /// Build `hidden.len()` affine+ReLU layers starting from `input_size`.
    pub fn relu_trunk<R: Rng + ?Sized>(
        input_size: usize,
        hidden: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("input_size", input_size)?;
        ensure_hidden_widths("hidden_layers", hidden)?;

        let mut layers = Vec::with_capacity(hidden.len());
        let mut fan_in = input_size;
        for &width in hidden {
            layers.push(DenseLayer::new(fan_in, width, Activation::Relu, rng)?);
            fan_in = width;
        }
        Ok(LayerStack { layers })
    }

    /// Build a ReLU trunk followed by one output layer with `output_activation`.
    pub fn with_output<R: Rng + ?Sized>(
        input_size: usize,
        hidden: &[usize],
        output_size: usize,
        output_activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("output_size", output_size)?;
        let mut stack = Self::relu_trunk(input_size, hidden, rng)?;
        let fan_in = stack.output_size();
        stack.layers.push(DenseLayer::new(fan_in, output_size, output_activation, rng)?);
        Ok(stack)
    }

    /// Perform a forward pass for a single input vector.
    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Perform a forward pass for a batch of input vectors.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        trace!(batch = inputs.nrows(), width = inputs.ncols(), "layer stack forward");
        let mut layers = self.layers.iter();
        let mut output = match layers.next() {
            Some(first) => first.forward_batch(inputs)?,
            None => return Ok(inputs.to_owned()),
        };
        for layer in layers {
            output = layer.forward_batch(output.view())?;
        }
        Ok(output)
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.output_size())
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.num_parameters()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_trunk_shapes() {
        let mut rng = StdRng::seed_from_u64(0);
        let stack = LayerStack::relu_trunk(5, &[8, 4], &mut rng).unwrap();

        assert_eq!(stack.layers.len(), 2);
        assert_eq!(stack.layers[0].weights.shape(), [5, 8]);
        assert_eq!(stack.layers[1].weights.shape(), [8, 4]);
        assert_eq!(stack.input_size(), 5);
        assert_eq!(stack.output_size(), 4);
        assert_eq!(stack.num_parameters(), 5 * 8 + 8 + 8 * 4 + 4);
        assert!(stack.layers.iter().all(|l| l.activation == Activation::Relu));
    }

    #[test]
    fn test_with_output_appends_head() {
        let mut rng = StdRng::seed_from_u64(0);
        let stack = LayerStack::with_output(3, &[6], 2, Activation::Linear, &mut rng).unwrap();

        assert_eq!(stack.layers.len(), 2);
        assert_eq!(stack.layers[1].activation, Activation::Linear);
        assert_eq!(stack.output_size(), 2);
    }
}
