use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::Result;

/// Trait defining the interface for neural network layers.
///
/// Evaluation borrows the layer immutably; only an external optimizer
/// touches the parameters, through the `_mut` accessors.
pub trait Layer: Send + Sync {
    /// Perform forward propagation for a single input
    fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>>;

    /// Perform forward propagation for a batch of inputs
    fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Get mutable reference to weights
    fn weights_mut(&mut self) -> &mut Array2<f32>;

    /// Get mutable reference to biases
    fn biases_mut(&mut self) -> &mut Array1<f32>;

    /// Get reference to weights
    fn weights(&self) -> &Array2<f32>;

    /// Get reference to biases
    fn biases(&self) -> &Array1<f32>;

    /// Get the output size of the layer
    fn output_size(&self) -> usize;

    /// Get the input size of the layer
    fn input_size(&self) -> usize;

    /// Number of scalar parameters (weights plus biases)
    fn num_parameters(&self) -> usize {
        self.weights().len() + self.biases().len()
    }
}
