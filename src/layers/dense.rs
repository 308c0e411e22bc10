use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{NetError, Result};
use super::initialization::he_normal;
use super::traits::Layer as LayerTrait;

/// A fully connected (dense) layer: `activation(x · W + b)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "DenseLayerRecord")]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
}

/// Serialized form of a [`DenseLayer`], shape-checked before it becomes one.
#[derive(Deserialize)]
struct DenseLayerRecord {
    weights: Array2<f32>,
    biases: Array1<f32>,
    activation: Activation,
}

impl TryFrom<DenseLayerRecord> for DenseLayer {
    type Error = NetError;

    fn try_from(record: DenseLayerRecord) -> Result<Self> {
        let (input_size, output_size) = record.weights.dim();
        if input_size == 0 || output_size == 0 {
            return Err(zero_dimension(input_size, output_size));
        }
        if record.biases.len() != output_size {
            return Err(NetError::dimension_mismatch(
                format!("{} biases", output_size),
                format!("{} biases", record.biases.len()),
            ));
        }
        Ok(DenseLayer {
            weights: record.weights,
            biases: record.biases,
            activation: record.activation,
        })
    }
}

fn zero_dimension(input_size: usize, output_size: usize) -> NetError {
    NetError::Configuration {
        name: "layer_size".to_string(),
        reason: format!("layer {}x{} has a zero dimension", input_size, output_size),
    }
}

impl DenseLayer {
    /// Create a new dense layer with He-normal weights and zero biases.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        if input_size == 0 || output_size == 0 {
            return Err(zero_dimension(input_size, output_size));
        }
        Ok(DenseLayer {
            weights: he_normal((input_size, output_size), rng)?,
            biases: Array1::zeros(output_size),
            activation,
        })
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(NetError::dimension_mismatch(
                format!("{:?} weights", self.weights.dim()),
                format!("{:?} weights", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.dim() != self.biases.dim() {
            return Err(NetError::dimension_mismatch(
                format!("{} biases", self.biases.len()),
                format!("{} biases", biases.len()),
            ));
        }
        self.biases = biases;
        Ok(self)
    }

    fn check_input_width(&self, width: usize) -> Result<()> {
        if width != self.input_size() {
            return Err(NetError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", width),
            ));
        }
        // public fields may have been resized since construction
        if self.biases.len() != self.output_size() {
            return Err(NetError::dimension_mismatch(
                format!("{} biases", self.output_size()),
                format!("{} biases", self.biases.len()),
            ));
        }
        Ok(())
    }
}

impl LayerTrait for DenseLayer {
    fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input_width(inputs.ncols())?;
        let mut outputs = inputs.dot(&self.weights) + &self.biases;
        self.activation.apply_batch(&mut outputs);
        Ok(outputs)
    }

    fn weights_mut(&mut self) -> &mut Array2<f32> {
        &mut self.weights
    }

    fn biases_mut(&mut self) -> &mut Array1<f32> {
        &mut self.biases
    }

    fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }
}
