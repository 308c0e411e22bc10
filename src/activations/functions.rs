use ndarray::Array2;
use serde::{Serialize, Deserialize};

/// An enumeration of the activation functions a dense layer can apply to its output.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Linear,
}

impl Activation {
    /// Apply the activation function to a batch of input arrays in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }
}

/// Logistic sigmoid that never evaluates `exp` of a large positive number.
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^x)` in the overflow-free form `max(x, 0) + ln(1 + e^-|x|)`.
pub fn softplus(x: f32) -> f32 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_softplus_matches_naive_in_safe_range() {
        for &x in &[-5.0f32, -1.0, 0.0, 0.5, 3.0, 10.0] {
            let naive = (1.0 + x.exp()).ln();
            assert_relative_eq!(softplus(x), naive, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_softplus_extremes() {
        assert_eq!(softplus(1e4), 1e4);
        assert!(softplus(-1e4) >= 0.0);
        assert!(softplus(-1e4) < 1e-30);
        assert!(softplus(f32::MAX).is_finite());
    }

    #[test]
    fn test_sigmoid_extremes() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1e4).is_finite());
        assert!(sigmoid(1e4) <= 1.0);
    }
}
