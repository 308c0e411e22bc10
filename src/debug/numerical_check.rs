use ndarray::ArrayView2;
use tracing::warn;

use crate::layers::{DenseLayer, LayerTrait};

/// Types of numerical issues
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalIssue {
    NaN { count: usize },
    Infinity { count: usize },
    /// Values pinned at a clamp bound
    Clamped { count: usize },
    /// Pre-tanh values where `tanh` has saturated to ±1 in `f32`
    Saturated { count: usize },
}

/// Past this magnitude `tanh` rounds to exactly ±1 in `f32`.
pub const TANH_SATURATION: f32 = 9.0;

/// Count NaN and infinite entries of `values`, warning under `context`.
pub fn check_finite(values: ArrayView2<f32>, context: &str) -> Vec<NumericalIssue> {
    let mut nan_count = 0;
    let mut inf_count = 0;

    for &value in values.iter() {
        if value.is_nan() {
            nan_count += 1;
        } else if value.is_infinite() {
            inf_count += 1;
        }
    }

    let mut issues = Vec::new();
    if nan_count > 0 {
        warn!(context, count = nan_count, "NaN values detected");
        issues.push(NumericalIssue::NaN { count: nan_count });
    }
    if inf_count > 0 {
        warn!(context, count = inf_count, "infinite values detected");
        issues.push(NumericalIssue::Infinity { count: inf_count });
    }
    issues
}

/// Count entries of `raw` that fall outside `[min, max]` before clamping.
pub fn check_clamped(raw: ArrayView2<f32>, min: f32, max: f32, context: &str) -> Option<NumericalIssue> {
    let count = raw.iter().filter(|&&v| v < min || v > max).count();
    if count == 0 {
        return None;
    }
    warn!(context, count, min, max, "values clamped to bound");
    Some(NumericalIssue::Clamped { count })
}

/// Count pre-squash values deep in the flat region of `tanh`.
pub fn check_tanh_saturation(pre_tanh: ArrayView2<f32>, context: &str) -> Option<NumericalIssue> {
    let count = pre_tanh.iter().filter(|v| v.abs() > TANH_SATURATION).count();
    if count == 0 {
        return None;
    }
    warn!(context, count, "tanh saturated");
    Some(NumericalIssue::Saturated { count })
}

/// Check every layer's weights and biases for NaN/Inf.
pub fn check_parameters(layers: &[&DenseLayer]) -> Vec<NumericalIssue> {
    let mut issues = Vec::new();
    for (layer_idx, layer) in layers.iter().enumerate() {
        let context = format!("layer {} weights", layer_idx);
        issues.extend(check_finite(layer.weights().view(), &context));
        let biases = layer.biases().view().insert_axis(ndarray::Axis(0));
        let context = format!("layer {} biases", layer_idx);
        issues.extend(check_finite(biases, &context));
    }
    issues
}
