use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::activations::{softplus, Activation};
use crate::debug::{check_clamped, check_finite, check_tanh_saturation};
use crate::error::{ensure_positive, NetError, Result};
use crate::layers::{DenseLayer, LayerTrait};
use crate::network::LayerStack;

pub const LOG_STD_MIN: f32 = -20.0;
pub const LOG_STD_MAX: f32 = 2.0;

/// `ln(sqrt(2 * pi))`
const LN_SQRT_2PI: f32 = 0.918_938_5;

/// Per-dimension `[low, high]` bounds of a continuous action space.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ActionBounds {
    pub low: Vec<f32>,
    pub high: Vec<f32>,
}

impl ActionBounds {
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        ActionBounds { low, high }
    }

    /// Symmetric `[-limit, limit]` bounds on every dimension.
    pub fn symmetric(action_dim: usize, limit: f32) -> Self {
        ActionBounds {
            low: vec![-limit; action_dim],
            high: vec![limit; action_dim],
        }
    }

    /// `(scale, bias)` with `scale = (high - low) / 2`, `bias = (high + low) / 2`.
    ///
    /// Lengths and finiteness are checked; `high <= low` is left to the caller
    /// and only logged.
    pub fn scale_and_bias(&self, action_dim: usize) -> Result<(Array1<f32>, Array1<f32>)> {
        if self.low.len() != action_dim || self.high.len() != action_dim {
            return Err(NetError::Configuration {
                name: "action_bounds".to_string(),
                reason: format!(
                    "expected {} dimensions, got low={} high={}",
                    action_dim,
                    self.low.len(),
                    self.high.len()
                ),
            });
        }
        if self.low.iter().chain(&self.high).any(|v| !v.is_finite()) {
            return Err(NetError::configuration("action_bounds", "bounds must be finite"));
        }

        let low = Array1::from_vec(self.low.clone());
        let high = Array1::from_vec(self.high.clone());
        let degenerate = Zip::from(&low).and(&high).fold(0usize, |n, &l, &h| n + (h <= l) as usize);
        if degenerate > 0 {
            warn!(dimensions = degenerate, "action bounds with high <= low");
        }
        Ok(((&high - &low) / 2.0, (&high + &low) / 2.0))
    }
}

/// Tanh-squashed Gaussian policy over a continuous action space.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "PolicyRecord")]
pub struct GaussianPolicyHead {
    state_dim: usize,
    action_dim: usize,
    trunk: LayerStack,
    mean: DenseLayer,
    log_std: DenseLayer,
    action_scale: Array1<f32>,
    action_bias: Array1<f32>,
}

/// Serialized form of a [`GaussianPolicyHead`], checked against its own dimensions on load.
#[derive(Deserialize)]
struct PolicyRecord {
    state_dim: usize,
    action_dim: usize,
    trunk: LayerStack,
    mean: DenseLayer,
    log_std: DenseLayer,
    action_scale: Array1<f32>,
    action_bias: Array1<f32>,
}

impl TryFrom<PolicyRecord> for GaussianPolicyHead {
    type Error = NetError;

    fn try_from(record: PolicyRecord) -> Result<Self> {
        let policy = GaussianPolicyHead {
            state_dim: record.state_dim,
            action_dim: record.action_dim,
            trunk: record.trunk,
            mean: record.mean,
            log_std: record.log_std,
            action_scale: record.action_scale,
            action_bias: record.action_bias,
        };
        policy.validate()?;
        Ok(policy)
    }
}

fn expect_width(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NetError::dimension_mismatch(
            format!("{} {}", expected, what),
            format!("{} {}", actual, what),
        ));
    }
    Ok(())
}

impl GaussianPolicyHead {
    /// Build the policy; without `bounds` actions live in `(-1, 1)`.
    pub fn new<R: Rng + ?Sized>(
        state_dim: usize,
        action_dim: usize,
        hidden: &[usize],
        bounds: Option<&ActionBounds>,
        rng: &mut R,
    ) -> Result<Self> {
        ensure_positive("state_dim", state_dim)?;
        ensure_positive("action_dim", action_dim)?;
        let trunk = LayerStack::relu_trunk(state_dim, hidden, rng)?;
        let features = trunk.output_size();
        let mean = DenseLayer::new(features, action_dim, Activation::Linear, rng)?;
        let log_std = DenseLayer::new(features, action_dim, Activation::Linear, rng)?;

        let (action_scale, action_bias) = match bounds {
            Some(bounds) => bounds.scale_and_bias(action_dim)?,
            None => (Array1::ones(action_dim), Array1::zeros(action_dim)),
        };

        let policy = GaussianPolicyHead {
            state_dim,
            action_dim,
            trunk,
            mean,
            log_std,
            action_scale,
            action_bias,
        };
        debug!(
            state_dim,
            action_dim,
            bounded = bounds.is_some(),
            parameters = policy.num_parameters(),
            "gaussian policy constructed"
        );
        Ok(policy)
    }

    /// Check that every stored width agrees with `state_dim` and `action_dim`.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("state_dim", self.state_dim)?;
        ensure_positive("action_dim", self.action_dim)?;
        expect_width("trunk input features", self.state_dim, self.trunk.input_size())?;
        let features = self.trunk.output_size();
        for head in [&self.mean, &self.log_std] {
            expect_width("head input features", features, head.input_size())?;
            expect_width("head outputs", self.action_dim, head.output_size())?;
        }
        expect_width("action scale entries", self.action_dim, self.action_scale.len())?;
        expect_width("action bias entries", self.action_dim, self.action_bias.len())?;
        Ok(())
    }

    /// Raw Gaussian parameters: `(mean, log_std)` with log-std clamped to `[-20, 2]`.
    pub fn forward(&self, states: ArrayView2<f32>) -> Result<(Array2<f32>, Array2<f32>)> {
        let features = self.trunk.forward_batch(states)?;
        let mean = self.mean.forward_batch(features.view())?;
        let mut log_std = self.log_std.forward_batch(features.view())?;
        check_clamped(log_std.view(), LOG_STD_MIN, LOG_STD_MAX, "log_std");
        log_std.mapv_inplace(|v| v.clamp(LOG_STD_MIN, LOG_STD_MAX));
        Ok((mean, log_std))
    }

    /// Sample a rollout action `scale * tanh(Normal(mean, std)) + bias`.
    pub fn get_action<R: Rng + ?Sized>(&self, states: ArrayView2<f32>, rng: &mut R) -> Result<Array2<f32>> {
        let (mean, log_std) = self.forward(states)?;
        let noise: Array2<f32> = Array2::random_using(mean.raw_dim(), StandardNormal, rng);
        let mut sample = mean;
        Zip::from(&mut sample)
            .and(&log_std)
            .and(&noise)
            .for_each(|m, &ls, &eps| *m += ls.exp() * eps);
        Ok(self.squash(sample))
    }

    /// Single-state convenience for environment rollouts.
    pub fn get_action_one<R: Rng + ?Sized>(&self, state: ArrayView1<f32>, rng: &mut R) -> Result<Array1<f32>> {
        let action = self.get_action(state.insert_axis(Axis(0)), rng)?;
        Ok(action.index_axis_move(Axis(0), 0))
    }

    /// Noise-free action `scale * tanh(mean) + bias`.
    pub fn deterministic_action(&self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (mean, _) = self.forward(states)?;
        Ok(self.squash(mean))
    }

    /// Reparameterized sample with its squashed-Gaussian log-probability term.
    ///
    /// Returns `(action, log_prob)` where `log_prob` is `(batch, 1)`.
    pub fn get_action_logprob<R: Rng + ?Sized>(
        &self,
        states: ArrayView2<f32>,
        rng: &mut R,
    ) -> Result<(Array2<f32>, Array2<f32>)> {
        // widths are checked by `forward` before any noise is drawn
        let (mean, log_std) = self.forward(states)?;
        let noise: Array2<f32> = Array2::random_using(mean.raw_dim(), StandardNormal, rng);
        Ok(self.reparameterize(mean, log_std, noise.view()))
    }

    /// Deterministic core of [`get_action_logprob`](Self::get_action_logprob)
    /// given explicit standard-normal `noise` of shape `(batch, action_dim)`.
    pub fn action_logprob_from_noise(
        &self,
        states: ArrayView2<f32>,
        noise: ArrayView2<f32>,
    ) -> Result<(Array2<f32>, Array2<f32>)> {
        let (mean, log_std) = self.forward(states)?;
        if noise.dim() != mean.dim() {
            return Err(NetError::dimension_mismatch(
                format!("{:?} noise", mean.dim()),
                format!("{:?} noise", noise.dim()),
            ));
        }
        Ok(self.reparameterize(mean, log_std, noise))
    }

    fn reparameterize(
        &self,
        mean: Array2<f32>,
        log_std: Array2<f32>,
        noise: ArrayView2<f32>,
    ) -> (Array2<f32>, Array2<f32>) {
        let mut a_noise = mean;
        Zip::from(&mut a_noise)
            .and(&log_std)
            .and(&noise)
            .for_each(|m, &ls, &eps| *m += ls.exp() * eps);
        check_tanh_saturation(a_noise.view(), "a_noise");

        let log_prob = squashed_log_prob(log_std.view(), noise, a_noise.view());
        check_finite(log_prob.view(), "log_prob");
        (self.squash(a_noise), log_prob)
    }

    fn squash(&self, mut pre_tanh: Array2<f32>) -> Array2<f32> {
        pre_tanh.mapv_inplace(f32::tanh);
        pre_tanh * &self.action_scale + &self.action_bias
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    pub fn action_scale(&self) -> &Array1<f32> {
        &self.action_scale
    }

    pub fn action_bias(&self) -> &Array1<f32> {
        &self.action_bias
    }

    /// Trunk layers, then the mean head, then the log-std head.
    pub fn layers(&self) -> Vec<&DenseLayer> {
        self.trunk.layers.iter().chain([&self.mean, &self.log_std]).collect()
    }

    pub fn layers_mut(&mut self) -> Vec<&mut DenseLayer> {
        self.trunk
            .layers
            .iter_mut()
            .chain([&mut self.mean, &mut self.log_std])
            .collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.layers().iter().map(|l| l.num_parameters()).sum()
    }
}

/// Per-row sum over action dimensions of
///
/// ```text
/// log_std + ln(sqrt(2 pi)) + 0.5 * noise^2 + 2 * (ln 2 - a_noise - softplus(-2 * a_noise))
/// ```
///
/// The first three terms are `-ln N(a_noise; mean, std)`; the last is
/// `ln(1 - tanh(a_noise)^2)` in a form that stays finite at saturation.
/// The result is therefore the negated log-density of the squashed action.
pub fn squashed_log_prob(
    log_std: ArrayView2<f32>,
    noise: ArrayView2<f32>,
    a_noise: ArrayView2<f32>,
) -> Array2<f32> {
    let mut terms = Array2::zeros(log_std.raw_dim());
    Zip::from(&mut terms)
        .and(&log_std)
        .and(&noise)
        .and(&a_noise)
        .for_each(|t, &ls, &eps, &a| {
            let gaussian = ls + LN_SQRT_2PI + 0.5 * eps * eps;
            let tanh_jacobian = 2.0 * (std::f32::consts::LN_2 - a - softplus(-2.0 * a));
            *t = gaussian + tanh_jacobian;
        });
    terms.sum_axis(Axis(1)).insert_axis(Axis(1))
}
