//! Serializable construction configs.
//!
//! Each config carries the constructor arguments of one network, fluent
//! setters in the builder style, JSON loading, and a `build` that seeds a
//! `StdRng` from `seed` (or from entropy when unset).

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{ensure_hidden_widths, ensure_positive, Result};
use crate::networks::{
    ActionBounds, DuelingValueHead, GaussianPolicyHead, ParameterProposalNetwork, ValueParamEncoder,
};

const DEFAULT_HIDDEN: [usize; 3] = [256, 128, 64];

fn default_hidden() -> Vec<usize> {
    DEFAULT_HIDDEN.to_vec()
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Parse a config from a JSON string.
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON config file.
pub fn from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let data = fs::read_to_string(path)?;
    from_json_str(&data)
}

/// Config for a standalone [`ValueParamEncoder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub state_dim: usize,
    pub param_dim: usize,
    #[serde(default = "default_hidden")]
    pub hidden_layers: Vec<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EncoderConfig {
    pub fn new(state_dim: usize, param_dim: usize) -> Self {
        EncoderConfig {
            state_dim,
            param_dim,
            hidden_layers: default_hidden(),
            seed: None,
        }
    }

    pub fn hidden_layers(mut self, sizes: Vec<usize>) -> Self {
        self.hidden_layers = sizes;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("state_dim", self.state_dim)?;
        ensure_positive("param_dim", self.param_dim)?;
        ensure_hidden_widths("hidden_layers", &self.hidden_layers)
    }

    pub fn build(&self) -> Result<ValueParamEncoder> {
        self.validate()?;
        ValueParamEncoder::new(self.state_dim, self.param_dim, &self.hidden_layers, &mut rng_for(self.seed))
    }
}

/// Dueling branch wiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DuelingTopology {
    /// One trunk over `state_dim + action_dim`.
    #[default]
    Shared,
    /// Separate trunks over `state_dim + param_state_dim`.
    Independent {
        param_state_dim: usize,
        advantage_layers: Vec<usize>,
        value_layers: Vec<usize>,
    },
}

/// Config for a [`DuelingValueHead`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelingConfig {
    pub state_dim: usize,
    pub action_dim: usize,
    /// Trunk widths for the shared topology.
    #[serde(default = "default_hidden")]
    pub hidden_layers: Vec<usize>,
    #[serde(default)]
    pub topology: DuelingTopology,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DuelingConfig {
    pub fn new(state_dim: usize, action_dim: usize) -> Self {
        DuelingConfig {
            state_dim,
            action_dim,
            hidden_layers: default_hidden(),
            topology: DuelingTopology::Shared,
            seed: None,
        }
    }

    pub fn hidden_layers(mut self, sizes: Vec<usize>) -> Self {
        self.hidden_layers = sizes;
        self
    }

    /// Switch to independent advantage/value trunks.
    pub fn independent(mut self, param_state_dim: usize, advantage_layers: Vec<usize>, value_layers: Vec<usize>) -> Self {
        self.topology = DuelingTopology::Independent {
            param_state_dim,
            advantage_layers,
            value_layers,
        };
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("state_dim", self.state_dim)?;
        ensure_positive("action_dim", self.action_dim)?;
        match &self.topology {
            DuelingTopology::Shared => ensure_hidden_widths("hidden_layers", &self.hidden_layers),
            DuelingTopology::Independent {
                param_state_dim,
                advantage_layers,
                value_layers,
            } => {
                ensure_positive("param_state_dim", *param_state_dim)?;
                ensure_hidden_widths("advantage_layers", advantage_layers)?;
                ensure_hidden_widths("value_layers", value_layers)
            }
        }
    }

    pub fn build(&self) -> Result<DuelingValueHead> {
        self.validate()?;
        let mut rng = rng_for(self.seed);
        match &self.topology {
            DuelingTopology::Shared => {
                DuelingValueHead::shared(self.state_dim, self.action_dim, &self.hidden_layers, &mut rng)
            }
            DuelingTopology::Independent {
                param_state_dim,
                advantage_layers,
                value_layers,
            } => DuelingValueHead::independent(
                self.state_dim,
                self.action_dim,
                *param_state_dim,
                advantage_layers,
                value_layers,
                &mut rng,
            ),
        }
    }
}

/// Config for a [`GaussianPolicyHead`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub state_dim: usize,
    pub action_dim: usize,
    #[serde(default = "default_hidden")]
    pub hidden_layers: Vec<usize>,
    #[serde(default)]
    pub action_bounds: Option<ActionBounds>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PolicyConfig {
    pub fn new(state_dim: usize, action_dim: usize) -> Self {
        PolicyConfig {
            state_dim,
            action_dim,
            hidden_layers: default_hidden(),
            action_bounds: None,
            seed: None,
        }
    }

    pub fn hidden_layers(mut self, sizes: Vec<usize>) -> Self {
        self.hidden_layers = sizes;
        self
    }

    pub fn action_bounds(mut self, bounds: ActionBounds) -> Self {
        self.action_bounds = Some(bounds);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("state_dim", self.state_dim)?;
        ensure_positive("action_dim", self.action_dim)?;
        ensure_hidden_widths("hidden_layers", &self.hidden_layers)?;
        if let Some(bounds) = &self.action_bounds {
            bounds.scale_and_bias(self.action_dim)?;
        }
        Ok(())
    }

    pub fn build(&self) -> Result<GaussianPolicyHead> {
        self.validate()?;
        GaussianPolicyHead::new(
            self.state_dim,
            self.action_dim,
            &self.hidden_layers,
            self.action_bounds.as_ref(),
            &mut rng_for(self.seed),
        )
    }
}

/// Config for a [`ParameterProposalNetwork`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamNetConfig {
    pub state_dim: usize,
    pub param_dim: usize,
    #[serde(default = "default_hidden")]
    pub hidden_layers: Vec<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ParamNetConfig {
    pub fn new(state_dim: usize, param_dim: usize) -> Self {
        ParamNetConfig {
            state_dim,
            param_dim,
            hidden_layers: default_hidden(),
            seed: None,
        }
    }

    pub fn hidden_layers(mut self, sizes: Vec<usize>) -> Self {
        self.hidden_layers = sizes;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("state_dim", self.state_dim)?;
        ensure_positive("param_dim", self.param_dim)?;
        ensure_hidden_widths("hidden_layers", &self.hidden_layers)
    }

    pub fn build(&self) -> Result<ParameterProposalNetwork> {
        self.validate()?;
        ParameterProposalNetwork::new(self.state_dim, self.param_dim, &self.hidden_layers, &mut rng_for(self.seed))
    }
}
