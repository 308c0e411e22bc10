//! # pamdp-nets - Function Approximators for Parameterized Action Spaces
//!
//! Forward-evaluation networks for agents whose actions are a discrete choice
//! plus continuous parameters. Training, replay and optimizers live outside
//! this crate; the networks expose their layers so an external optimizer can
//! update them.
//!
//! ## Key Features
//!
//! - **Dueling Q-values**: `Q = V + A - mean(A)` over a shared trunk or
//!   independent advantage/value trunks
//! - **Squashed Gaussian policy**: reparameterized sampling with a
//!   softplus-stabilized tanh log-probability correction
//! - **Parameter proposals**: state to parameters bounded in `(5, 15)`
//! - **Explicit randomness**: every constructor and sampler takes a caller-owned `Rng`
//!
//! ## Quick Start
//!
//! ```rust
//! use pamdp_nets::config::PolicyConfig;
//! use pamdp_nets::networks::ActionBounds;
//! use ndarray::Array2;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let policy = PolicyConfig::new(4, 2)
//!     .hidden_layers(vec![64, 32])
//!     .action_bounds(ActionBounds::symmetric(2, 2.0))
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let states = Array2::zeros((8, 4));
//! let (actions, log_prob) = policy.get_action_logprob(states.view(), &mut rng).unwrap();
//! assert_eq!(actions.shape(), [8, 2]);
//! assert_eq!(log_prob.shape(), [8, 1]);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation tags and stable scalar functions
//! - [`config`] - Serializable network configs with fluent setters
//! - [`debug`] - Numeric-instability checks
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layer, layer trait, weight initialization
//! - [`logging`] - `tracing` subscriber setup
//! - [`network`] - Ordered layer stacks
//! - [`networks`] - Dueling, policy and parameter networks

pub mod activations;
pub mod config;
pub mod debug;
pub mod error;
pub mod layers;
pub mod logging;
pub mod network;
pub mod networks;

pub use error::{NetError, Result};

#[cfg(test)]
mod tests;
