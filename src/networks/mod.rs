//! # Function Approximators
//!
//! The networks an agent with a parameterized (discrete action plus
//! continuous parameters) action space consumes:
//!
//! - [`ValueParamEncoder`] - ReLU trunk over `[state, action_params]`
//! - [`DuelingValueHead`] - `Q = V + A - mean(A)`, shared or independent trunks
//! - [`GaussianPolicyHead`] - tanh-squashed Gaussian with reparameterized sampling
//! - [`ParameterProposalNetwork`] - state to parameters bounded in `(5, 15)`
//!
//! All evaluation takes `&self`; sampling draws from the `Rng` the caller
//! passes in.
//!
//! ```rust
//! use pamdp_nets::networks::DuelingValueHead;
//! use ndarray::Array2;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let net = DuelingValueHead::shared(3, 2, &[8, 4], &mut rng).unwrap();
//! let q = net.forward(Array2::zeros((5, 3)).view(), Array2::zeros((5, 2)).view()).unwrap();
//! assert_eq!(q.shape(), [5, 2]);
//! ```

pub mod dueling;
pub mod encoder;
pub mod gaussian_policy;
pub mod param_net;

pub use dueling::{combine, DuelingBranches, DuelingOutput, DuelingValueHead};
pub use encoder::{concat_features, ValueParamEncoder};
pub use gaussian_policy::{squashed_log_prob, ActionBounds, GaussianPolicyHead, LOG_STD_MAX, LOG_STD_MIN};
pub use param_net::{ParameterProposalNetwork, PARAM_LOW, PARAM_RANGE};
