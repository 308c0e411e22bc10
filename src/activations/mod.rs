//! # Activation Functions Module
//!
//! Element-wise nonlinearities attached to dense layers, plus the scalar
//! helpers the policy and parameter heads need.
//!
//! ## Available Activations
//!
//! - **ReLU**: `max(0, x)` - used by every hidden layer
//! - **Linear**: Identity function - used by output heads
//!
//! The parameter head's sigmoid and the policy's softplus are free functions
//! rather than layer activations.
//!
//! ## Usage Example
//!
//! ```rust
//! use pamdp_nets::activations::{Activation, softplus};
//! use ndarray::array;
//!
//! let mut data = array![[1.0f32, -0.5], [0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0f32, 0.0], [0.0, 2.0]]);
//!
//! assert!(softplus(-200.0).is_finite());
//! ```

pub mod functions;

pub use functions::{sigmoid, softplus, Activation};
