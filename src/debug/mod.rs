//! Debugging utilities for spotting numeric trouble in network outputs and
//! parameters. Findings are emitted as `tracing` warnings and returned to the
//! caller; none of them is fatal.

pub mod numerical_check;

pub use numerical_check::{
    check_clamped, check_finite, check_parameters, check_tanh_saturation, NumericalIssue,
};
