use thiserror::Error;

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetError>;

/// Main error type for the network modules
#[derive(Error, Debug)]
pub enum NetError {
    /// Invalid construction parameter (dimensions, hidden widths, bounds)
    #[error("Invalid configuration '{name}': {reason}")]
    Configuration {
        name: String,
        reason: String,
    },

    /// Input feature width does not match the configured width
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// IO errors (config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper functions for common error patterns
impl NetError {
    pub fn configuration<S: Into<String>>(name: S, reason: S) -> Self {
        NetError::Configuration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        NetError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl From<ndarray::ShapeError> for NetError {
    fn from(err: ndarray::ShapeError) -> Self {
        NetError::DimensionMismatch {
            expected: "compatible shapes".to_string(),
            actual: err.to_string(),
        }
    }
}

/// Check that a dimension is strictly positive.
pub(crate) fn ensure_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(NetError::configuration(name, "must be greater than zero"));
    }
    Ok(())
}

/// Check a hidden-width sequence: non-empty, every entry positive.
pub(crate) fn ensure_hidden_widths(name: &str, widths: &[usize]) -> Result<()> {
    if widths.is_empty() {
        return Err(NetError::configuration(name, "must contain at least one hidden width"));
    }
    if let Some(pos) = widths.iter().position(|&w| w == 0) {
        return Err(NetError::Configuration {
            name: name.to_string(),
            reason: format!("width at index {} is zero", pos),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NetError::dimension_mismatch("4 input features", "3 input features");
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 4 input features, got 3 input features"
        );

        let err = NetError::configuration("hidden_layers", "must contain at least one hidden width");
        assert!(err.to_string().contains("hidden_layers"));
    }

    #[test]
    fn test_hidden_width_validation() {
        assert!(ensure_hidden_widths("hidden", &[8, 4]).is_ok());
        assert!(matches!(
            ensure_hidden_widths("hidden", &[]),
            Err(NetError::Configuration { .. })
        ));
        assert!(matches!(
            ensure_hidden_widths("hidden", &[8, 0]),
            Err(NetError::Configuration { .. })
        ));
        assert!(ensure_positive("state_dim", 0).is_err());
    }
}
