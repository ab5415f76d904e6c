use std::fmt::{self, Display};
use std::io;

/// Provides `SisError` and maps to other errors to
/// convert to an `SisError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SisError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    /// The run cannot produce a stationary estimate with this configuration,
    /// e.g. `t_trans >= t_max` or `rep == 0`.
    InvalidConfiguration(String),
    /// A probability parameter lies outside of `[0, 1]`.
    OutOfRangeParameter {
        name: &'static str,
        value: f64,
    },
    UnknownNode(String),
    CannotMakeEdgeToSelf(String),
    ParseError {
        line: usize,
        message: String,
    },
    ReportError(String),
}

impl From<io::Error> for SisError {
    fn from(error: io::Error) -> Self {
        SisError::IoError(error)
    }
}

impl From<serde_json::Error> for SisError {
    fn from(error: serde_json::Error) -> Self {
        SisError::JsonError(error)
    }
}

impl From<csv::Error> for SisError {
    fn from(error: csv::Error) -> Self {
        SisError::CSVError(error)
    }
}

impl std::error::Error for SisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SisError::IoError(error) => Some(error),
            SisError::JsonError(error) => Some(error),
            SisError::CSVError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for SisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SisError::IoError(error) => write!(f, "I/O error: {error}"),
            SisError::JsonError(error) => write!(f, "invalid JSON: {error}"),
            SisError::CSVError(error) => write!(f, "CSV error: {error}"),
            SisError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {message}")
            }
            SisError::OutOfRangeParameter { name, value } => {
                write!(f, "parameter `{name}` must lie in [0, 1], got {value}")
            }
            SisError::UnknownNode(node) => write!(f, "unknown node `{node}`"),
            SisError::CannotMakeEdgeToSelf(node) => {
                write!(f, "node `{node}` cannot be its own neighbor")
            }
            SisError::ParseError { line, message } => {
                write!(f, "parse error on line {line}: {message}")
            }
            SisError::ReportError(message) => write!(f, "report error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_out_of_range_parameter() {
        let error = SisError::OutOfRangeParameter {
            name: "beta",
            value: 1.5,
        };
        assert_eq!(
            error.to_string(),
            "parameter `beta` must lie in [0, 1], got 1.5"
        );
    }

    #[test]
    fn converts_io_errors() {
        let error: SisError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(error, SisError::IoError(_)));
        assert!(std::error::Error::source(&error).is_some());
    }
}
