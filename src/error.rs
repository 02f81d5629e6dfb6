use thiserror::Error;

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the clustering core.
///
/// All variants are produced by up-front validation; once an algorithm
/// starts iterating it cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A scalar argument violated its documented constraint.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The observation matrix has zero rows or zero columns.
    #[error("observation matrix must contain at least one sample and one feature")]
    EmptyInput,

    /// A row passed to `ObservationMatrix::from_rows` has the wrong width.
    #[error("row {row} has {actual} features, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// The observation matrix contains a NaN or infinite value.
    #[error("non-finite value at row {row}, column {col}")]
    NonFinite { row: usize, col: usize },
}

impl Error {
    /// Build an `InvalidArgument` error for the named argument.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message_names_the_argument() {
        let err = Error::invalid_argument("k", "must be at least 1");
        assert_eq!(err.to_string(), "invalid argument `k`: must be at least 1");
    }

    #[test]
    fn test_non_finite_reports_position() {
        let err = Error::NonFinite { row: 3, col: 1 };
        assert_eq!(err.to_string(), "non-finite value at row 3, column 1");
    }
}
