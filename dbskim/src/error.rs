//! Error types for dbskim.

use thiserror::Error;

/// Result type for dbskim operations.
pub type Result<T> = std::result::Result<T, SkimError>;

/// Errors that abort a summarization run.
///
/// Per-item failures (a single column's statistics query, a single table's
/// exact count) are not errors at this level; they degrade to an
/// unavailable/unknown display value and the run continues.
#[derive(Debug, Error)]
pub enum SkimError {
    /// Could not establish the database connection.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// A catalog enumeration query failed. The catalog is the source of
    /// truth for the whole run, so this is always fatal.
    #[error("catalog query failed: {0}")]
    Catalog(#[source] sqlx::Error),

    /// Invalid connection settings or CLI options.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The run was interrupted before output was produced.
    #[error("interrupted")]
    Interrupted,
}

impl SkimError {
    /// Creates a configuration error with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = SkimError::configuration("DATABASE_URL is not a valid URL");
        assert!(err.to_string().contains("DATABASE_URL is not a valid URL"));
    }
}
