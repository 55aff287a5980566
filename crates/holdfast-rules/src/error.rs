//! Error types for the holdfast-rules crate.

/// Errors from parsing dice expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// The expression is not of the form `NdM` with `1 <= N <= 100` and
    /// `1 <= M <= 1000`.
    #[error("invalid dice expression: {expression:?}")]
    InvalidExpression {
        /// The rejected input.
        expression: String,
    },
}

/// Errors from loading a facility and material catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The YAML document could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yml::Error),

    /// Two entries share a key.
    #[error("duplicate catalog key: {key}")]
    DuplicateKey {
        /// The duplicated key.
        key: String,
    },

    /// An entry is internally inconsistent.
    #[error("invalid catalog entry {key}: {reason}")]
    InvalidEntry {
        /// Key of the offending entry.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}
