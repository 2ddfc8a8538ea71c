//! Errors raised while building, parsing, or querying a jobspec.

/// Represents an error from the jobspec model.
#[derive(Debug, thiserror::Error)]
pub enum JobSpecError {
    /// A duration string or value was malformed or out of range.
    #[error("invalid Flux standard duration `{0}`")]
    InvalidDuration(String),

    /// A resource node was constructed with invalid arguments.
    #[error("invalid resource: {0}")]
    InvalidResourceSpec(String),

    /// A versioned builder was given invalid parameters.
    #[error("invalid jobspec parameters: {0}")]
    InvalidJobSpecParameters(String),

    /// A parsed jobspec is missing required fields.
    #[error("malformed jobspec: {0}")]
    MalformedJobSpec(String),

    /// An attribute path walks through an existing value that is not a
    /// mapping.
    #[error("cannot set attribute `{path}`: `{conflict}` is not a mapping")]
    AttributeConflict {
        /// The full dotted path being written.
        path: String,
        /// The prefix of the path that holds a non-mapping value.
        conflict: String,
    },

    /// An attribute path was empty or contained an empty segment.
    #[error("invalid attribute path `{0}`")]
    InvalidAttributePath(String),

    /// The jobspec text could not be parsed.
    #[error("failed to parse jobspec: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// The jobspec text was well formed but did not describe a jobspec.
    #[error("invalid jobspec: {0}")]
    Decode(#[source] serde_json::Error),

    /// The jobspec could not be serialized.
    #[error("failed to serialize jobspec: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for jobspec operations.
pub type Result<T> = std::result::Result<T, JobSpecError>;
