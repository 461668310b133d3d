use thiserror::Error;

/// Unified error type for every AirSkill stage.
///
/// None of these are recovered from: build, ingest and discover abort the run
/// on the first error and report it to the operator.
#[derive(Error, Debug)]
pub enum AirskillError {
    // ── Operator setup ─────────────────────────────────────────
    /// A required setting (usually an API key) is missing.
    #[error("config error: {0}")]
    Config(String),

    /// The configured generation provider is not compiled into this build.
    #[error("dependency unavailable: {0}")]
    Dependency(String),

    // ── Generation service ─────────────────────────────────────
    #[error("llm provider error: {0}")]
    LlmProvider(String),

    /// The provider answered, but with nothing usable.
    #[error("generation failed: {0}")]
    Generation(String),

    // ── Content ────────────────────────────────────────────────
    /// A generation response did not follow the expected block format.
    #[error("structural error: {message}")]
    Structural { message: String, excerpt: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("template error: {0}")]
    Template(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AirskillError {
    /// Wrap an IO error with the path it happened on.
    pub fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        AirskillError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    }
}

pub type Result<T> = std::result::Result<T, AirskillError>;
