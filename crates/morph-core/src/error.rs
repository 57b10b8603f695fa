use thiserror::Error;

/// Errors raised while building a morph engine from configuration.
///
/// Per-frame work never returns these; bad runtime signals are clamped or
/// ignored instead.
#[derive(Debug, Error)]
pub enum MorphError {
    #[error("shape list is empty")]
    EmptyShapeList,

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("sphere resolution {width}x{height} is below the 3x2 minimum")]
    MeshResolution { width: u32, height: u32 },

    #[error("step index {index} out of range for {len} shapes")]
    StepOutOfRange { index: usize, len: usize },

    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MorphError>;

impl MorphError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
