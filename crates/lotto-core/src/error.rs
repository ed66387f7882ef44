use thiserror::Error;

pub type Result<T> = std::result::Result<T, LottoError>;

#[derive(Debug, Error)]
pub enum LottoError {
    #[error("Invalid range")]
    InvalidRange,

    #[error("Invalid range (max {max_span} draws)")]
    RangeTooWide { max_span: u32 },

    #[error("Invalid round number")]
    InvalidRound,

    #[error("Invalid number (must be 1-45)")]
    InvalidNumber,

    #[error("Invalid draw: {reason}")]
    InvalidDraw { reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl LottoError {
    /// Whether the error was caused by caller input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange
                | Self::RangeTooWide { .. }
                | Self::InvalidRound
                | Self::InvalidNumber
        )
    }
}
