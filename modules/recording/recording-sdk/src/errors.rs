use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MedicalError {
    #[error("Audio file is empty")]
    EmptyAudio,

    #[error("Unsupported audio type: {0}")]
    UnsupportedMedia(String),

    #[error("Medical API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Medical API unreachable: {0}")]
    Transport(String),

    #[error("Unexpected response from medical API: {0}")]
    InvalidResponse(String),
}
