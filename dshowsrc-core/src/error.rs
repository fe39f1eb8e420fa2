use thiserror::Error;

#[derive(Error, Debug)]
pub enum DshowError {
    /// A COM call returned a failure HRESULT.
    #[error("COM call failed: {0}")]
    Com(String),

    #[error("No pin with the requested direction")]
    NoMatchingPin,

    #[error("Stream capability query returned no media type")]
    NullMediaType,

    #[error("Format negotiation failed: media type not supported")]
    FormatNotSupported,
}

pub type Result<T> = std::result::Result<T, DshowError>;
