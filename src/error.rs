use std::error::Error as StdError;
use std::fmt;

/// Result type alias used throughout the reflection/diffusion core.
pub type ReverbResult<T> = Result<T, ReverbError>;

/// Error taxonomy for the acoustic core.
///
/// The core has no recoverable error class in the sense of retryable I/O:
/// every external call either returns a value or an empty option. What
/// remains are programmer/configuration errors (caught at construction
/// time) and malformed-input rejections (caught at the audio boundary).
#[derive(Debug, Clone, PartialEq)]
pub enum ReverbError {
    /// `AcousticParameters` failed validation (absorption/diffusion split,
    /// non-positive `msPerMeter`, ...). Rejected at parameter-set time,
    /// never clamped silently.
    InvalidParameters { reason: String },

    /// An inbound audio batch's byte length was not a multiple of
    /// `channels * sizeof(i16)`. The batch is rejected wholesale; no
    /// partial mix is ever submitted.
    MalformedAudioBatch { expected_multiple_of: usize, actual_len: usize },
}

impl fmt::Display for ReverbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReverbError::InvalidParameters { reason } => {
                write!(f, "invalid acoustic parameters: {}", reason)
            }
            ReverbError::MalformedAudioBatch { expected_multiple_of, actual_len } => {
                write!(
                    f,
                    "malformed audio batch: length {} is not a multiple of {}",
                    actual_len, expected_multiple_of
                )
            }
        }
    }
}

impl StdError for ReverbError {}
