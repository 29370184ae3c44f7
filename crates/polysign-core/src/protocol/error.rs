//! Protocol errors

use std::time::Duration;
use thiserror::Error;

/// A page request that cannot be laid out on the sign
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `join` was requested on a page that has a second line
    #[error("Cannot join when two lines are given")]
    JoinWithSecondLine,

    /// The time or temperature token was used as line 2
    #[error("Time/temperature not allowed on second line")]
    InvalidSecondLine,

    /// A joined line does not fit and would need to scroll
    #[error("Line 1 is limited to {width} characters (got {length})")]
    LineTooLong {
        /// Characters that fit on the joined line
        width: usize,
        /// Visible characters requested
        length: usize,
    },
}

/// Errors that can occur while talking to a sign
#[derive(Error, Debug)]
pub enum SignError {
    /// The page was rejected before sending
    #[error("Invalid page: {0}")]
    Validation(#[from] ValidationError),

    /// No answer arrived in time
    #[error("Did not receive ACK from the sign within {timeout:?}")]
    AckTimeout {
        /// How long the session waited
        timeout: Duration,
    },

    /// The sign answered with something other than `ACK`
    #[error("Did not receive ACK from the sign (got {0:#04x})")]
    UnexpectedAck(u8),

    /// Bytes that do not form a valid frame
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// The trailing checksum does not match the frame
    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the frame
        expected: u8,
        /// Checksum byte carried by the frame
        actual: u8,
    },

    /// Opening or configuring the serial port failed
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// Reading or writing the channel failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serialport::Error> for SignError {
    fn from(e: serialport::Error) -> Self {
        SignError::SerialError(e.to_string())
    }
}

impl SignError {
    /// True for errors raised before anything was sent to the sign
    pub fn is_validation(&self) -> bool {
        matches!(self, SignError::Validation(_))
    }

    /// True when the sign answered wrongly or not at all
    pub fn is_ack_failure(&self) -> bool {
        matches!(
            self,
            SignError::AckTimeout { .. } | SignError::UnexpectedAck(_)
        )
    }
}
