//! Acknowledgment handling

use std::time::Duration;

use super::{SignChannel, SignError, ACK};

/// Block until the sign acknowledges the last frame.
///
/// Reads exactly one byte. Anything other than [`ACK`] is an error, as is
/// silence for longer than `timeout`.
pub fn await_ack<C: SignChannel + ?Sized>(
    channel: &mut C,
    timeout: Duration,
) -> Result<(), SignError> {
    match channel.read_byte(timeout)? {
        Some(ACK) => {
            tracing::trace!("ACK received");
            Ok(())
        }
        Some(byte) => Err(SignError::UnexpectedAck(byte)),
        None => Err(SignError::AckTimeout { timeout }),
    }
}
