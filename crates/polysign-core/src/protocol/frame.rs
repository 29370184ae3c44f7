//! Frame encoding/decoding
//!
//! Frame format:
//! - 1 byte: start marker (`0x00`)
//! - 1 byte: number of display lines
//! - 1 byte: sign address (0 = broadcast)
//! - 1 byte: header end (`0x03`)
//! - N bytes: content, inserted verbatim (no byte stuffing)
//! - 1 byte: end of text (`0x04`)
//! - 1 byte: XOR of every preceding byte

use super::{SignError, END_OF_TEXT, HEADER_END, HEADER_START};

/// Header and trailer bytes around the content
const OVERHEAD: usize = 6;

/// A protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Number of display lines on the sign
    pub lines: u8,
    /// Target sign address
    pub address: u8,
    /// Page or clock-set content
    pub content: Vec<u8>,
}

impl Frame {
    /// Create a new frame around the given content
    pub fn new(lines: u8, address: u8, content: Vec<u8>) -> Self {
        Self {
            lines,
            address,
            content,
        }
    }

    /// Decode a frame from raw bytes, verifying markers and checksum
    pub fn from_bytes(data: &[u8]) -> Result<Self, SignError> {
        if data.len() < OVERHEAD {
            return Err(SignError::MalformedFrame(format!(
                "{} bytes is shorter than the {} byte minimum",
                data.len(),
                OVERHEAD
            )));
        }

        if data[0] != HEADER_START || data[3] != HEADER_END {
            return Err(SignError::MalformedFrame("bad header".to_string()));
        }

        let (body, checksum) = data.split_at(data.len() - 1);
        if body[body.len() - 1] != END_OF_TEXT {
            return Err(SignError::MalformedFrame("missing end of text".to_string()));
        }

        let frame = Self {
            lines: data[1],
            address: data[2],
            content: body[4..body.len() - 1].to_vec(),
        };

        let expected = frame.checksum();
        if checksum[0] != expected {
            return Err(SignError::ChecksumMismatch {
                expected,
                actual: checksum[0],
            });
        }

        Ok(frame)
    }

    /// Encode the frame to raw bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_size());

        bytes.push(HEADER_START);
        bytes.push(self.lines);
        bytes.push(self.address);
        bytes.push(HEADER_END);
        bytes.extend_from_slice(&self.content);
        bytes.push(END_OF_TEXT);

        let checksum = xor_checksum(&bytes);
        bytes.push(checksum);

        bytes
    }

    /// Checksum byte this frame will carry
    pub fn checksum(&self) -> u8 {
        let header = HEADER_START ^ self.lines ^ self.address ^ HEADER_END;
        header ^ xor_checksum(&self.content) ^ END_OF_TEXT
    }

    /// Get the total encoded size
    pub fn encoded_size(&self) -> usize {
        self.content.len() + OVERHEAD
    }
}

/// Running XOR of all bytes
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}
