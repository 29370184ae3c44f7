//! Sign Protocol
//!
//! Implements the framed, XOR-checksummed serial protocol spoken by
//! PolyComp-style LED message signs.
//!
//! Every frame is acknowledged by the sign with a single `ACK` byte.

pub mod ack;
pub mod channel;
mod error;
pub mod flags;
mod frame;
pub mod markup;
pub mod page;
pub mod script;
pub mod serial;
mod sign;

pub use ack::await_ack;
pub use channel::{LineControl, LineGuard, LineSettings, SignChannel};
pub use error::{SignError, ValidationError};
pub use frame::{xor_checksum, Frame};
pub use markup::{visible_len, Markup};
pub use page::{
    compose_clock_set, compose_page, PageLayout, PageLine, PageOptions, PageRequest, Transition,
};
pub use script::PageScript;
pub use serial::{list_ports, open_port, PortInfo, SerialChannel};
pub use sign::{Sign, SignConfig};

use std::time::Duration;

/// Default baud rate of the sign's serial interface
pub const DEFAULT_BAUD_RATE: u32 = 1200;

/// Broadcast address; every sign on the line accepts frames sent here
pub const BROADCAST_ADDRESS: u8 = 0;

/// Default number of physical display lines
pub const DEFAULT_LINES: u8 = 2;

/// Default number of visible characters per line
pub const DEFAULT_WIDTH: usize = 16;

/// First byte of every frame
pub const HEADER_START: u8 = 0x00;

/// Terminates the frame header (after line count and address)
pub const HEADER_END: u8 = 0x03;

/// Terminates the frame content; the checksum byte follows
pub const END_OF_TEXT: u8 = 0x04;

/// Byte sent back by the sign after accepting a frame
pub const ACK: u8 = 0x06;

/// How long to wait for the sign's acknowledgment
pub const ACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay after reconfiguring the line before the first write
pub const LINE_SETTLE_TIME: Duration = Duration::from_millis(500);
