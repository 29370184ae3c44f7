//! # polysign Core Library
//!
//! Drives PolyComp-style LED message signs over a serial line.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Frame encoding with the sign's XOR checksum
//! - Page layout (padding, centering, joined lines, transitions)
//! - Clock-set commands
//! - A blocking session that waits for the sign's acknowledgment
//! - Serial line setup that is undone when the session ends
//!
//! ## Example
//!
//! ```rust,no_run
//! use polysign_core::protocol::{Markup, PageOptions, PageRequest, Sign, SignConfig};
//!
//! # fn main() -> Result<(), polysign_core::protocol::SignError> {
//! let mut sign = Sign::open("/dev/ttyS0", SignConfig::default())?;
//!
//! sign.page(&PageRequest::two_lines("HELLO", "WORLD").with_options(PageOptions {
//!     center: true,
//!     duration: 4,
//!     ..Default::default()
//! }))?;
//!
//! let fancy = format!("THIS IS {}BOLD{}", Markup::Bold, Markup::Default);
//! sign.page(&PageRequest::new(fancy.as_str()).with_options(PageOptions {
//!     last: true,
//!     ..Default::default()
//! }))?;
//! # Ok(())
//! # }
//! ```

pub mod protocol;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::protocol::{
        Markup, PageLine, PageOptions, PageRequest, PageScript, Sign, SignConfig, SignError,
        Transition,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
