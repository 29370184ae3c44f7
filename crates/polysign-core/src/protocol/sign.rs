//! Sign session
//!
//! Owns the channel to one sign, keeps the running page number and
//! sequences clock-set and page frames.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::{
    await_ack, compose_clock_set, compose_page,
    serial::{open_port, SerialChannel},
    Frame, LineGuard, PageLayout, PageRequest, SignChannel, SignError, ACK_TIMEOUT,
    BROADCAST_ADDRESS, DEFAULT_BAUD_RATE, DEFAULT_LINES, DEFAULT_WIDTH,
};

/// Largest page number that fits the 3-digit field
const MAX_PAGE_NUMBER: u16 = 999;

/// Sign configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignConfig {
    /// Sign address on a shared line (0 = broadcast)
    pub address: u8,
    /// Number of physical display lines
    pub lines: u8,
    /// Visible characters per line
    pub width: usize,
    /// Joined lines longer than this scroll; `None` means half the width
    pub joined_width: Option<usize>,
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            address: BROADCAST_ADDRESS,
            lines: DEFAULT_LINES,
            width: DEFAULT_WIDTH,
            joined_width: None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

impl SignConfig {
    /// Effective joined-line threshold
    pub fn joined_width(&self) -> usize {
        self.joined_width.unwrap_or(self.width / 2)
    }

    /// Display geometry for page layout
    pub fn layout(&self) -> PageLayout {
        PageLayout {
            width: self.width,
            joined_width: self.joined_width(),
        }
    }
}

/// An open session with a sign
pub struct Sign<C: SignChannel> {
    /// Exclusively owned link to the sign
    channel: C,
    config: SignConfig,
    /// Number of the next page to send
    page_number: u16,
    tx_bytes: u64,
    tx_frames: u64,
}

impl Sign<LineGuard<SerialChannel>> {
    /// Open a serial port, configure it for the sign and start a session.
    ///
    /// The port's previous line settings are restored when the session is
    /// dropped, including when starting it fails.
    pub fn open(port_name: &str, config: SignConfig) -> Result<Self, SignError> {
        let port = open_port(port_name, Some(config.baud_rate))?;
        let guard = LineGuard::new(port, config.baud_rate)?;
        tracing::info!(port = port_name, baud = config.baud_rate, "sign line ready");
        Self::new(guard, config)
    }
}

impl<C: SignChannel> Sign<C> {
    /// Start a session: reset the page counter and set the sign's clock to
    /// the current local time
    pub fn new(channel: C, config: SignConfig) -> Result<Self, SignError> {
        Self::with_clock(channel, config, Local::now().naive_local())
    }

    /// Start a session, setting the sign's clock to `time`
    pub fn with_clock(
        channel: C,
        config: SignConfig,
        time: NaiveDateTime,
    ) -> Result<Self, SignError> {
        let mut sign = Self {
            channel,
            config,
            page_number: 1,
            tx_bytes: 0,
            tx_frames: 0,
        };
        sign.reset();
        sign.set_clock(time)?;
        Ok(sign)
    }

    /// Restart page numbering at 1
    pub fn reset(&mut self) {
        self.page_number = 1;
    }

    /// Number the next page will be sent with
    pub fn page_number(&self) -> u16 {
        self.page_number
    }

    /// Session configuration
    pub fn config(&self) -> &SignConfig {
        &self.config
    }

    /// Cumulative bytes and frames written
    pub fn counters(&self) -> (u64, u64) {
        (self.tx_bytes, self.tx_frames)
    }

    /// Borrow the underlying channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// End the session, handing back the channel
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Set the sign's clock
    pub fn set_clock(&mut self, time: NaiveDateTime) -> Result<(), SignError> {
        self.transmit(compose_clock_set(&time))?;
        tracing::info!(%time, "sign clock set");
        Ok(())
    }

    /// Set the sign's clock to the current local time
    pub fn set_clock_now(&mut self) -> Result<(), SignError> {
        self.set_clock(Local::now().naive_local())
    }

    /// Send one page and wait for the sign to accept it.
    ///
    /// The page number only advances when the sign acknowledges the page.
    pub fn page(&mut self, request: &PageRequest) -> Result<(), SignError> {
        if self.page_number > MAX_PAGE_NUMBER {
            tracing::warn!(
                page_number = self.page_number,
                "page number no longer fits the 3-digit field"
            );
        }

        let content = compose_page(request, &self.config.layout(), self.page_number)?;
        self.transmit(content)?;

        tracing::debug!(page_number = self.page_number, "page accepted");
        // Pinned at the top rather than wrapping back to a low number
        self.page_number = self.page_number.saturating_add(1);
        Ok(())
    }

    /// Frame `content`, send it and wait for the acknowledgment
    fn transmit(&mut self, content: Vec<u8>) -> Result<(), SignError> {
        let frame = Frame::new(self.config.lines, self.config.address, content);
        let bytes = frame.to_bytes();

        tracing::debug!("sending frame: {:02x?}", bytes);
        self.channel.write_all(&bytes)?;
        self.channel.flush()?;
        self.tx_bytes = self.tx_bytes.saturating_add(bytes.len() as u64);
        self.tx_frames = self.tx_frames.saturating_add(1);

        await_ack(&mut self.channel, ACK_TIMEOUT)
    }
}
