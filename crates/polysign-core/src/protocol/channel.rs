//! Byte channel and line control abstractions
//!
//! [`SignChannel`] is what a session talks through. [`LineControl`] is the
//! extra capability of a channel whose line parameters must be set up for
//! the sign and put back afterwards; [`LineGuard`] does the putting back.

use serialport::{DataBits, FlowControl, Parity, StopBits};
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use super::SignError;

/// Abstraction for the duplex byte link to a sign
pub trait SignChannel: Write + Send {
    /// Read a single byte, giving up after `timeout`.
    ///
    /// Returns `Ok(None)` when the deadline passes without data.
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

impl<T: SignChannel + ?Sized> SignChannel for Box<T> {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        (**self).read_byte(timeout)
    }
}

impl<T: SignChannel + ?Sized> SignChannel for &mut T {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        (**self).read_byte(timeout)
    }
}

/// Serial line parameters, as saved before talking to the sign
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSettings {
    /// Line speed in bits per second
    pub baud_rate: u32,
    /// Bits per character
    pub data_bits: DataBits,
    /// Parity checking mode
    pub parity: Parity,
    /// Stop bits per character
    pub stop_bits: StopBits,
    /// Hardware or software handshaking
    pub flow_control: FlowControl,
}

impl LineSettings {
    /// Raw line expected by the sign: 8 data bits, no parity, 2 stop bits
    pub fn for_sign(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::Two,
            flow_control: FlowControl::None,
        }
    }
}

/// Configure and restore the parameters of the underlying line
pub trait LineControl {
    /// Read the settings currently in effect
    fn settings(&mut self) -> Result<LineSettings, SignError>;

    /// Write `settings` to the line. May fail after some fields were written.
    fn apply(&mut self, settings: &LineSettings) -> Result<(), SignError>;

    /// Let the line settle after reconfiguration
    fn settle(&mut self) -> Result<(), SignError> {
        Ok(())
    }

    /// Switch the line to the sign's settings, returning the previous ones.
    ///
    /// If any step fails the previous settings are written back before the
    /// error is returned, so a failed configure leaves the line as it was.
    fn configure(&mut self, baud_rate: u32) -> Result<LineSettings, SignError> {
        let prior = self.settings()?;

        let outcome = self
            .apply(&LineSettings::for_sign(baud_rate))
            .and_then(|()| self.settle());

        if let Err(e) = outcome {
            if let Err(rollback) = self.apply(&prior) {
                tracing::warn!("failed to roll back serial line settings: {}", rollback);
            }
            return Err(e);
        }

        Ok(prior)
    }

    /// Put back settings previously returned by [`LineControl::configure`]
    fn restore(&mut self, prior: &LineSettings) -> Result<(), SignError> {
        self.apply(prior)?;
        tracing::debug!(?prior, "serial line settings restored");
        Ok(())
    }
}

/// Owns a configured channel and restores its line settings when dropped
pub struct LineGuard<C: LineControl> {
    inner: C,
    prior: Option<LineSettings>,
}

impl<C: LineControl> LineGuard<C> {
    /// Configure `inner` for the sign at `baud_rate`
    pub fn new(mut inner: C, baud_rate: u32) -> Result<Self, SignError> {
        let prior = inner.configure(baud_rate)?;
        tracing::debug!(?prior, baud_rate, "line configured for sign");
        Ok(Self {
            inner,
            prior: Some(prior),
        })
    }

    /// Settings that will be restored, if not restored yet
    pub fn prior_settings(&self) -> Option<&LineSettings> {
        self.prior.as_ref()
    }

    /// Restore the line now, reporting any failure
    pub fn release(mut self) -> Result<(), SignError> {
        match self.prior.take() {
            Some(prior) => self.inner.restore(&prior),
            None => Ok(()),
        }
    }
}

impl<C: LineControl> Deref for LineGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: LineControl> DerefMut for LineGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: LineControl> Drop for LineGuard<C> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            if let Err(e) = self.inner.restore(&prior) {
                tracing::warn!("failed to restore serial line settings: {}", e);
            }
        }
    }
}

impl<C: LineControl + Write> Write for LineGuard<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<C: LineControl + SignChannel> SignChannel for LineGuard<C> {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        self.inner.read_byte(timeout)
    }
}
