//! Serial port handling
//!
//! Provides the serial port implementation of [`SignChannel`] and
//! [`LineControl`], plus port enumeration.

use serialport::{SerialPort, SerialPortInfo, SerialPortType};
use std::collections::HashMap;
#[cfg(target_os = "linux")]
use std::fs;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use super::channel::{LineControl, LineSettings, SignChannel};
use super::{SignError, ACK_TIMEOUT, DEFAULT_BAUD_RATE, LINE_SETTLE_TIME};

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g., "/dev/ttyS0" or "COM1")
    pub name: String,

    /// USB vendor ID (if USB adapter)
    pub vid: Option<u16>,

    /// USB product ID (if USB adapter)
    pub pid: Option<u16>,

    /// Product name (if available)
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (vid, pid, product) = match info.port_type {
            SerialPortType::UsbPort(usb_info) => {
                (Some(usb_info.vid), Some(usb_info.pid), usb_info.product)
            }
            _ => (None, None, None),
        };

        Self {
            name: info.port_name,
            vid,
            pid,
            product,
        }
    }
}

/// Sort key putting USB adapters first, then on-board UARTs, each
/// numerically by suffix, then everything else by name
fn port_sort_key(name: &str) -> (u8, usize, String) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    for (rank, prefix) in ["ttyUSB", "ttyACM", "ttyS"].into_iter().enumerate() {
        if let Some(rest) = basename.strip_prefix(prefix) {
            let num = rest.parse::<usize>().unwrap_or(usize::MAX);
            return (rank as u8, num, basename.to_string());
        }
    }
    (3, 0, basename.to_string())
}

/// List available serial ports with deterministic ordering
pub fn list_ports() -> Vec<PortInfo> {
    let mut map: HashMap<String, PortInfo> = HashMap::new();
    for info in serialport::available_ports().unwrap_or_default() {
        let p = PortInfo::from(info);
        map.entry(p.name.clone()).or_insert(p);
    }

    // USB adapters sometimes exist in /dev before udev reports them
    #[cfg(target_os = "linux")]
    if let Ok(entries) = fs::read_dir("/dev") {
        for entry in entries.flatten() {
            if let Some(fname) = entry.file_name().to_str() {
                if fname.starts_with("ttyUSB") || fname.starts_with("ttyACM") {
                    let full = format!("/dev/{}", fname);
                    map.entry(full.clone()).or_insert_with(|| PortInfo {
                        name: full,
                        vid: None,
                        pid: None,
                        product: None,
                    });
                }
            }
        }
    }

    let mut v: Vec<PortInfo> = map.into_values().collect();
    v.sort_by_key(|p| port_sort_key(&p.name));
    v
}

/// Open a serial port for a sign
pub fn open_port(name: &str, baud_rate: Option<u32>) -> Result<SerialChannel, SignError> {
    let baud = baud_rate.unwrap_or(DEFAULT_BAUD_RATE);
    let port = serialport::new(name, baud).timeout(ACK_TIMEOUT).open()?;
    tracing::debug!(port = name, baud, "serial port opened");
    Ok(SerialChannel::new(port))
}

/// Serial port wrapper implementing [`SignChannel`] and [`LineControl`]
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Wrap an already opened port
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Name of the underlying port, if known
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl Write for SerialChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl SignChannel for SerialChannel {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; 1];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            self.port.set_timeout(remaining)?;

            match self.port.read(&mut buf) {
                Ok(0) => continue,
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(None),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl LineControl for SerialChannel {
    fn settings(&mut self) -> Result<LineSettings, SignError> {
        Ok(LineSettings {
            baud_rate: self.port.baud_rate()?,
            data_bits: self.port.data_bits()?,
            parity: self.port.parity()?,
            stop_bits: self.port.stop_bits()?,
            flow_control: self.port.flow_control()?,
        })
    }

    fn apply(&mut self, settings: &LineSettings) -> Result<(), SignError> {
        self.port.set_baud_rate(settings.baud_rate)?;
        self.port.set_data_bits(settings.data_bits)?;
        self.port.set_parity(settings.parity)?;
        self.port.set_stop_bits(settings.stop_bits)?;
        self.port.set_flow_control(settings.flow_control)?;
        Ok(())
    }

    fn settle(&mut self) -> Result<(), SignError> {
        // Stale input would be mistaken for an acknowledgment
        self.port.clear(serialport::ClearBuffer::All)?;
        std::thread::sleep(LINE_SETTLE_TIME);
        Ok(())
    }
}
