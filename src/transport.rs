//! Byte channel between the debugger and the device.
//!
//! The core only needs two things from a transport: the bytes that arrived
//! since the last poll, and a way to send the breakpoint acknowledgement.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::io::{self, Read, Write};
use std::time::Duration;

/// Baud rates offered for the device link.
pub const BAUD_RATES: &[u32] = &[
    9600, 19200, 38400, 57600, 74880, 115200, 230400, 250000, 500000, 1000000, 2000000,
];

/// Accept `baud` only if it is one of [`BAUD_RATES`].
pub fn check_baud_rate(baud: u32) -> Result<u32, String> {
    if BAUD_RATES.contains(&baud) {
        Ok(baud)
    } else {
        Err(format!(
            "unsupported baud rate {}, choose one of {:?}",
            baud, BAUD_RATES
        ))
    }
}

/// Trait for abstracting the device link (serial port vs. recorded capture).
pub trait Transport {
    /// Return whatever is available right now, possibly nothing. Must not block
    /// waiting for more data.
    fn read_available(&mut self) -> io::Result<Vec<u8>>;
    /// Send `bytes` as-is.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

// ────────────────────────────────────────────────────────────────────────────
// Serial port
// ────────────────────────────────────────────────────────────────────────────

/// A serial port opened through the `serialport` crate.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl SerialTransport {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(10))
            .open()
            .with_context(|| format!("Open serial port {} @ {} baud", path, baud_rate))?;
        Ok(Self {
            port,
            name: path.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Transport for SerialTransport {
    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        let waiting = self.port.bytes_to_read()? as usize;
        if waiting == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; waiting];
        match self.port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.port, bytes)?;
        self.port.flush()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Replay
// ────────────────────────────────────────────────────────────────────────────

/// Serves a raw capture of device output in fixed-size chunks, one chunk per
/// read, and keeps everything written to it.
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    written: Vec<u8>,
}

impl ReplayTransport {
    pub fn new(data: impl Into<Vec<u8>>, chunk_size: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            chunk_size: chunk_size.max(1),
            written: Vec::new(),
        }
    }

    pub fn from_file(path: &Utf8Path, chunk_size: usize) -> Result<Self> {
        let data = std::fs::read(path.as_std_path())
            .with_context(|| format!("Failed to read capture {}", path))?;
        Ok(Self::new(data, chunk_size))
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Everything the debugger sent back (acknowledgements).
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Transport for ReplayTransport {
    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        let end = (self.pos + self.chunk_size).min(self.data.len());
        let chunk = self.data[self.pos..end].to_vec();
        self.pos = end;
        Ok(chunk)
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_serves_fixed_chunks_then_nothing() {
        let mut t = ReplayTransport::new(b"abcdefg".to_vec(), 3);
        assert_eq!(t.read_available().unwrap(), b"abc");
        assert_eq!(t.read_available().unwrap(), b"def");
        assert_eq!(t.read_available().unwrap(), b"g");
        assert!(t.is_exhausted());
        assert!(t.read_available().unwrap().is_empty());
    }

    #[test]
    fn replay_records_writes() {
        let mut t = ReplayTransport::new(Vec::new(), 0);
        t.write_all(b"ok").unwrap();
        t.write_all(b"ok").unwrap();
        assert_eq!(t.written(), b"okok");
    }

    #[test]
    fn default_baud_rate_is_offered() {
        assert!(BAUD_RATES.contains(&115200));
        assert_eq!(check_baud_rate(115200), Ok(115200));
    }

    #[test]
    fn odd_baud_rate_is_refused() {
        let err = check_baud_rate(12345).unwrap_err();
        assert!(err.contains("12345"));
    }
}
