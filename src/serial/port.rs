//! Serial line source
//!
//! Frames a byte stream into newline-delimited text lines, incrementally:
//! partial lines stay buffered until their newline arrives, invalid UTF-8
//! is replaced rather than failing the read, and a timed-out read means
//! "no complete line yet" rather than an error.

use std::io::{self, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use serialport::SerialPort;
use tracing::debug;

/// Conventional symbol rates offered in the baud selection dialog.
pub const BAUD_RATES: [u32; 6] = [9600, 115200, 4800, 19200, 38400, 57600];

/// Read timeout on the port. Doubles as the idle wait granularity, so a
/// stop request is observed within roughly this interval.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// List the device paths of the serial ports present on this machine.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().context("failed to enumerate serial ports")?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

/// Anything a monitoring session can pull complete lines from.
pub trait LineSource {
    /// Next complete line, or `None` when no full line is available yet.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Incremental newline framer over any byte source.
///
/// Generic over `Read` so the framing stays testable with in-memory
/// buffers, and so a session can run off any already-opened handle.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    /// Next complete line, or `None` when no full line is buffered yet.
    ///
    /// The returned line is lossily decoded and trimmed; it may be empty.
    /// Timeouts and would-block reads are not errors, they just mean no
    /// data arrived within the source's own read timeout.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = self.buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw).trim().to_string();
                return Ok(Some(line));
            }

            let mut chunk = [0u8; 256];
            match self.inner.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut
                            | io::ErrorKind::WouldBlock
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    return Ok(None)
                }
                Err(e) => return Err(e).context("serial read failed"),
            }
        }
    }
}

impl<R: Read> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        LineReader::next_line(self)
    }
}

/// A line source backed by a real serial port.
pub struct SerialLineSource {
    reader: LineReader<Box<dyn SerialPort>>,
}

impl SerialLineSource {
    /// Open the port and wrap it in a line reader. Failure here means the
    /// session never starts; no partial state is created.
    pub fn open(port_name: &str, baud: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("could not open serial port {port_name}"))?;
        debug!("opened {} at {} baud", port_name, baud);
        Ok(Self {
            reader: LineReader::new(port),
        })
    }

    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.reader.next_line()
    }
}

impl LineSource for SerialLineSource {
    fn next_line(&mut self) -> Result<Option<String>> {
        SerialLineSource::next_line(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frames_complete_lines() {
        let mut reader = LineReader::new(Cursor::new(b"first line\nsecond line\n".to_vec()));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("first line"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("second line"));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn partial_line_stays_buffered() {
        let mut reader = LineReader::new(Cursor::new(b"no newline yet".to_vec()));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn trims_carriage_returns() {
        let mut reader = LineReader::new(Cursor::new(b"Relay: ON\r\n".to_vec()));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("Relay: ON"));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let mut reader = LineReader::new(Cursor::new(b"Temp: 25\xff\xfe end\n".to_vec()));
        let line = reader.next_line().unwrap().unwrap();
        assert!(line.starts_with("Temp: 25"));
        assert!(line.contains('\u{fffd}'));
        assert!(line.ends_with("end"));
    }

    #[test]
    fn blank_lines_come_through_empty() {
        let mut reader = LineReader::new(Cursor::new(b"\n\nreal\n".to_vec()));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("real"));
    }
}
