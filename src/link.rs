//! Actuator link and wire format

use crate::config::LinkConfig;
use chromalink_cv::Detection;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Failed to open serial port {port} at {baud_rate} baud: {source}")]
    Open {
        port: String,
        baud_rate: u32,
        #[source]
        source: serialport::Error,
    },
    #[error("Failed to write message: {0}")]
    Write(#[from] std::io::Error),
}

/// Outbound byte channel to the actuator.
pub trait ActuatorLink {
    fn send(&mut self, message: &[u8]) -> Result<(), LinkError>;
}

/// `LABEL,CENTER_X,CENTER_Y\n` as ASCII bytes.
pub fn encode(detection: &Detection) -> Vec<u8> {
    format!(
        "{},{},{}\n",
        detection.label, detection.centroid.x, detection.centroid.y
    )
    .into_bytes()
}

/// Link over any byte writer; flushed after every message.
pub struct WriterLink<W: Write> {
    writer: W,
}

impl<W: Write> WriterLink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ActuatorLink for WriterLink<W> {
    fn send(&mut self, message: &[u8]) -> Result<(), LinkError> {
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub type SerialLink = WriterLink<Box<dyn serialport::SerialPort>>;

/// Open `port` and wait for the board to settle.
pub fn open_serial(port: &str, config: &LinkConfig) -> Result<SerialLink, LinkError> {
    let handle = serialport::new(port, config.baud_rate)
        .timeout(Duration::from_millis(100))
        .open()
        .map_err(|source| LinkError::Open {
            port: port.to_string(),
            baud_rate: config.baud_rate,
            source,
        })?;

    tracing::info!("Opened serial port {} at {} baud", port, config.baud_rate);
    if !config.settle().is_zero() {
        std::thread::sleep(config.settle());
    }
    Ok(WriterLink::new(handle))
}

/// Stand-in when no port is configured: messages only reach the log.
#[derive(Debug, Default)]
pub struct LogLink;

impl ActuatorLink for LogLink {
    fn send(&mut self, message: &[u8]) -> Result<(), LinkError> {
        tracing::debug!("No serial port, dropping {:?}", String::from_utf8_lossy(message));
        Ok(())
    }
}
