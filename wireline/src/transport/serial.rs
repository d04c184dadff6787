//! Serial-port transport for directly attached devices.

use log::debug;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};

use super::StreamTransport;
use crate::error::TransportError;

/// Transport over a local serial port.
pub type SerialTransport = StreamTransport<SerialStream>;

impl StreamTransport<SerialStream> {
    /// Open `path` at `baud`: 8 data bits, no parity, one stop bit, no flow
    /// control.
    pub fn open(path: &str, baud: u32) -> Result<Self, TransportError> {
        let stream = tokio_serial::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()
            .map_err(|err| TransportError::ConnectionFailed {
                target: path.to_string(),
                source: err.into(),
            })?;
        debug!("opened {path} at {baud} baud");
        Ok(Self::new(stream))
    }
}
