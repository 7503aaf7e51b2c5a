use std::io::Read;
use std::time::Duration;

use tracing::{debug, warn};

use ovp8xx_transport::{DeviceStream, TransportError};

use crate::envelope::{read_envelope, Envelope};
use crate::error::{ProtocolError, Result};
use crate::frame::{assemble, Frame};
use crate::message::{parse_error_message, ErrorMessage, NotificationMessage, Ticket};

/// Default TCP port of the device's PCIC service.
pub const PCIC_PORT: u16 = 50010;

/// Default device address when nothing else is configured.
pub const DEFAULT_HOST: &str = "192.168.0.69";

/// Configuration for connecting a [`PcicClient`] to a device.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// IP address or hostname of the device.
    pub host: String,
    /// TCP port of the PCIC service.
    pub port: u16,
    /// Read timeout applied to the connection; `None` blocks forever.
    pub read_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: PCIC_PORT,
            read_timeout: None,
        }
    }
}

/// Capability set invoked for each dispatched PCIC message.
///
/// The protocol core does not constrain what implementations do with the
/// delivered data — print it, enqueue it, aggregate it.
pub trait MessageHandler {
    /// Called with the frame carried by a result message.
    ///
    /// When frame assembly fails partway this still runs, with the chunks
    /// decoded before the failure; the decode error is surfaced to the
    /// caller of [`PcicClient::process_incoming`] afterwards.
    fn result(&mut self, frame: Frame);

    /// Called with a parsed device error message.
    fn error(&mut self, message: ErrorMessage);

    /// Called when a notification message arrives. Payload parsing is not
    /// implemented; the message is always zero-valued.
    fn notification(&mut self, message: NotificationMessage);
}

/// Receives the PCIC messages a device pushes over a byte stream.
///
/// The protocol is a simple unsolicited-push stream with one message in
/// flight at a time; each [`process_incoming`](Self::process_incoming)
/// call blocks until a complete envelope arrives and routes it to the
/// handler. The receive loop belongs to the caller:
///
/// ```no_run
/// use ovp8xx_pcic::{ClientConfig, PcicClient};
/// # struct Receiver;
/// # impl ovp8xx_pcic::MessageHandler for Receiver {
/// #     fn result(&mut self, _: ovp8xx_pcic::Frame) {}
/// #     fn error(&mut self, _: ovp8xx_pcic::ErrorMessage) {}
/// #     fn notification(&mut self, _: ovp8xx_pcic::NotificationMessage) {}
/// # }
/// # fn main() -> ovp8xx_pcic::Result<()> {
/// let mut client = PcicClient::connect(&ClientConfig::default())?;
/// let mut handler = Receiver;
/// loop {
///     if let Err(err) = client.process_incoming(&mut handler) {
///         if err.is_connection_closed() {
///             break;
///         }
///         return Err(err);
///     }
/// }
/// # Ok(())
/// # }
/// ```
///
/// No state is kept between messages; a fault in one message does not
/// corrupt the parsing of the next, though a framing fault can leave the
/// underlying stream misaligned.
pub struct PcicClient<S> {
    stream: S,
}

impl PcicClient<DeviceStream> {
    /// Connect to the PCIC service described by `config` (blocking).
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let stream = DeviceStream::connect(&config.host, config.port)
            .map_err(transport_to_protocol_error)?;
        stream
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_protocol_error)?;
        Ok(Self::new(stream))
    }
}

impl<S: Read> PcicClient<S> {
    /// Wrap an already-connected byte stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Read and dispatch one PCIC message (blocking).
    ///
    /// - Result tickets are assembled into a [`Frame`] and delivered via
    ///   [`MessageHandler::result`]. If assembly fails, the handler still
    ///   receives the partial frame and the error is returned afterwards.
    /// - Error tickets are parsed and delivered via
    ///   [`MessageHandler::error`]; a malformed payload fails without a
    ///   handler call.
    /// - Notification tickets deliver a zero-valued message via
    ///   [`MessageHandler::notification`]; the payload layout is not
    ///   documented, so it is not parsed.
    /// - Any other ticket fails with [`ProtocolError::UnknownTicket`].
    pub fn process_incoming<H: MessageHandler>(&mut self, handler: &mut H) -> Result<()> {
        let Envelope { ticket, content } = read_envelope(&mut self.stream)?;
        match ticket {
            Ticket::RESULT => {
                let (frame, err) = assemble(&content);
                debug!(chunks = frame.len(), "result message received");
                handler.result(frame);
                match err {
                    Some(err) => Err(err.into()),
                    None => Ok(()),
                }
            }
            Ticket::ERROR => {
                let message = parse_error_message(&content)?;
                handler.error(message);
                Ok(())
            }
            Ticket::NOTIFICATION => {
                warn!("notification payload parsing is not implemented");
                handler.notification(NotificationMessage::default());
                Ok(())
            }
            other => Err(ProtocolError::UnknownTicket(other)),
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Consume the client and return the inner stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

fn transport_to_protocol_error(err: TransportError) -> ProtocolError {
    match err {
        TransportError::Connect { source, .. } | TransportError::Io(source) => {
            ProtocolError::Io(source)
        }
        other => ProtocolError::Io(std::io::Error::other(other.to_string())),
    }
}
