use crate::error::ProtocolError;

/// 4-digit ASCII code identifying a PCIC message kind.
///
/// The ticket is duplicated at both ends of the envelope header for framing
/// redundancy; values outside the known set are carried through so the
/// dispatcher can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket([u8; 4]);

impl Ticket {
    /// A result message carrying frame data.
    pub const RESULT: Ticket = Ticket(*b"0000");
    /// An error message.
    pub const ERROR: Ticket = Ticket(*b"0001");
    /// A notification message.
    pub const NOTIFICATION: Ticket = Ticket(*b"0010");

    /// Wrap raw ticket bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Ticket(bytes)
    }

    /// The raw ticket bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

/// An error pushed by the device: numeric ID plus human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessage {
    pub id: u32,
    pub message: String,
}

/// A notification pushed by the device.
///
/// The payload layout is undocumented and not parsed; dispatch delivers a
/// zero-valued message and logs the gap. See [`PcicClient::process_incoming`].
///
/// [`PcicClient::process_incoming`]: crate::client::PcicClient::process_incoming
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationMessage {
    pub id: u32,
    pub message: String,
}

/// Parse an error payload: nine zero-padded decimal digits, a colon, and a
/// non-empty message.
pub fn parse_error_message(content: &[u8]) -> Result<ErrorMessage, ProtocolError> {
    let text = std::str::from_utf8(content).map_err(|_| ProtocolError::MalformedErrorPayload)?;
    let (id_part, message) = text
        .split_once(':')
        .ok_or(ProtocolError::MalformedErrorPayload)?;
    if id_part.len() != 9 || !id_part.bytes().all(|b| b.is_ascii_digit()) || message.is_empty() {
        return Err(ProtocolError::MalformedErrorPayload);
    }
    let id = id_part
        .parse::<u32>()
        .map_err(|_| ProtocolError::MalformedErrorPayload)?;
    Ok(ErrorMessage {
        id,
        message: message.to_string(),
    })
}
