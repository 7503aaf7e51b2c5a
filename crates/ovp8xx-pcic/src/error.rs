use crate::message::Ticket;

/// Errors that can occur while decoding a single chunk.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// The buffer is shorter than the fixed chunk header.
    #[error("chunk buffer too short ({len} bytes, the header needs 48)")]
    TooShort { len: usize },

    /// The declared chunk size is smaller than the header alone.
    #[error("chunk size {size} below the 48 byte minimum")]
    SizeBelowMinimum { size: u32 },

    /// The declared chunk size runs past the end of the buffer.
    #[error("chunk size {size} exceeds the {available} bytes available")]
    SizeExceedsAvailable { size: u32, available: usize },

    /// The declared header size is smaller than the fixed header.
    #[error("chunk header size {header_size} below the 48 byte minimum")]
    HeaderTooSmall { header_size: u32 },

    /// Header version 2 permits no padding beyond the fixed header.
    #[error("header version 2 requires a 48 byte header, got {header_size}")]
    HeaderSizeMismatch { header_size: u32 },

    /// The header version is outside the supported range.
    #[error("unsupported chunk header version {version} (supported: 1 to 3)")]
    UnsupportedHeaderVersion { version: u32 },

    /// The declared header size runs past the declared chunk size.
    #[error("chunk header size {header_size} exceeds chunk size {size}")]
    HeaderExceedsSize { header_size: u32, size: u32 },

    /// The data format tag is not a known format.
    #[error("invalid data format {format} (valid range: 0 to 8)")]
    InvalidDataFormat { format: u32 },

    /// The declared geometry cannot fit into the bytes that follow the header.
    #[error("width {width} times height {height} exceeds the {available} payload bytes available")]
    DimensionsExceedPayload {
        width: u32,
        height: u32,
        available: usize,
    },

    /// The declared geometry and format disagree with the payload length.
    #[error(
        "payload of {payload_len} bytes does not match \
         width {width} x height {height} x {elem_size} bytes per element"
    )]
    PayloadSizeMismatch {
        width: u32,
        height: u32,
        elem_size: u32,
        payload_len: u32,
    },
}

/// Errors that can occur while reading and dispatching PCIC messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The stream ended cleanly before the next message started.
    #[error("connection closed by the device")]
    ConnectionClosed,

    /// The stream ended in the middle of a message.
    #[error("stream ended mid-message while reading the {0}")]
    Incomplete(&'static str),

    /// The duplicated tickets of the envelope header disagree.
    #[error("ticket mismatch: header starts with {first} but ends with {second}")]
    TicketMismatch { first: Ticket, second: Ticket },

    /// The length field does not start with the literal 'L'.
    #[error("the length field does not start with 'L'")]
    InvalidLengthMarker,

    /// The length field does not parse as nine decimal digits plus CRLF.
    #[error("malformed length field {field:?}")]
    InvalidLengthValue { field: String },

    /// The declared message length cannot hold a ticket and a trailer.
    #[error("message length {length} below the 6 byte minimum")]
    LengthTooShort { length: usize },

    /// The message body does not end in CRLF.
    #[error("invalid trailer detected")]
    InvalidTrailer,

    /// The content markers are missing from the message body.
    #[error("content markers missing from the message body")]
    MissingMarkers,

    /// The ticket names no known message kind.
    #[error("unknown ticket received: {0}")]
    UnknownTicket(Ticket),

    /// The error payload does not follow the `%09d:%s` layout.
    #[error("unable to parse the error message payload")]
    MalformedErrorPayload,

    /// A chunk inside a result message failed to decode.
    #[error("chunk decoding failed: {0}")]
    Chunk(#[from] ChunkError),

    /// An I/O error occurred while reading from the stream.
    #[error("protocol I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// True when the device closed the stream cleanly between messages.
    ///
    /// Receive loops use this to stop without treating the close as a fault.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, ProtocolError::ConnectionClosed)
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
