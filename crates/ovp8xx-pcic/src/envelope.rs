use std::io::{ErrorKind, Read};

use bytes::Bytes;

use crate::error::ProtocolError;
use crate::message::Ticket;

/// Size of the fixed envelope header: ticket, length field, duplicated
/// ticket.
pub const ENVELOPE_HEADER_LEN: usize = 20;

/// Smallest acceptable value of the length field: the duplicated ticket
/// plus the CRLF trailer, with no content at all.
pub const MIN_MESSAGE_LENGTH: usize = 6;

const TICKET_LEN: usize = 4;
const TRAILER: &[u8] = b"\r\n";
const START_MARKER: &[u8] = b"star";
const END_MARKER: &[u8] = b"stop";

/// One PCIC message, read off the wire and stripped down to its content.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// The message kind code from the header.
    pub ticket: Ticket,
    /// The bytes between the start and end markers.
    pub content: Bytes,
}

/// Read one complete message envelope from `reader` (blocking).
///
/// The wire layout is a 20-byte header — a 4-digit ticket, a length field
/// of the form `L%09d\r\n`, and the same ticket again — followed by
/// exactly `length` bytes of which the leading 4 repeat the ticket once
/// more and the trailing 2 must be CRLF. The content sits between literal
/// `star` and `stop` markers inside the body.
///
/// A clean close before the first header byte reports
/// [`ProtocolError::ConnectionClosed`] so receive loops can stop without
/// treating it as corruption; a close anywhere later is
/// [`ProtocolError::Incomplete`].
pub fn read_envelope<R: Read>(reader: &mut R) -> Result<Envelope, ProtocolError> {
    let mut header = [0u8; ENVELOPE_HEADER_LEN];
    read_full(reader, &mut header, "envelope header", true)?;

    let first = Ticket::from_bytes(header[0..4].try_into().unwrap());
    let second = Ticket::from_bytes(header[16..20].try_into().unwrap());
    if first != second {
        return Err(ProtocolError::TicketMismatch { first, second });
    }
    if header[4] != b'L' {
        return Err(ProtocolError::InvalidLengthMarker);
    }
    let length = parse_length_field(&header[4..16])?;
    if length < MIN_MESSAGE_LENGTH {
        return Err(ProtocolError::LengthTooShort { length });
    }

    // The duplicated ticket at offset 16 already consumed 4 of the declared
    // bytes.
    let mut body = vec![0u8; length - TICKET_LEN];
    read_full(reader, &mut body, "message body", false)?;

    if !body.ends_with(TRAILER) {
        return Err(ProtocolError::InvalidTrailer);
    }
    let payload = &body[..body.len() - TRAILER.len()];
    if payload.len() < START_MARKER.len() + END_MARKER.len()
        || !payload.starts_with(START_MARKER)
        || !payload.ends_with(END_MARKER)
    {
        return Err(ProtocolError::MissingMarkers);
    }
    let content = &payload[START_MARKER.len()..payload.len() - END_MARKER.len()];

    Ok(Envelope {
        ticket: first,
        content: Bytes::copy_from_slice(content),
    })
}

/// Parse the 12-byte length field `L%09d\r\n` (the caller has already
/// checked the leading 'L').
fn parse_length_field(field: &[u8]) -> Result<usize, ProtocolError> {
    let digits = &field[1..10];
    let malformed = || ProtocolError::InvalidLengthValue {
        field: String::from_utf8_lossy(field).into_owned(),
    };
    if &field[10..12] != TRAILER || !digits.iter().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let length = digits
        .iter()
        .fold(0usize, |acc, d| acc * 10 + usize::from(d - b'0'));
    Ok(length)
}

/// Fill `buf` completely, or fail.
///
/// `clean_close` marks a read position where the peer may close the stream
/// without corrupting a message; only a zero-byte first read there maps to
/// `ConnectionClosed`.
fn read_full<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    context: &'static str,
    clean_close: bool,
) -> Result<(), ProtocolError> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if clean_close && filled == 0 => return Err(ProtocolError::ConnectionClosed),
            Ok(0) => return Err(ProtocolError::Incomplete(context)),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ProtocolError::Io(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Build a well-formed wire message around `content`.
    fn wire_message(ticket: &[u8; 4], content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(START_MARKER);
        body.extend_from_slice(content);
        body.extend_from_slice(END_MARKER);
        body.extend_from_slice(TRAILER);

        let length = TICKET_LEN + body.len();
        let mut wire = Vec::new();
        wire.extend_from_slice(ticket);
        wire.extend_from_slice(format!("L{length:09}\r\n").as_bytes());
        wire.extend_from_slice(ticket);
        wire.extend_from_slice(&body);
        wire
    }

    #[test]
    fn reads_minimum_envelope() {
        let wire = b"0000L000000014\r\n0000starstop\r\n".to_vec();
        assert_eq!(wire, wire_message(b"0000", b""));

        let envelope =
            read_envelope(&mut Cursor::new(wire)).expect("a successful parse expected");
        assert_eq!(envelope.ticket, Ticket::RESULT);
        assert!(envelope.content.is_empty());
    }

    #[test]
    fn extracts_content_between_markers() {
        let wire = wire_message(b"0000", b"payload");
        let envelope =
            read_envelope(&mut Cursor::new(wire)).expect("a successful parse expected");
        assert_eq!(envelope.content.as_ref(), b"payload");
    }

    #[test]
    fn rejects_ticket_mismatch() {
        let mut wire = wire_message(b"0001", b"");
        wire[16..20].copy_from_slice(b"0000");
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(
            err,
            ProtocolError::TicketMismatch {
                first: Ticket::ERROR,
                second: Ticket::RESULT,
            }
        ));
    }

    #[test]
    fn rejects_missing_length_marker() {
        let mut wire = wire_message(b"0000", b"");
        wire[4] = b'X';
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::InvalidLengthMarker));
    }

    #[test]
    fn rejects_non_numeric_length() {
        let mut wire = wire_message(b"0000", b"");
        wire[5] = b'x';
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::InvalidLengthValue { .. }));
    }

    #[test]
    fn rejects_corrupt_length_field_delimiter() {
        let mut wire = wire_message(b"0000", b"");
        wire[14] = b' ';
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::InvalidLengthValue { .. }));
    }

    #[test]
    fn rejects_length_below_minimum() {
        let mut wire = b"0000L000000005\r\n0000".to_vec();
        wire.extend_from_slice(b"\r\n");
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::LengthTooShort { length: 5 }));
    }

    #[test]
    fn rejects_missing_trailer() {
        let mut wire = wire_message(b"0000", b"");
        let len = wire.len();
        wire[len - 2..].copy_from_slice(b"xx");
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::InvalidTrailer));
    }

    #[test]
    fn rejects_body_too_short_for_markers() {
        // Length 6: ticket plus trailer, no room for the markers.
        let wire = b"0000L000000006\r\n0000\r\n".to_vec();
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::MissingMarkers));
    }

    #[test]
    fn rejects_corrupted_markers() {
        let mut wire = wire_message(b"0000", b"");
        wire[20..24].copy_from_slice(b"nope");
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::MissingMarkers));
    }

    #[test]
    fn clean_close_before_header_is_connection_closed() {
        let err = read_envelope(&mut Cursor::new(Vec::new())).expect_err("parse should fail");
        assert!(err.is_connection_closed());
    }

    #[test]
    fn close_inside_header_is_incomplete() {
        let wire = b"0000L0000".to_vec();
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::Incomplete("envelope header")));
    }

    #[test]
    fn close_inside_body_is_incomplete() {
        let mut wire = wire_message(b"0000", b"payload");
        wire.truncate(wire.len() - 3);
        let err = read_envelope(&mut Cursor::new(wire)).expect_err("parse should fail");
        assert!(matches!(err, ProtocolError::Incomplete("message body")));
    }

    #[test]
    fn consumes_exactly_one_message() {
        let mut wire = wire_message(b"0000", b"first");
        wire.extend_from_slice(&wire_message(b"0000", b"second"));
        let mut cursor = Cursor::new(wire);

        let first = read_envelope(&mut cursor).expect("first message should parse");
        let second = read_envelope(&mut cursor).expect("second message should parse");
        assert_eq!(first.content.as_ref(), b"first");
        assert_eq!(second.content.as_ref(), b"second");
    }
}
