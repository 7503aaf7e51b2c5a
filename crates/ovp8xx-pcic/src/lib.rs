//! PCIC streaming protocol for ifm OVP8xx devices.
//!
//! The device pushes length-delimited messages over TCP, each wrapping zero
//! or more binary chunks (images, distance maps, diagnostics) behind a
//! fixed-layout little-endian header. This crate decodes that stream and
//! routes every message to a caller-supplied [`MessageHandler`]:
//!
//! - [`chunk`] — the chunk header/payload codec
//! - [`frame`] — assembles chunks into ordered frames
//! - [`envelope`] — the outer ticket/length/trailer framing
//! - [`message`] — tickets, error and notification messages
//! - [`client`] — blocking per-message dispatch
//!
//! Everything is synchronous and stateless across messages; one client per
//! stream, one message in flight at a time.

pub mod chunk;
pub mod client;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod message;

pub use chunk::{Chunk, ChunkType, DataFormat, CHUNK_HEADER_LEN, MAX_HEADER_VERSION};
pub use client::{ClientConfig, MessageHandler, PcicClient, DEFAULT_HOST, PCIC_PORT};
pub use envelope::{read_envelope, Envelope, ENVELOPE_HEADER_LEN, MIN_MESSAGE_LENGTH};
pub use error::{ChunkError, ProtocolError, Result};
pub use frame::{assemble, Frame};
pub use message::{parse_error_message, ErrorMessage, NotificationMessage, Ticket};
