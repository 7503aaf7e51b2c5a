use crate::chunk::Chunk;
use crate::error::ChunkError;

/// The ordered set of chunks carried by one PCIC result message.
///
/// Insertion order is wire order. A message carrying no chunk data is
/// valid and yields an empty frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// The chunks in wire order.
    pub chunks: Vec<Chunk>,
}

impl Frame {
    /// Number of chunks in this frame.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when the frame carries no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Decode every chunk in `content`, back to back, in wire order.
///
/// On a decode failure the chunks assembled before the failing one are
/// returned together with the error, so a dispatcher can still deliver the
/// partial frame to its handler before surfacing the error. Trailing bytes
/// that do not form a complete chunk fail the next header decode; nothing
/// is silently truncated.
pub fn assemble(content: &[u8]) -> (Frame, Option<ChunkError>) {
    let mut frame = Frame::default();
    let mut offset = 0usize;
    while offset < content.len() {
        match Chunk::decode(&content[offset..]) {
            Ok(chunk) => {
                offset += chunk.size();
                frame.chunks.push(chunk);
            }
            Err(err) => return (frame, Some(err)),
        }
    }
    (frame, None)
}
