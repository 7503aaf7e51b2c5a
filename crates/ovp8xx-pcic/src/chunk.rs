use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ChunkError;

/// Length of the fixed chunk header in bytes; the data section starts here.
pub const CHUNK_HEADER_LEN: usize = 0x30;

/// Highest chunk header version this codec understands.
pub const MAX_HEADER_VERSION: u32 = 3;

/// Identifies the semantic kind of a chunk's payload.
///
/// The set of known constants is extensible; unknown values are carried
/// through opaquely rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub u32);

impl ChunkType {
    /// Radial distance noise image.
    pub const RADIAL_DISTANCE_NOISE: ChunkType = ChunkType(105);
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The payload element type of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataFormat {
    /// 8 bit unsigned integer.
    U8 = 0,
    /// 8 bit signed integer.
    S8 = 1,
    /// 16 bit unsigned integer.
    U16 = 2,
    /// 16 bit signed integer.
    S16 = 3,
    /// 32 bit unsigned integer.
    U32 = 4,
    /// 32 bit signed integer.
    S32 = 5,
    /// 32 bit floating point number.
    F32 = 6,
    /// 64 bit unsigned integer.
    U64 = 7,
    /// 64 bit floating point number.
    F64 = 8,
}

impl DataFormat {
    /// Decode a wire-level format tag.
    pub fn from_wire(raw: u32) -> Result<Self, ChunkError> {
        match raw {
            0 => Ok(DataFormat::U8),
            1 => Ok(DataFormat::S8),
            2 => Ok(DataFormat::U16),
            3 => Ok(DataFormat::S16),
            4 => Ok(DataFormat::U32),
            5 => Ok(DataFormat::S32),
            6 => Ok(DataFormat::F32),
            7 => Ok(DataFormat::U64),
            8 => Ok(DataFormat::F64),
            format => Err(ChunkError::InvalidDataFormat { format }),
        }
    }

    /// Bytes per payload element.
    pub fn byte_width(self) -> u32 {
        match self {
            DataFormat::U8 | DataFormat::S8 => 1,
            DataFormat::U16 | DataFormat::S16 => 2,
            DataFormat::U32 | DataFormat::S32 | DataFormat::F32 => 4,
            DataFormat::U64 | DataFormat::F64 => 8,
        }
    }
}

const OFFSET_TYPE: usize = 0x00;
const OFFSET_SIZE: usize = 0x04;
const OFFSET_HEADER_SIZE: usize = 0x08;
const OFFSET_HEADER_VERSION: usize = 0x0C;
const OFFSET_WIDTH: usize = 0x10;
const OFFSET_HEIGHT: usize = 0x14;
const OFFSET_FORMAT: usize = 0x18;
const OFFSET_TIME_STAMP: usize = 0x1C;
const OFFSET_FRAME_COUNT: usize = 0x20;
const OFFSET_STATUS_CODE: usize = 0x24;
const OFFSET_TIME_STAMP_SEC: usize = 0x28;
const OFFSET_TIME_STAMP_NSEC: usize = 0x2C;

fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}

fn write_u32_le(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// One self-describing binary unit of sensor output.
///
/// A chunk owns its decoded payload; decoding copies the bytes out of the
/// input buffer, and encoding produces a fresh buffer. All header fields
/// are little-endian on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    chunk_type: ChunkType,
    size: u32,
    header_size: u32,
    header_version: u32,
    width: u32,
    height: u32,
    format: DataFormat,
    /// Microsecond timestamp, deprecated on the wire but round-tripped.
    time_stamp: u32,
    frame_count: u32,
    status_code: u32,
    time_stamp_sec: u32,
    time_stamp_nsec: u32,
    /// JSON metadata, always `{}` for header version 2. Not part of the
    /// fixed header and never serialized by this codec.
    metadata: String,
    data: Vec<u8>,
}

impl Chunk {
    /// Create an empty version 2 chunk of the given type.
    pub fn new(chunk_type: ChunkType) -> Self {
        Self {
            chunk_type,
            size: CHUNK_HEADER_LEN as u32,
            header_size: CHUNK_HEADER_LEN as u32,
            header_version: 2,
            width: 0,
            height: 0,
            format: DataFormat::U8,
            time_stamp: 0,
            frame_count: 0,
            status_code: 0,
            time_stamp_sec: 0,
            time_stamp_nsec: 0,
            metadata: String::from("{}"),
            data: Vec::new(),
        }
    }

    /// Create a version 2 chunk with a zero-filled payload sized for the
    /// given geometry and element format.
    pub fn with_geometry(chunk_type: ChunkType, width: u32, height: u32, format: DataFormat) -> Self {
        let mut chunk = Self::new(chunk_type);
        let payload_len = width as usize * height as usize * format.byte_width() as usize;
        chunk.width = width;
        chunk.height = height;
        chunk.format = format;
        chunk.data = vec![0u8; payload_len];
        chunk.size = chunk.header_size + payload_len as u32;
        chunk
    }

    /// The semantic kind of this chunk's payload.
    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    /// Total wire size of this chunk, header and data included.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Declared header size; the data section starts after this many bytes.
    pub fn header_size(&self) -> u32 {
        self.header_size
    }

    /// Chunk header schema revision.
    pub fn header_version(&self) -> u32 {
        self.header_version
    }

    /// Width of the payload data.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the payload data; 1 for non-image data.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Payload element format.
    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// The frame count reported by the device.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Set the frame count.
    pub fn set_frame_count(&mut self, count: u32) {
        self.frame_count = count;
    }

    /// The device status code, 0 when healthy.
    pub fn status(&self) -> u32 {
        self.status_code
    }

    /// Set the status code.
    pub fn set_status(&mut self, status: u32) {
        self.status_code = status;
    }

    /// The acquisition timestamp, seconds and nanoseconds since the epoch.
    pub fn timestamp(&self) -> SystemTime {
        UNIX_EPOCH + Duration::new(self.time_stamp_sec as u64, self.time_stamp_nsec)
    }

    /// The payload bytes this chunk describes.
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Mutable access to the payload bytes; the length is fixed by the
    /// chunk's geometry.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data.as_mut_slice()
    }

    /// Decode one chunk from the start of `buffer`.
    ///
    /// The buffer may extend past the chunk; the declared chunk size decides
    /// how many bytes belong to it. The payload is copied out, never
    /// aliased.
    pub fn decode(buffer: &[u8]) -> Result<Self, ChunkError> {
        let available = buffer.len();
        if available < CHUNK_HEADER_LEN {
            return Err(ChunkError::TooShort { len: available });
        }

        let chunk_type = ChunkType(read_u32_le(buffer, OFFSET_TYPE));
        let size = read_u32_le(buffer, OFFSET_SIZE);
        if (size as usize) < CHUNK_HEADER_LEN {
            return Err(ChunkError::SizeBelowMinimum { size });
        }
        if size as usize > available {
            return Err(ChunkError::SizeExceedsAvailable { size, available });
        }

        let header_size = read_u32_le(buffer, OFFSET_HEADER_SIZE);
        if (header_size as usize) < CHUNK_HEADER_LEN {
            return Err(ChunkError::HeaderTooSmall { header_size });
        }

        let header_version = read_u32_le(buffer, OFFSET_HEADER_VERSION);
        if header_version == 2 && header_size as usize != CHUNK_HEADER_LEN {
            return Err(ChunkError::HeaderSizeMismatch { header_size });
        }
        if header_version == 0 || header_version > MAX_HEADER_VERSION {
            return Err(ChunkError::UnsupportedHeaderVersion {
                version: header_version,
            });
        }
        if header_size > size {
            return Err(ChunkError::HeaderExceedsSize { header_size, size });
        }

        let width = read_u32_le(buffer, OFFSET_WIDTH);
        let height = read_u32_le(buffer, OFFSET_HEIGHT);
        // Widened to u64: hostile 32-bit dimensions must not wrap into a
        // passing check.
        let pixels = width as u64 * height as u64;
        let payload_available = (available - header_size as usize) as u64;
        if pixels > payload_available {
            return Err(ChunkError::DimensionsExceedPayload {
                width,
                height,
                available: payload_available as usize,
            });
        }

        let format = DataFormat::from_wire(read_u32_le(buffer, OFFSET_FORMAT))?;

        let payload_len = size - header_size;
        if pixels * format.byte_width() as u64 != payload_len as u64 {
            return Err(ChunkError::PayloadSizeMismatch {
                width,
                height,
                elem_size: format.byte_width(),
                payload_len,
            });
        }

        // The data section sits at the fixed header length regardless of any
        // declared header padding.
        let data = buffer[CHUNK_HEADER_LEN..CHUNK_HEADER_LEN + payload_len as usize].to_vec();

        Ok(Self {
            chunk_type,
            size,
            header_size,
            header_version,
            width,
            height,
            format,
            time_stamp: read_u32_le(buffer, OFFSET_TIME_STAMP),
            frame_count: read_u32_le(buffer, OFFSET_FRAME_COUNT),
            status_code: read_u32_le(buffer, OFFSET_STATUS_CODE),
            time_stamp_sec: read_u32_le(buffer, OFFSET_TIME_STAMP_SEC),
            time_stamp_nsec: read_u32_le(buffer, OFFSET_TIME_STAMP_NSEC),
            metadata: String::from("{}"),
            data,
        })
    }

    /// Encode this chunk into a fresh buffer, header and payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut blob = vec![0u8; CHUNK_HEADER_LEN + self.data.len()];
        write_u32_le(&mut blob, OFFSET_TYPE, self.chunk_type.0);
        write_u32_le(&mut blob, OFFSET_SIZE, self.size);
        write_u32_le(&mut blob, OFFSET_HEADER_SIZE, self.header_size);
        write_u32_le(&mut blob, OFFSET_HEADER_VERSION, self.header_version);
        write_u32_le(&mut blob, OFFSET_WIDTH, self.width);
        write_u32_le(&mut blob, OFFSET_HEIGHT, self.height);
        write_u32_le(&mut blob, OFFSET_FORMAT, self.format as u32);
        write_u32_le(&mut blob, OFFSET_TIME_STAMP, self.time_stamp);
        write_u32_le(&mut blob, OFFSET_FRAME_COUNT, self.frame_count);
        write_u32_le(&mut blob, OFFSET_STATUS_CODE, self.status_code);
        write_u32_le(&mut blob, OFFSET_TIME_STAMP_SEC, self.time_stamp_sec);
        write_u32_le(&mut blob, OFFSET_TIME_STAMP_NSEC, self.time_stamp_nsec);
        blob[CHUNK_HEADER_LEN..].copy_from_slice(&self.data);
        blob
    }
}
