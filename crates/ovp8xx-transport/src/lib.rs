//! Network transport for ifm OVP8xx devices.
//!
//! Provides the reliable, ordered byte stream the PCIC protocol layer runs
//! on: a blocking TCP connection to the device. This is the lowest layer of
//! the workspace. Everything else builds on top of the [`DeviceStream`]
//! type provided here.

pub mod error;
pub mod tcp;

pub use error::{Result, TransportError};
pub use tcp::DeviceStream;
