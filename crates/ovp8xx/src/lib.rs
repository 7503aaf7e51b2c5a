//! Client library for the ifm OVP8xx series of devices.
//!
//! The device pushes chunked sensor data (images, distance maps,
//! diagnostics) over its PCIC service, a ticket-framed binary protocol on
//! TCP port 50010. This crate re-exports the workspace layers under one
//! roof; the `ovp8xx` binary (cargo feature `cli`) adds a command line
//! front end on top.
//!
//! # Crate Structure
//!
//! - [`transport`] — blocking TCP byte stream to the device
//! - [`pcic`] — PCIC chunk codec, frame assembly, and message dispatch

/// Re-export transport types.
pub mod transport {
    pub use ovp8xx_transport::*;
}

/// Re-export PCIC protocol types.
pub mod pcic {
    pub use ovp8xx_pcic::*;
}
