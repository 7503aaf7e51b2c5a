use std::fmt;
use std::io;

use ovp8xx_pcic::ProtocolError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn protocol_error(context: &str, err: ProtocolError) -> CliError {
    match err {
        ProtocolError::Io(source) => io_error(context, source),
        ProtocolError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_map_to_the_timeout_code() {
        let err = io_error(
            "read failed",
            io::Error::new(io::ErrorKind::TimedOut, "slow device"),
        );
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn protocol_faults_map_to_data_invalid() {
        let err = protocol_error("receive failed", ProtocolError::InvalidTrailer);
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("receive failed"));
    }

    #[test]
    fn clean_close_maps_to_plain_failure() {
        let err = protocol_error("receive failed", ProtocolError::ConnectionClosed);
        assert_eq!(err.code, FAILURE);
    }
}
