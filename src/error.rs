//! Unified error types for the garage firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! worker threads' error handling uniform.  All variants are `Copy` so they
//! can be logged and passed between loops without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A request/response exchange with the garage server failed.
    Comms(CommsError),
    /// A single-slot hand-off between loops was full.
    Handoff(HandoffError),
    /// Configuration is invalid.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Handoff(e) => write!(f, "handoff: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

/// Failure of one server exchange.  Always transient: the caller skips the
/// cycle and retries on the next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The HTTP connection could not be opened or the request not written.
    Transport,
    /// The server answered with a status other than 200.
    HttpStatus(u16),
    /// The response body did not fit in the receive buffer.
    ResponseTooLarge,
    /// The response body was not the expected JSON shape.
    MalformedResponse,
    /// The server returned an empty button token.
    EmptyToken,
    /// The server returned a token longer than the token capacity.
    TokenTooLong,
    /// The request URL or body could not be encoded into its buffer.
    RequestEncoding,
    /// Simulated failure injected by the fake server.
    Injected,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "HTTP transport failed"),
            Self::HttpStatus(code) => write!(f, "unexpected HTTP status {code}"),
            Self::ResponseTooLarge => write!(f, "response exceeds receive buffer"),
            Self::MalformedResponse => write!(f, "malformed response body"),
            Self::EmptyToken => write!(f, "empty button token"),
            Self::TokenTooLong => write!(f, "button token too long"),
            Self::RequestEncoding => write!(f, "request encoding failed"),
            Self::Injected => write!(f, "injected failure"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Hand-off errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
    /// The single-slot channel already holds an undelivered item.
    Full,
}

impl fmt::Display for HandoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "channel full"),
        }
    }
}

impl From<HandoffError> for Error {
    fn from(e: HandoffError) -> Self {
        Self::Handoff(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A poll interval or the pulse width is zero.
    ZeroInterval(&'static str),
    /// The heartbeat is shorter than one sensor poll period.
    HeartbeatTooShort,
    /// The real server is selected but no base URL is configured.
    MissingServerUrl,
    /// A build-time override did not fit its fixed-capacity field.
    ValueTooLong(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval(field) => write!(f, "{field} must be non-zero"),
            Self::HeartbeatTooShort => {
                write!(f, "heartbeat interval shorter than sensor poll interval")
            }
            Self::MissingServerUrl => write!(f, "server base URL not configured"),
            Self::ValueTooLong(field) => write!(f, "{field} too long"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
