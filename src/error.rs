use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Failures before the first query is served. Each maps to its own exit code.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("parsing TTL ({value}): {reason}")]
    Ttl { value: String, reason: String },

    #[error("resolving {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("no addresses for {0}")]
    NoAddress(String),

    #[error("expected an IPv4 address for {address}, got {found}")]
    NotIpv4 { address: String, found: String },

    #[error("unparseable listen address {0}")]
    ListenAddress(String),

    #[error("parsing listen port ({value}): {reason}")]
    ListenPort { value: String, reason: String },

    #[error("bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("getsockname: {0}")]
    LocalAddr(#[source] io::Error),

    #[error("dropping privileges: {0}")]
    Privileges(String),
}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Resolve { .. } => 3,
            StartupError::Ttl { .. } => 5,
            StartupError::NoAddress(_) => 6,
            StartupError::NotIpv4 { .. } => 7,
            StartupError::ListenAddress(_) => 8,
            StartupError::Bind { .. } => 12,
            StartupError::ListenPort { .. } => 13,
            StartupError::LocalAddr(_) => 15,
            StartupError::Privileges(_) => 18,
        }
    }
}

/// Unrecoverable transport failure while serving.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("recvfrom: {0}")]
    Receive(#[source] io::Error),
}

impl ServeError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ServeError::Receive(_) => 16,
        }
    }
}

/// Reasons a single query is dropped without a reply.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Short header ({0} bytes)")]
    ShortHeader(usize),

    #[error("Sent a response")]
    NotAQuery,

    #[error("Invalid opcode {0}")]
    InvalidOpcode(u8),

    #[error("Truncated")]
    Truncated,

    #[error("No questions")]
    NoQuestions,

    #[error("First qname compressed")]
    CompressedName,

    #[error("Not enough namebuffer room for a {label_len}-byte label after {partial}")]
    NameBufferFull { label_len: u8, partial: String },

    #[error("Corrupt query: question name runs past end of message")]
    NameOverrun,

    #[error("Corrupt query: question has no room for type and class")]
    MissingTypeClass,

    #[error("Query for {name} too long ({len}) for reply")]
    TooLongForReply { name: String, len: usize },

    #[error("Sending reply: {0}")]
    Send(#[source] io::Error),

    #[error("Sent {sent}/{expected} response bytes")]
    ShortSend { sent: usize, expected: usize },
}
