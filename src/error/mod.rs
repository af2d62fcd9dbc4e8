pub(crate) mod internal;

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::protocol::Key;

#[derive(Debug)]
pub enum DumperError {
    // The output file could not be created.
    CreateOutput { path: PathBuf, source: io::Error },
    // The server answered with an error reply.
    Server(String),
    // The server answered with a reply of an unexpected shape.
    UnexpectedReply { command: &'static str, reply: String },
    // DUMP returned nil, the key disappeared after enumeration.
    KeyNotFound { key: Key },
    // The server closed the connection.
    ConnectionClosed,
    Io(io::Error),
    Internal(internal::Error),
}

impl fmt::Display for DumperError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DumperError::CreateOutput { path, source } => {
                write!(f, "couldn't create file {}: {}", path.display(), source)
            }
            DumperError::Server(message) => write!(f, "server error: {}", message),
            DumperError::UnexpectedReply { command, reply } => {
                write!(f, "unexpected {} reply: {}", command, reply)
            }
            DumperError::KeyNotFound { key } => write!(f, "key {} not found", key),
            DumperError::ConnectionClosed => write!(f, "connection closed by server"),
            DumperError::Io(err) => write!(f, "{}", err),
            DumperError::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DumperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DumperError::CreateOutput { source, .. } => Some(source),
            DumperError::Io(err) => Some(err),
            DumperError::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DumperError {
    fn from(err: io::Error) -> Self {
        DumperError::Io(err)
    }
}

impl From<internal::Error> for DumperError {
    fn from(err: internal::Error) -> Self {
        if err.is_connection_closed() {
            return DumperError::ConnectionClosed;
        }
        tracing::trace!(backtrace = ?err.backtrace(), "internal error");
        DumperError::Internal(err)
    }
}
