//! The boundary between the bridge and whatever carries its messages.
//!
//! The core only needs three primitives from the embedding ([`Transport`]) and
//! exposes exactly two inbound hooks to it ([`Inbound`]). Messages are plain
//! text; the transport is assumed reliable and in order.

pub mod loopback;

use thiserror::Error;

pub use loopback::{connect, LoopbackTransport};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport disconnected")]
    Disconnected,
    /// The remote side failed to handle the message.
    #[error("remote failure: {0}")]
    Remote(String),
    #[error("unsupported transport operation: {0}")]
    Unsupported(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outbound primitives provided by the embedding.
pub trait Transport: Send + Sync {
    /// Diagnostic sink. Never fails from the caller's point of view.
    fn print(&self, text: &str);

    /// Fire-and-forget delivery.
    fn send_raw(&self, text: &str) -> Result<(), TransportError>;

    /// Deliver and block until the remote side replies.
    fn send_raw_and_wait(&self, text: &str) -> Result<String, TransportError>;
}

/// The two handlers a bridge registers with its transport.
pub trait Inbound: Send + Sync {
    /// Fire-and-forget message from the remote side.
    fn on_message(&self, text: &str) -> crate::error::Result<()>;

    /// Request/reply message; returns the encoded reply.
    fn on_request(&self, text: &str) -> crate::error::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use std::io;

    #[test]
    fn test_io_failure_surfaces_as_transport_error() {
        let e: TransportError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert!(matches!(e, TransportError::Io(_)));
        let bridge_error = BridgeError::from(e);
        assert_eq!(bridge_error.to_string(), "pipe closed");
    }
}
