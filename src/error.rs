//! Error taxonomy shared by every layer of the bridge.

use thiserror::Error;

use crate::resolver::handler::HandlerError;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The text is not a valid envelope, or it violates an envelope invariant.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// An intermediate namespace segment of the receiver is absent.
    #[error("unresolved receiver `{receiver}`: `{segment}` is not a namespace")]
    UnresolvedReceiver { receiver: String, segment: String },

    /// The receiver is neither the root token nor a dotted identifier path.
    #[error("invalid receiver `{receiver}`: {detail}")]
    InvalidReceiver { receiver: String, detail: String },

    #[error("{receiver} does not understand {selector}")]
    UnknownSelector { receiver: String, selector: String },

    #[error("no function for reference: {0}")]
    StaleCallbackReference(String),

    /// The invoked handler itself failed.
    #[error("{receiver}.{selector} failed: {source}")]
    TargetFailed {
        receiver: String,
        selector: String,
        #[source]
        source: HandlerError,
    },

    #[error("malformed reply: {0}")]
    MalformedReply(#[source] serde_json::Error),

    #[error("message encode failure: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("registration error: {0}")]
    Registration(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("schedule error: {0}")]
    Schedule(String),
}

impl BridgeError {
    /// Errors the inbound dispatcher recovers from locally instead of
    /// surfacing them to the transport.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BridgeError::UnresolvedReceiver { .. }
                | BridgeError::InvalidReceiver { .. }
                | BridgeError::UnknownSelector { .. }
                | BridgeError::StaleCallbackReference(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
