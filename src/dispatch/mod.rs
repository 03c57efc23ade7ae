//! Inbound dispatch and outbound calls.
//!
//! ```text
//! local Caller ──encode──▶ transport ──▶ remote Dispatcher ──resolve──▶ handler
//!                                              │
//!        callback registry ◀── callDispatch ◀──┘ (reply-via-callback only)
//! ```

pub mod caller;
pub mod dispatcher;

pub use caller::Caller;
pub use dispatcher::Dispatcher;

/// The channel an envelope arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// No reply is produced; the return value is discarded or forwarded to
    /// the envelope's callback.
    FireAndForget,
    /// The return value is serialized and handed back as the reply.
    RequestReply,
}
