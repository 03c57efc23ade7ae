//! The message envelope, the only entity that crosses the transport.
//!
//! ```text
//! {"receiver":"math","selector":"square","args":[4],"callback":"6f1c…"}
//! ```
//!
//! `receiver` is either the root token (`"this"`) or a dotted namespace path,
//! `selector` names the operation, `args` are positional plain values and
//! `callback` / `onError` are optional single-use callback references issued by
//! the sending side's [`CallbackRegistry`](crate::callback::CallbackRegistry).

pub mod codec;

use std::fmt;
use std::fmt::{Display, Formatter};

use serde::Deserialize;
use serde_json::Value;

pub use codec::EnvelopeCodec;

/// Receiver token that addresses the root context itself.
pub const ROOT_TOKEN: &str = "this";

/// The wire field name carrying the operation.
///
/// Historical peers used `method` instead of `selector`; the codec writes the
/// configured one and may accept the other on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKey {
    Selector,
    Method,
}

impl OperationKey {
    pub fn field_name(&self) -> &'static str {
        match self {
            OperationKey::Selector => "selector",
            OperationKey::Method => "method",
        }
    }

    /// The other field name, accepted on decode when aliasing is enabled.
    pub fn alternate(&self) -> OperationKey {
        match self {
            OperationKey::Selector => OperationKey::Method,
            OperationKey::Method => OperationKey::Selector,
        }
    }
}

impl Default for OperationKey {
    fn default() -> Self {
        OperationKey::Selector
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub receiver: String,
    pub selector: String,
    pub args: Vec<Value>,
    pub callback: Option<String>,
    pub on_error: Option<String>,
}

impl Envelope {
    pub fn new(receiver: impl Into<String>, selector: impl Into<String>, args: Vec<Value>) -> Self {
        Envelope {
            receiver: receiver.into(),
            selector: selector.into(),
            args,
            callback: None,
            on_error: None,
        }
    }

    pub fn with_callback(mut self, reference: impl Into<String>) -> Self {
        self.callback = Some(reference.into());
        self
    }

    pub fn with_on_error(mut self, reference: impl Into<String>) -> Self {
        self.on_error = Some(reference.into());
        self
    }
}

impl Display for Envelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let args = self
            .args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}.{}({})", self.receiver, self.selector, args)?;
        if let Some(callback) = &self.callback {
            write!(f, " => {}", callback)?;
        }
        Ok(())
    }
}
