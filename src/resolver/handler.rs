//! Handler trait and the context handed to every invocation.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::callback::CallbackRegistry;
use crate::dispatch::{CallMode, Caller};
use crate::error::{BridgeError, Result};
use crate::resolver::namespace::Namespace;
use crate::resolver::receiver::Receiver;

/// Failure raised by a handler. The inbound dispatcher either propagates it to
/// the transport or recovers from it, depending on configuration.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError::new(e.to_string())
    }
}

impl From<BridgeError> for HandlerError {
    fn from(e: BridgeError) -> Self {
        HandlerError::new(e.to_string())
    }
}

/// A callable target addressable by `receiver.selector`.
///
/// Closures with the matching signature implement this trait, so most
/// handlers are registered with [`Namespace::register_fn`].
pub trait Handler: Send + Sync {
    fn call(&self, cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, HandlerError> + Send + Sync,
{
    fn call(&self, cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
        self(cx, args)
    }
}

/// Deserialize the positional argument at `index`.
pub fn arg<T: DeserializeOwned>(args: &[Value], index: usize) -> std::result::Result<T, HandlerError> {
    let value = args
        .get(index)
        .ok_or_else(|| HandlerError::new(format!("missing argument {}", index)))?;
    serde_json::from_value(value.clone())
        .map_err(|e| HandlerError::new(format!("argument {}: {}", index, e)))
}

/// The implicit call context of an invocation: the owner it was resolved on,
/// how it was called, and the bridge state a handler may use.
///
/// No bridge lock is held while a handler runs, so handlers may send, register
/// and read or write named slots.
pub struct CallContext<'a> {
    receiver: &'a Receiver,
    selector: &'a str,
    mode: CallMode,
    namespace: &'a RwLock<Namespace>,
    callbacks: &'a CallbackRegistry,
    caller: &'a Caller,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        receiver: &'a Receiver,
        selector: &'a str,
        mode: CallMode,
        namespace: &'a RwLock<Namespace>,
        callbacks: &'a CallbackRegistry,
        caller: &'a Caller,
    ) -> Self {
        CallContext {
            receiver,
            selector,
            mode,
            namespace,
            callbacks,
            caller,
        }
    }

    pub fn receiver(&self) -> &Receiver {
        self.receiver
    }

    pub fn selector(&self) -> &str {
        self.selector
    }

    pub fn mode(&self) -> CallMode {
        self.mode
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        self.callbacks
    }

    /// Outbound calls back to the other side.
    pub fn caller(&self) -> &Caller {
        self.caller
    }

    pub fn namespace(&self) -> &RwLock<Namespace> {
        self.namespace
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.namespace.read().get(name)
    }

    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        self.namespace.write().set(name, value)
    }
}
