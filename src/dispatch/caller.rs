use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::callback::{CallbackRef, CallbackRegistry};
use crate::envelope::{Envelope, EnvelopeCodec, ROOT_TOKEN};
use crate::error::{BridgeError, Result};
use crate::transport::Transport;

/// Outbound side of a bridge: builds envelopes and pushes them to the transport.
///
/// Cheap to clone; clones share the transport and the callback registry.
#[derive(Clone)]
pub struct Caller {
    codec: EnvelopeCodec,
    transport: Arc<dyn Transport>,
    callbacks: Arc<CallbackRegistry>,
    callback_selector: String,
}

impl Caller {
    pub fn new(
        codec: EnvelopeCodec,
        transport: Arc<dyn Transport>,
        callbacks: Arc<CallbackRegistry>,
        callback_selector: impl Into<String>,
    ) -> Self {
        Caller {
            codec,
            transport,
            callbacks,
            callback_selector: callback_selector.into(),
        }
    }

    /// Fire-and-forget.
    pub fn send(&self, receiver: &str, selector: &str, args: Vec<Value>) -> Result<()> {
        self.post(&Envelope::new(receiver, selector, args))
    }

    /// Request/reply: blocks until the remote side has produced the reply.
    pub fn send_and_wait(&self, receiver: &str, selector: &str, args: Vec<Value>) -> Result<Value> {
        let envelope = Envelope::new(receiver, selector, args);
        let text = self.codec.encode(&envelope)?;
        debug!(receiver, selector, "send and wait");
        let reply = self.transport.send_raw_and_wait(&text).map_err(|e| {
            error!(receiver, selector, err = %e, "transport request failure");
            e
        })?;
        self.codec.decode_reply(&reply)
    }

    /// Fire-and-forget with the return value delivered later to `on_return`.
    ///
    /// If the envelope cannot be sent the callback is released again.
    pub fn send_with_callback<F>(
        &self,
        receiver: &str,
        selector: &str,
        on_return: F,
        args: Vec<Value>,
    ) -> Result<CallbackRef>
    where
        F: FnOnce(Vec<Value>) + Send + 'static,
    {
        let reference = self.callbacks.put(Box::new(on_return));
        let envelope = Envelope::new(receiver, selector, args).with_callback(reference.as_str());
        if let Err(e) = self.post(&envelope) {
            self.callbacks.take(&reference);
            return Err(e);
        }
        Ok(reference)
    }

    /// Like [`send_with_callback`](Self::send_with_callback), with a second
    /// callback that receives the remote failure message instead. Exactly one
    /// of the two runs; the other is released with it.
    pub fn send_with_callbacks<F, E>(
        &self,
        receiver: &str,
        selector: &str,
        on_return: F,
        on_error: E,
        args: Vec<Value>,
    ) -> Result<(CallbackRef, CallbackRef)>
    where
        F: FnOnce(Vec<Value>) + Send + 'static,
        E: FnOnce(String) + Send + 'static,
    {
        let on_error = move |args: Vec<Value>| {
            let message = match args.into_iter().next() {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => String::new(),
            };
            on_error(message)
        };
        let (return_ref, error_ref) = self
            .callbacks
            .put_pair(Box::new(on_return), Box::new(on_error));
        let envelope = Envelope::new(receiver, selector, args)
            .with_callback(return_ref.as_str())
            .with_on_error(error_ref.as_str());
        if let Err(e) = self.post(&envelope) {
            self.callbacks.take(&return_ref);
            return Err(e);
        }
        Ok((return_ref, error_ref))
    }

    /// Ask the remote side to run the callback it stored under `reference`.
    pub fn invoke_callback(&self, reference: &str, args: Vec<Value>) -> Result<()> {
        self.post(&self.callback_envelope(reference, args))
    }

    /// The envelope that makes the remote side run a stored callback:
    /// `this.<callback selector>(reference, args...)`.
    pub fn callback_envelope(&self, reference: &str, args: Vec<Value>) -> Envelope {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(Value::String(reference.to_string()));
        all.extend(args);
        Envelope::new(ROOT_TOKEN, self.callback_selector.as_str(), all)
    }

    /// Encode and send an already built envelope, fire-and-forget.
    pub fn post(&self, envelope: &Envelope) -> Result<()> {
        let text = self.codec.encode(envelope).map_err(|e| {
            error!(receiver = %envelope.receiver, selector = %envelope.selector, err = %e, "message encode failure");
            e
        })?;
        debug!(receiver = %envelope.receiver, selector = %envelope.selector, "send");
        self.transport.send_raw(&text).map_err(|e| {
            error!(receiver = %envelope.receiver, selector = %envelope.selector, err = %e, "transport send failure");
            BridgeError::from(e)
        })
    }

    /// Write a diagnostic line to the transport's sink.
    pub fn print(&self, text: &str) {
        self.transport.print(text)
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }
}
