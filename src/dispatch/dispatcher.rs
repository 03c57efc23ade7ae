use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{CallMode, Caller};
use crate::bridge::config::{DispatchConfig, TargetErrorPolicy};
use crate::callback::CallbackRegistry;
use crate::envelope::{Envelope, EnvelopeCodec};
use crate::error::{BridgeError, Result};
use crate::resolver::handler::{CallContext, HandlerError};
use crate::resolver::namespace::Namespace;
use crate::resolver::receiver::Receiver;
use crate::resolver::resolve::resolve_receiver;
use crate::transport::Transport;

/// Receives envelopes from the transport, resolves their target in the root
/// namespace and invokes it.
///
/// Unresolvable receivers and unknown selectors are logged through the sink
/// and answered with `null`; one bad message never stops the bridge. Handler
/// failures follow [`TargetErrorPolicy`].
pub struct Dispatcher {
    namespace: Arc<RwLock<Namespace>>,
    callbacks: Arc<CallbackRegistry>,
    caller: Caller,
    codec: EnvelopeCodec,
    transport: Arc<dyn Transport>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        namespace: Arc<RwLock<Namespace>>,
        callbacks: Arc<CallbackRegistry>,
        caller: Caller,
        codec: EnvelopeCodec,
        transport: Arc<dyn Transport>,
        config: DispatchConfig,
    ) -> Self {
        Dispatcher {
            namespace,
            callbacks,
            caller,
            codec,
            transport,
            config,
        }
    }

    /// Fire-and-forget hook.
    pub fn receive(&self, text: &str) -> Result<()> {
        let envelope = self.decode(text)?;
        self.dispatch(envelope, CallMode::FireAndForget)?;
        Ok(())
    }

    /// Request/reply hook; returns the encoded return value.
    pub fn receive_sync(&self, text: &str) -> Result<String> {
        let envelope = self.decode(text)?;
        let result = self.dispatch(envelope, CallMode::RequestReply)?;
        self.codec.encode_reply(&result)
    }

    fn decode(&self, text: &str) -> Result<Envelope> {
        self.codec.decode(text).map_err(|e| {
            error!(err = %e, "not a valid envelope");
            self.transport.print(&format!("not a valid envelope: {}", e));
            e
        })
    }

    /// Resolve and invoke the envelope's target.
    ///
    /// Returns the handler's result for [`CallMode::RequestReply`]; for
    /// [`CallMode::FireAndForget`] the result goes to the envelope's callback
    /// (if any) and `null` is returned.
    pub fn dispatch(&self, mut envelope: Envelope, mode: CallMode) -> Result<Value> {
        let receiver = match Receiver::parse(&envelope.receiver) {
            Ok(receiver) => receiver,
            Err(e) => return self.recover(&envelope, e),
        };

        let handler = {
            let root = self.namespace.read();
            let resolved = resolve_receiver(&root, &receiver, &envelope.selector);
            match resolved {
                Ok(target) => target.handler(),
                Err(e) => return self.recover(&envelope, e),
            }
        };
        let handler = match handler {
            Some(handler) => handler,
            None => {
                let e = BridgeError::UnknownSelector {
                    receiver: envelope.receiver.clone(),
                    selector: envelope.selector.clone(),
                };
                return self.recover(&envelope, e);
            }
        };

        debug!(receiver = %envelope.receiver, selector = %envelope.selector, ?mode, "perform");
        let args = std::mem::take(&mut envelope.args);
        let cx = CallContext::new(
            &receiver,
            &envelope.selector,
            mode,
            &self.namespace,
            &self.callbacks,
            &self.caller,
        );
        let outcome = handler.call(&cx, args);

        match (outcome, mode) {
            (Ok(result), CallMode::RequestReply) => Ok(result),
            (Ok(result), CallMode::FireAndForget) => {
                self.forward_result(&envelope, result)?;
                Ok(Value::Null)
            }
            (Err(e), _) => self.target_failed(&envelope, mode, e),
        }
    }

    fn forward_result(&self, envelope: &Envelope, result: Value) -> Result<()> {
        match &envelope.callback {
            Some(reference) => self.caller.invoke_callback(reference, vec![result]),
            None => {
                if !result.is_null() && self.config.warn_unclaimed_results {
                    warn!(
                        receiver = %envelope.receiver,
                        selector = %envelope.selector,
                        %result,
                        "perform returned result but no callback was given"
                    );
                }
                Ok(())
            }
        }
    }

    fn target_failed(&self, envelope: &Envelope, mode: CallMode, e: HandlerError) -> Result<Value> {
        if let (CallMode::FireAndForget, Some(on_error)) = (mode, &envelope.on_error) {
            warn!(receiver = %envelope.receiver, selector = %envelope.selector, err = %e, "perform failed, reporting to caller");
            self.caller
                .invoke_callback(on_error, vec![Value::String(e.message().to_string())])?;
            return Ok(Value::Null);
        }

        let failure = BridgeError::TargetFailed {
            receiver: envelope.receiver.clone(),
            selector: envelope.selector.clone(),
            source: e,
        };
        match self.config.target_errors {
            TargetErrorPolicy::Propagate => {
                error!(err = %failure, "perform failed");
                Err(failure)
            }
            TargetErrorPolicy::Recover => self.recover(envelope, failure),
        }
    }

    fn recover(&self, envelope: &Envelope, e: BridgeError) -> Result<Value> {
        warn!(receiver = %envelope.receiver, selector = %envelope.selector, err = %e, "unable to perform");
        self.transport
            .print(&format!("unable to perform {}: {}", envelope, e));
        Ok(Value::Null)
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}
