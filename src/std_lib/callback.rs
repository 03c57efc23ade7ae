//! Stored-callback invoker.
//!
//! The remote side answers a reply-via-callback call with
//! `this.callDispatch(reference, replyArgs...)`; this handler takes the
//! function out of the local registry and runs it with the reply arguments.

use serde_json::Value;
use tracing::{debug, warn};

use crate::callback::CallbackRef;
use crate::error::{BridgeError, Result};
use crate::resolver::handler::{CallContext, HandlerError};
use crate::resolver::namespace::Namespace;

/// Register the invoker at the root under `selector`.
pub fn register(root: &mut Namespace, selector: &str) -> Result<()> {
    root.register_fn(selector, call_dispatch)
}

fn call_dispatch(cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
    let mut args = args.into_iter();
    let reference = match args.next() {
        Some(Value::String(reference)) => CallbackRef::from(reference),
        _ => {
            return Err(HandlerError::new(
                "first argument must be a callback reference (string)",
            ))
        }
    };

    match cx.callbacks().take(&reference) {
        Some(callback) => {
            debug!(reference = %reference, "invoking callback");
            callback(args.collect());
        }
        None => {
            // Stale or duplicate replies are dropped.
            let stale = BridgeError::StaleCallbackReference(reference.into_string());
            warn!(err = %stale, "dropping reply");
            cx.caller().print(&stale.to_string());
        }
    }
    Ok(Value::Null)
}
