//! Named-slot store: `set` and `get` on the root context, callable remotely.

use serde_json::Value;

use crate::error::Result;
use crate::resolver::handler::{arg, CallContext, HandlerError};
use crate::resolver::namespace::Namespace;

pub fn register(root: &mut Namespace, builtin_namespace: &str) -> Result<()> {
    root.register_fn(&format!("{}.set", builtin_namespace), slot_set)?;
    root.register_fn(&format!("{}.get", builtin_namespace), slot_get)?;
    Ok(())
}

/// set(name, value) - add or replace a root-level value.
fn slot_set(cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
    let name: String = arg(&args, 0)?;
    let value = args.get(1).cloned().unwrap_or(Value::Null);
    cx.set(&name, value)?;
    Ok(Value::Null)
}

/// get(name) - the root-level value, or null.
fn slot_get(cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
    let name: String = arg(&args, 0)?;
    Ok(cx.get(&name).unwrap_or(Value::Null))
}
