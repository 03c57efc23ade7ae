//! Console built-in object.
//!
//! Provides console.log, console.info, console.warn and console.error, which
//! forward their arguments to the host's log.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::resolver::handler::{CallContext, HandlerError};
use crate::resolver::namespace::Namespace;

/// Register the console object into the root namespace.
pub fn register(root: &mut Namespace) -> Result<()> {
    root.register_fn("console.log", console_log)?;
    root.register_fn("console.info", console_log)?;
    root.register_fn("console.warn", console_warn)?;
    root.register_fn("console.error", console_error)?;
    Ok(())
}

/// Format a value for console output.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format all arguments for console output.
pub fn format_line(args: &[Value]) -> String {
    args.iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(" ")
}

fn console_log(_cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
    info!(target: "callbridge::console", "{}", format_line(&args));
    Ok(Value::Null)
}

fn console_warn(_cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
    warn!(target: "callbridge::console", "{}", format_line(&args));
    Ok(Value::Null)
}

fn console_error(_cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
    error!(target: "callbridge::console", "{}", format_line(&args));
    Ok(Value::Null)
}
