//! Core built-ins registration.

use super::callback;
use super::console;
use super::slots;
use crate::bridge::BridgeConfig;
use crate::error::Result;
use crate::resolver::namespace::Namespace;

/// Register all core built-ins into a fresh root namespace.
pub fn register_core_builtins(root: &mut Namespace, config: &BridgeConfig) -> Result<()> {
    callback::register(root, &config.callback_selector)?;
    slots::register(root, &config.builtin_namespace)?;
    if config.install_console {
        console::register(root)?;
    }
    Ok(())
}
