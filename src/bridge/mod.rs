//! One side of the bridge.
//!
//! A [`Bridge`] owns everything a side needs: the root [`Namespace`] inbound
//! envelopes are resolved against, the [`CallbackRegistry`] for
//! reply-via-callback, the outbound [`Caller`] and the inbound [`Dispatcher`].
//! Nothing is process-global, so any number of bridges can live in one process.
//!
//! Every bridge starts with the core built-ins installed (see
//! [`std_lib`](crate::std_lib)): the stored-callback invoker at the root, the
//! named-slot `set`/`get` pair and, unless disabled, `console`.

pub mod config;

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::callback::{CallbackRef, CallbackRegistry};
use crate::dispatch::{Caller, Dispatcher};
use crate::error::Result;
use crate::resolver::handler::{CallContext, Handler, HandlerError};
use crate::resolver::namespace::Namespace;
use crate::std_lib::register_core_builtins;
use crate::transport::{Inbound, Transport};

pub use config::{BridgeConfig, CodecConfig, DispatchConfig, TargetErrorPolicy};

pub struct Bridge {
    config: BridgeConfig,
    namespace: Arc<RwLock<Namespace>>,
    callbacks: Arc<CallbackRegistry>,
    caller: Caller,
    dispatcher: Dispatcher,
}

impl Bridge {
    pub fn new(config: BridgeConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let codec = config.codec();
        let callbacks = Arc::new(CallbackRegistry::new());
        let caller = Caller::new(
            codec.clone(),
            transport.clone(),
            callbacks.clone(),
            config.callback_selector.as_str(),
        );

        let mut root = Namespace::new();
        register_core_builtins(&mut root, &config)?;
        let namespace = Arc::new(RwLock::new(root));

        let dispatcher = Dispatcher::new(
            namespace.clone(),
            callbacks.clone(),
            caller.clone(),
            codec,
            transport,
            config.dispatch.clone(),
        );

        Ok(Bridge {
            config,
            namespace,
            callbacks,
            caller,
            dispatcher,
        })
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Result<Self> {
        Self::new(BridgeConfig::default(), transport)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn register(&self, path: &str, handler: Arc<dyn Handler>) -> Result<()> {
        self.namespace.write().register(path, handler)
    }

    pub fn register_fn<F>(&self, path: &str, f: F) -> Result<()>
    where
        F: Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.namespace.write().register_fn(path, f)
    }

    /// Write a globally visible named slot on the root context.
    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        self.namespace.write().set(name, value)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.namespace.read().get(name)
    }

    pub fn namespace(&self) -> &RwLock<Namespace> {
        &self.namespace
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Callbacks registered by this side whose reply has not arrived yet.
    pub fn pending_callbacks(&self) -> usize {
        self.callbacks.len()
    }

    pub fn send(&self, receiver: &str, selector: &str, args: Vec<Value>) -> Result<()> {
        self.caller.send(receiver, selector, args)
    }

    pub fn send_and_wait(&self, receiver: &str, selector: &str, args: Vec<Value>) -> Result<Value> {
        self.caller.send_and_wait(receiver, selector, args)
    }

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
        self.caller.send_with_callback(receiver, selector, on_return, args)
    }

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
        self.caller
            .send_with_callbacks(receiver, selector, on_return, on_error, args)
    }

    /// Make the remote side run the callback it registered under `reference`.
    pub fn invoke_callback(&self, reference: &str, args: Vec<Value>) -> Result<()> {
        self.caller.invoke_callback(reference, args)
    }
}

impl Inbound for Bridge {
    fn on_message(&self, text: &str) -> Result<()> {
        self.dispatcher.receive(text)
    }

    fn on_request(&self, text: &str) -> Result<String> {
        self.dispatcher.receive_sync(text)
    }
}
