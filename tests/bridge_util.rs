#![allow(dead_code)]

extern crate callbridge;

use callbridge::bridge::{Bridge, BridgeConfig};
use callbridge::resolver::handler::{arg, CallContext, HandlerError};
use callbridge::transport::{Transport, TransportError};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

/// Transport that records everything a bridge pushes out.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<String>>,
    printed: Mutex<Vec<String>>,
    requests: Mutex<Vec<String>>,
    reply: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingTransport::default())
    }

    /// Text returned by the next `send_raw_and_wait`.
    pub fn reply_with(&self, text: &str) {
        *self.reply.lock() = Some(text.to_string());
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn sent_json(&self) -> Vec<Value> {
        self.sent
            .lock()
            .iter()
            .map(|s| serde_json::from_str(s).unwrap())
            .collect()
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.lock().clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Transport for RecordingTransport {
    fn print(&self, text: &str) {
        self.printed.lock().push(text.to_string());
    }

    fn send_raw(&self, text: &str) -> Result<(), TransportError> {
        self.sent.lock().push(text.to_string());
        Ok(())
    }

    fn send_raw_and_wait(&self, text: &str) -> Result<String, TransportError> {
        self.requests.lock().push(text.to_string());
        self.reply
            .lock()
            .take()
            .ok_or(TransportError::Disconnected)
    }
}

pub fn recording_bridge(config: BridgeConfig) -> (Bridge, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let bridge = Bridge::new(config, transport.clone()).unwrap();
    (bridge, transport)
}

pub fn square(_cx: &CallContext<'_>, args: Vec<Value>) -> Result<Value, HandlerError> {
    let n: i64 = arg(&args, 0)?;
    Ok(json!(n * n))
}

pub fn boom(_cx: &CallContext<'_>, _args: Vec<Value>) -> Result<Value, HandlerError> {
    Err(HandlerError::new("boom"))
}
