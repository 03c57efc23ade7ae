//! In-process transport that delivers straight into a peer bridge.
//!
//! Delivery is synchronous: `send_raw` returns after the peer has dispatched
//! the message. Two bridges wired together with [`connect`] behave like the
//! two sides of an embedding running in one thread.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{error, info};

use super::{Inbound, Transport, TransportError};
use crate::bridge::{Bridge, BridgeConfig};
use crate::error::BridgeError;

pub struct LoopbackTransport {
    name: String,
    peer: RwLock<Option<Weak<dyn Inbound>>>,
}

impl LoopbackTransport {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(LoopbackTransport {
            name: name.into(),
            peer: RwLock::new(None),
        })
    }

    /// Deliver outbound traffic to `peer`. Only a weak handle is kept.
    pub fn attach(&self, peer: Weak<dyn Inbound>) {
        *self.peer.write() = Some(peer);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn peer(&self) -> Result<Arc<dyn Inbound>, TransportError> {
        self.peer
            .read()
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(TransportError::Disconnected)
    }
}

impl Transport for LoopbackTransport {
    fn print(&self, text: &str) {
        info!(side = %self.name, "{}", text);
    }

    fn send_raw(&self, text: &str) -> Result<(), TransportError> {
        let peer = self.peer()?;
        // The sender does not wait on the outcome of a fire-and-forget message.
        if let Err(e) = peer.on_message(text) {
            error!(side = %self.name, err = %e, "peer failed to handle message");
        }
        Ok(())
    }

    fn send_raw_and_wait(&self, text: &str) -> Result<String, TransportError> {
        let peer = self.peer()?;
        peer.on_request(text)
            .map_err(|e| TransportError::Remote(e.to_string()))
    }
}

/// Build two bridges whose transports deliver into each other.
pub fn connect(left: BridgeConfig, right: BridgeConfig) -> Result<(Arc<Bridge>, Arc<Bridge>), BridgeError> {
    let left_transport = LoopbackTransport::new("left");
    let right_transport = LoopbackTransport::new("right");

    let left_bridge = Arc::new(Bridge::new(left, left_transport.clone())?);
    let right_bridge = Arc::new(Bridge::new(right, right_transport.clone())?);

    let left_inbound = Arc::downgrade(&left_bridge) as Weak<dyn Inbound>;
    let right_inbound = Arc::downgrade(&right_bridge) as Weak<dyn Inbound>;
    left_transport.attach(right_inbound);
    right_transport.attach(left_inbound);

    Ok((left_bridge, right_bridge))
}
