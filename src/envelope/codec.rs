//! JSON text form of [`Envelope`] and of request/reply payloads.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Envelope, OperationKey};
use crate::error::{BridgeError, Result};

/// Encodes and decodes envelopes.
///
/// Encoding always writes `receiver`, the configured operation key, `args`
/// (even when empty) and the callback references that are present. Decoding
/// tolerates unknown keys, treats a missing or `null` `args` as an empty
/// sequence and rejects envelopes without a receiver or an operation.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    operation_key: OperationKey,
    accept_method_alias: bool,
}

impl EnvelopeCodec {
    pub fn new(operation_key: OperationKey, accept_method_alias: bool) -> Self {
        EnvelopeCodec {
            operation_key,
            accept_method_alias,
        }
    }

    pub fn operation_key(&self) -> OperationKey {
        self.operation_key
    }

    pub fn encode(&self, envelope: &Envelope) -> Result<String> {
        serde_json::to_string(&WireEnvelope {
            envelope,
            operation_key: self.operation_key,
        })
        .map_err(BridgeError::Encode)
    }

    pub fn decode(&self, text: &str) -> Result<Envelope> {
        let raw: RawEnvelope = serde_json::from_str(text)
            .map_err(|e| BridgeError::MalformedEnvelope(e.to_string()))?;

        let receiver = match raw.receiver {
            Some(r) if !r.is_empty() => r,
            _ => {
                return Err(BridgeError::MalformedEnvelope(
                    "missing receiver".to_string(),
                ))
            }
        };

        // The configured key is always accepted; the other one only as an alias.
        let primary = self.operation_key;
        let alternate = primary.alternate();
        let (given, aliased) = match primary {
            OperationKey::Selector => (non_empty(raw.selector), non_empty(raw.method)),
            OperationKey::Method => (non_empty(raw.method), non_empty(raw.selector)),
        };
        let selector = match (given, aliased) {
            (Some(op), None) => op,
            (Some(op), Some(alias)) => {
                if op != alias {
                    return Err(BridgeError::MalformedEnvelope(format!(
                        "conflicting operation keys: {} `{}`, {} `{}`",
                        primary.field_name(),
                        op,
                        alternate.field_name(),
                        alias
                    )));
                }
                op
            }
            (None, Some(alias)) if self.accept_method_alias => {
                debug!(receiver = %receiver, operation = %alias, key = alternate.field_name(), "operation taken from alias field");
                alias
            }
            (None, Some(_)) => {
                return Err(BridgeError::MalformedEnvelope(format!(
                    "`{}` is not accepted as the operation key, expected `{}`",
                    alternate.field_name(),
                    primary.field_name()
                )))
            }
            (None, None) => {
                return Err(BridgeError::MalformedEnvelope(format!(
                    "missing {}",
                    primary.field_name()
                )))
            }
        };

        Ok(Envelope {
            receiver,
            selector,
            args: raw.args.unwrap_or_default(),
            callback: non_empty(raw.callback),
            on_error: non_empty(raw.on_error),
        })
    }

    /// Serializes the return value handed back through request/reply.
    pub fn encode_reply(&self, value: &Value) -> Result<String> {
        serde_json::to_string(value).map_err(BridgeError::Encode)
    }

    /// An empty reply is read as `null`.
    pub fn decode_reply(&self, text: &str) -> Result<Value> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(text).map_err(BridgeError::MalformedReply)
    }
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        EnvelopeCodec::new(OperationKey::Selector, true)
    }
}

// Older peers serialize absent references as "".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
struct RawEnvelope {
    receiver: Option<String>,
    selector: Option<String>,
    method: Option<String>,
    #[serde(default)]
    args: Option<Vec<Value>>,
    callback: Option<String>,
    #[serde(rename = "onError")]
    on_error: Option<String>,
}

struct WireEnvelope<'a> {
    envelope: &'a Envelope,
    operation_key: OperationKey,
}

impl<'a> Serialize for WireEnvelope<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let e = self.envelope;
        let len = 3 + e.callback.is_some() as usize + e.on_error.is_some() as usize;
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("receiver", &e.receiver)?;
        map.serialize_entry(self.operation_key.field_name(), &e.selector)?;
        map.serialize_entry("args", &e.args)?;
        if let Some(callback) = &e.callback {
            map.serialize_entry("callback", callback)?;
        }
        if let Some(on_error) = &e.on_error {
            map.serialize_entry("onError", on_error)?;
        }
        map.end()
    }
}
