//! Tests for the envelope codec.

extern crate callbridge;

use callbridge::envelope::{Envelope, EnvelopeCodec, OperationKey};
use callbridge::BridgeError;
use serde_json::{json, Value};

#[test]
fn test_decode_without_args_yields_empty_args() {
    let codec = EnvelopeCodec::default();
    let envelope = codec.decode(r#"{"receiver":"a.b","selector":"x"}"#).unwrap();
    assert_eq!(envelope.receiver, "a.b");
    assert_eq!(envelope.selector, "x");
    assert!(envelope.args.is_empty());
    assert_eq!(envelope.callback, None);
}

#[test]
fn test_decode_null_args_yields_empty_args() {
    let codec = EnvelopeCodec::default();
    let envelope = codec
        .decode(r#"{"receiver":"this","selector":"now","args":null}"#)
        .unwrap();
    assert!(envelope.args.is_empty());
}

#[test]
fn test_encode_then_decode_preserves_envelope() {
    let codec = EnvelopeCodec::default();
    let envelope = Envelope::new(
        "math",
        "square",
        vec![json!(4), json!({"nested": [1, 2]}), json!(null), json!("s")],
    )
    .with_callback("ref-1")
    .with_on_error("ref-2");
    let decoded = codec.decode(&codec.encode(&envelope).unwrap()).unwrap();
    assert_eq!(decoded, envelope);
}

#[test]
fn test_encode_always_writes_args() {
    let codec = EnvelopeCodec::default();
    let text = codec.encode(&Envelope::new("this", "now", vec![])).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["args"], json!([]));
    assert!(value.get("callback").is_none());
}

#[test]
fn test_decode_ignores_unknown_keys() {
    let codec = EnvelopeCodec::default();
    let envelope = codec
        .decode(r#"{"receiver":"this","selector":"x","args":[1],"stack":"at foo","version":3}"#)
        .unwrap();
    assert_eq!(envelope.args, vec![json!(1)]);
}

#[test]
fn test_decode_method_alias() {
    let codec = EnvelopeCodec::default();
    let envelope = codec
        .decode(r#"{"receiver":"console","method":"log","args":["hi"]}"#)
        .unwrap();
    assert_eq!(envelope.selector, "log");
}

#[test]
fn test_decode_method_alias_disabled() {
    let codec = EnvelopeCodec::new(OperationKey::Selector, false);
    let result = codec.decode(r#"{"receiver":"console","method":"log"}"#);
    assert!(matches!(result, Err(BridgeError::MalformedEnvelope(_))));
}

#[test]
fn test_decode_conflicting_operation_keys() {
    let codec = EnvelopeCodec::default();
    let result = codec.decode(r#"{"receiver":"r","selector":"a","method":"b"}"#);
    assert!(matches!(result, Err(BridgeError::MalformedEnvelope(_))));

    let same = codec
        .decode(r#"{"receiver":"r","selector":"a","method":"a"}"#)
        .unwrap();
    assert_eq!(same.selector, "a");
}

#[test]
fn test_decode_rejects_malformed_input() {
    let codec = EnvelopeCodec::default();
    for text in &[
        "not json",
        "[1,2,3]",
        r#"{"selector":"x"}"#,
        r#"{"receiver":"r"}"#,
        r#"{"receiver":"","selector":"x"}"#,
        r#"{"receiver":"r","selector":"x","args":"oops"}"#,
    ] {
        let result = codec.decode(text);
        assert!(
            matches!(result, Err(BridgeError::MalformedEnvelope(_))),
            "expected MalformedEnvelope for {}",
            text
        );
    }
}

#[test]
fn test_reply_codec() {
    let codec = EnvelopeCodec::default();
    assert_eq!(codec.encode_reply(&json!("ok")).unwrap(), r#""ok""#);
    assert_eq!(codec.decode_reply(r#""ok""#).unwrap(), json!("ok"));
    assert_eq!(codec.decode_reply("").unwrap(), Value::Null);
    assert!(matches!(
        codec.decode_reply("{oops"),
        Err(BridgeError::MalformedReply(_))
    ));
}
