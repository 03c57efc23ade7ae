//! # callbridge - call dispatch between an embedded script runtime and its host
//!
//! Two execution environments that share no memory and exchange only text
//! messages can invoke named operations on each other through a pair of
//! [`Bridge`](bridge::Bridge)es:
//! - JSON message envelopes (`receiver`, `selector`, `args`, `callback`)
//! - Receivers addressed by dotted namespace paths resolved against an
//!   explicit handler tree
//! - Three call shapes: fire-and-forget, request/reply, and
//!   reply-via-callback
//! - Single-use callback references so transient functions never outlive
//!   their reply
//!
//! ## Quick Start
//!
//! ### Request/reply across a loopback pair
//!
//! ```
//! use callbridge::bridge::BridgeConfig;
//! use callbridge::transport::connect;
//! use serde_json::json;
//!
//! let (script, host) = connect(BridgeConfig::default(), BridgeConfig::default()).unwrap();
//!
//! host.register_fn("math.square", |_cx, args| {
//!     let n: i64 = callbridge::resolver::arg(&args, 0)?;
//!     Ok(json!(n * n))
//! })
//! .unwrap();
//!
//! let result = script.send_and_wait("math", "square", vec![json!(7)]).unwrap();
//! assert_eq!(result, json!(49));
//! ```
//!
//! ### Reply via callback
//!
//! ```
//! use callbridge::bridge::BridgeConfig;
//! use callbridge::transport::connect;
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! let (script, host) = connect(BridgeConfig::default(), BridgeConfig::default()).unwrap();
//! host.register_fn("math.square", |_cx, args| {
//!     let n: i64 = callbridge::resolver::arg(&args, 0)?;
//!     Ok(json!(n * n))
//! })
//! .unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! script
//!     .send_with_callback("math", "square", move |reply| sink.lock().unwrap().extend(reply), vec![json!(4)])
//!     .unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![json!(16)]);
//! assert_eq!(script.pending_callbacks(), 0);
//! ```
//!
//! ## Wire format
//!
//! ```text
//! {"receiver":"math","selector":"square","args":[4],"callback":"<uuid-v4>"}
//! ```
//!
//! `receiver` is `"this"` (the root context) or a dotted path such as
//! `"a.b.c"`. `args` is always written, possibly empty. `callback` and
//! `onError` are present only for reply-via-callback. Unknown keys are
//! ignored on decode. Peers that name the operation `method` instead of
//! `selector` are accepted unless disabled in [`BridgeConfig`](bridge::BridgeConfig).
//!
//! A reply-via-callback result comes back as an ordinary fire-and-forget
//! envelope addressed to the root:
//!
//! ```text
//! {"receiver":"this","selector":"callDispatch","args":["<uuid-v4>",16]}
//! ```
//!
//! ## Failure handling
//!
//! | Failure | Outcome |
//! |---|---|
//! | malformed envelope | error returned to the transport hook, logged |
//! | unresolved receiver / unknown selector | logged through the sink, `null` reply |
//! | stale callback reference | logged through the sink, reply dropped |
//! | handler error | propagated (default) or recovered, see [`TargetErrorPolicy`](bridge::TargetErrorPolicy) |
//!
//! ## Architecture
//!
//! - **[`envelope`]** - envelope type and JSON codec
//! - **[`callback`]** - single-use callback registry
//! - **[`resolver`]** - receiver grammar, namespace tree, handlers
//! - **[`dispatch`]** - inbound dispatcher and outbound caller
//! - **[`std_lib`]** - built-in handlers (callback invoker, slots, console, scheduler)
//! - **[`transport`]** - transport primitives, inbound hooks, loopback
//! - **[`bridge`]** - one side of the bridge and its configuration

pub mod bridge;
pub mod callback;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod resolver;
pub mod std_lib;
pub mod transport;

pub use bridge::{Bridge, BridgeConfig};
pub use error::{BridgeError, Result};
