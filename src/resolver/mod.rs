//! Namespace resolution of envelope receivers.
//!
//! Every bridge owns a root [`Namespace`]. Handlers are registered under
//! dotted paths and an inbound envelope's `receiver` is walked segment by
//! segment from the root to find the owner of `selector`:
//!
//! ```text
//! receiver "math.trig", selector "sin"
//!      ↓
//! root ─ math ─ trig ─ sin   (handler)
//!        ^ each segment must be a namespace, else UnresolvedReceiver
//! ```
//!
//! The receiver `"this"` names the root itself. Receiver text is parsed with a
//! small pest grammar (`receiver.pest`): the root token, or identifiers made of
//! ASCII letters, digits, `_` and `$` joined by dots.
//!
//! ## Example
//!
//! ```
//! use callbridge::resolver::{resolve, Namespace};
//! use serde_json::{json, Value};
//!
//! let mut root = Namespace::new();
//! root.register_fn("math.square", |_cx, args: Vec<Value>| {
//!     let n = args.first().and_then(Value::as_i64).unwrap_or(0);
//!     Ok(json!(n * n))
//! })
//! .unwrap();
//!
//! let target = resolve(&root, "math", "square").unwrap();
//! assert_eq!(target.member, "square");
//! assert!(target.handler().is_some());
//! assert!(resolve(&root, "math.trig", "sin").is_err());
//! ```

pub mod handler;
pub mod namespace;
pub mod receiver;
pub mod resolve;

pub use handler::{arg, CallContext, Handler, HandlerError};
pub use namespace::{Member, Namespace};
pub use receiver::Receiver;
pub use resolve::{resolve, resolve_path, resolve_receiver, ResolvedTarget};
