//! Single-use callback references.
//!
//! Functions cannot cross the transport, so the sending side parks them in a
//! [`CallbackRegistry`] and ships the [`CallbackRef`] instead. The remote side
//! later sends the reference back together with the reply arguments and the
//! owning side takes the function out of the registry and runs it.
//!
//! ```
//! use callbridge::callback::CallbackRegistry;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let registry = CallbackRegistry::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = calls.clone();
//! let reference = registry.put(Box::new(move |_args| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! if let Some(callback) = registry.take(&reference) {
//!     callback(vec![]);
//! }
//! assert!(registry.take(&reference).is_none());
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

pub mod registry;

pub use registry::{Callback, CallbackRef, CallbackRegistry};
