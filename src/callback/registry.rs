use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

/// A function held on behalf of the remote side, invoked with the reply arguments.
pub type Callback = Box<dyn FnOnce(Vec<Value>) + Send>;

/// Opaque single-use reference standing in for a [`Callback`] across the transport.
///
/// Rendered as a hyphenated version-4 UUID (36 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackRef(String);

impl CallbackRef {
    fn generate() -> Self {
        CallbackRef(Uuid::new_v4().to_hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for CallbackRef {
    fn from(s: &str) -> Self {
        CallbackRef(s.to_string())
    }
}

impl From<String> for CallbackRef {
    fn from(s: String) -> Self {
        CallbackRef(s)
    }
}

impl Display for CallbackRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Entry {
    callback: Callback,
    /// Released together with this entry (the other outcome of a callback pair).
    sibling: Option<CallbackRef>,
}

/// Stores callbacks under single-use references.
///
/// `take` removes the entry it returns, so each reference resolves to a function
/// at most once. There is no expiry: a callback whose reply never arrives stays
/// registered for the life of the registry.
pub struct CallbackRegistry {
    entries: Mutex<HashMap<CallbackRef, Entry>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        CallbackRegistry {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store `callback` under a fresh reference.
    pub fn put(&self, callback: Callback) -> CallbackRef {
        let reference = CallbackRef::generate();
        self.entries.lock().insert(
            reference.clone(),
            Entry {
                callback,
                sibling: None,
            },
        );
        trace!(reference = %reference, "callback registered");
        reference
    }

    /// Store two mutually exclusive callbacks (e.g. a return handler and an
    /// error handler). Taking either reference also discards the other.
    pub fn put_pair(&self, first: Callback, second: Callback) -> (CallbackRef, CallbackRef) {
        let first_ref = CallbackRef::generate();
        let second_ref = CallbackRef::generate();
        let mut entries = self.entries.lock();
        entries.insert(
            first_ref.clone(),
            Entry {
                callback: first,
                sibling: Some(second_ref.clone()),
            },
        );
        entries.insert(
            second_ref.clone(),
            Entry {
                callback: second,
                sibling: Some(first_ref.clone()),
            },
        );
        (first_ref, second_ref)
    }

    /// Remove and return the callback for `reference`.
    ///
    /// `None` means no function: never registered or already taken.
    pub fn take(&self, reference: &CallbackRef) -> Option<Callback> {
        let mut entries = self.entries.lock();
        let entry = entries.remove(reference)?;
        if let Some(sibling) = &entry.sibling {
            entries.remove(sibling);
        }
        Some(entry.callback)
    }

    pub fn contains(&self, reference: &CallbackRef) -> bool {
        self.entries.lock().contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
