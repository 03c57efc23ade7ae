use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::resolver::handler::{CallContext, Handler, HandlerError};
use crate::resolver::receiver::parse_target;

/// A member of a [`Namespace`].
pub enum Member {
    Namespace(Namespace),
    Handler(Arc<dyn Handler>),
    /// A plain value, e.g. a named slot written through `set`.
    Value(Value),
}

impl Member {
    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Member::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Arc<dyn Handler>> {
        match self {
            Member::Handler(h) => Some(h),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Member::Namespace(_) => "namespace",
            Member::Handler(_) => "handler",
            Member::Value(_) => "value",
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Namespace(ns) => write!(f, "Member::Namespace({:?})", ns),
            Member::Handler(_) => write!(f, "Member::Handler(...)"),
            Member::Value(v) => write!(f, "Member::Value({})", v),
        }
    }
}

/// A node of the root context: named members, some of which are nested
/// namespaces. The root namespace is what receivers are resolved against.
///
/// The tree is built explicitly at startup (or by handlers at runtime) so the
/// set of callable targets is exactly what was registered.
#[derive(Default)]
pub struct Namespace {
    members: BTreeMap<String, Member>,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace {
            members: BTreeMap::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// The nested namespace bound to `name`, if `name` is a namespace.
    pub fn child(&self, name: &str) -> Option<&Namespace> {
        self.members.get(name).and_then(Member::as_namespace)
    }

    pub fn insert(&mut self, name: impl Into<String>, member: Member) -> Option<Member> {
        self.members.insert(name.into(), member)
    }

    pub fn remove(&mut self, name: &str) -> Option<Member> {
        self.members.remove(name)
    }

    /// Register `handler` at a dotted `path` such as `"math.square"`,
    /// creating intermediate namespaces. An existing member at the final
    /// segment is replaced.
    pub fn register(&mut self, path: &str, handler: Arc<dyn Handler>) -> Result<()> {
        let segments = parse_target(path)?;
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(BridgeError::Registration(format!("empty path `{}`", path))),
        };

        let mut ns = self;
        for segment in parents {
            let member = ns
                .members
                .entry(segment.clone())
                .or_insert_with(|| Member::Namespace(Namespace::new()));
            ns = match member {
                Member::Namespace(child) => child,
                other => {
                    return Err(BridgeError::Registration(format!(
                        "cannot register `{}`: `{}` is a {}",
                        path,
                        segment,
                        other.kind()
                    )))
                }
            };
        }
        ns.members.insert(last.clone(), Member::Handler(handler));
        Ok(())
    }

    pub fn register_fn<F>(&mut self, path: &str, f: F) -> Result<()>
    where
        F: Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.register(path, Arc::new(f))
    }

    /// Write a named slot directly on this namespace.
    ///
    /// Slots share the member table with handlers and namespaces; a name
    /// already bound to one of those is not overwritten.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match self.members.get(name) {
            Some(Member::Namespace(_)) | Some(Member::Handler(_)) => Err(BridgeError::Registration(
                format!("`{}` is not a value slot", name),
            )),
            _ => {
                self.members.insert(name.to_string(), Member::Value(value));
                Ok(())
            }
        }
    }

    /// Read a named slot. Handlers and namespaces have no value.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.members.get(name) {
            Some(Member::Value(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.members.keys()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.members.iter()).finish()
    }
}
