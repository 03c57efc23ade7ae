use std::sync::Arc;

use crate::envelope::ROOT_TOKEN;
use crate::error::{BridgeError, Result};
use crate::resolver::handler::Handler;
use crate::resolver::namespace::{Member, Namespace};
use crate::resolver::receiver::{parse_target, Receiver};

/// The owner a target lives on, plus the member name to invoke on it.
///
/// Whether the member exists and is callable is left to the caller.
#[derive(Debug)]
pub struct ResolvedTarget<'a> {
    pub owner: &'a Namespace,
    pub member: String,
}

impl<'a> ResolvedTarget<'a> {
    pub fn lookup(&self) -> Option<&'a Member> {
        self.owner.member(&self.member)
    }

    /// A shared handle to the target, if the member is a handler.
    pub fn handler(&self) -> Option<Arc<dyn Handler>> {
        self.lookup().and_then(Member::as_handler).cloned()
    }
}

/// Resolve `receiver` (the root token or a dotted path) against `root` and
/// pair the resulting owner with `selector`.
pub fn resolve<'a>(root: &'a Namespace, receiver: &str, selector: &str) -> Result<ResolvedTarget<'a>> {
    let receiver = Receiver::parse(receiver)?;
    resolve_receiver(root, &receiver, selector)
}

pub fn resolve_receiver<'a>(
    root: &'a Namespace,
    receiver: &Receiver,
    selector: &str,
) -> Result<ResolvedTarget<'a>> {
    let owner = walk(root, receiver.segments(), receiver)?;
    Ok(ResolvedTarget {
        owner,
        member: selector.to_string(),
    })
}

/// Resolve a full dotted target such as `"a.b.c"`: `root.a.b` is the owner and
/// `c` the member. `"this"` alone has no member to name and is rejected.
pub fn resolve_path<'a>(root: &'a Namespace, path: &str) -> Result<ResolvedTarget<'a>> {
    if path == ROOT_TOKEN {
        return Err(BridgeError::InvalidReceiver {
            receiver: path.to_string(),
            detail: "the root token names no member; use `resolve` with a selector".to_string(),
        });
    }
    let segments = parse_target(path)?;
    let (member, parents) = match segments.split_last() {
        Some(split) => split,
        None => {
            return Err(BridgeError::InvalidReceiver {
                receiver: path.to_string(),
                detail: "empty path".to_string(),
            })
        }
    };
    let receiver = if parents.is_empty() {
        Receiver::Root
    } else {
        Receiver::Path(parents.to_vec())
    };
    let owner = walk(root, parents, &receiver)?;
    Ok(ResolvedTarget {
        owner,
        member: member.clone(),
    })
}

fn walk<'a>(root: &'a Namespace, segments: &[String], receiver: &Receiver) -> Result<&'a Namespace> {
    let mut context = root;
    for segment in segments {
        context = context
            .child(segment)
            .ok_or_else(|| BridgeError::UnresolvedReceiver {
                receiver: receiver.to_string(),
                segment: segment.clone(),
            })?;
    }
    Ok(context)
}
