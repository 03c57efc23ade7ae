//! Deferred callback invocation.
//!
//! The remote side asks for a stored callback to be run later:
//!
//! ```text
//! bridge.scheduler.schedule(afterMillis, callbackRef)
//! ```
//!
//! The scheduler holds a `callDispatch` envelope for `callbackRef` until its
//! due time and sends it back from [`FunctionScheduler::perform_calls_before`].
//! A delay of zero sends it right away.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error};

use crate::bridge::Bridge;
use crate::dispatch::Caller;
use crate::envelope::Envelope;
use crate::error::{BridgeError, Result};
use crate::resolver::handler::{arg, CallContext, HandlerError};

struct Queue {
    // Keyed by due time, then insertion order.
    calls: BTreeMap<(Instant, u64), Envelope>,
    next_seq: u64,
}

pub struct FunctionScheduler {
    queue: Mutex<Queue>,
    caller: Caller,
}

impl FunctionScheduler {
    pub fn new(caller: Caller) -> Self {
        FunctionScheduler {
            queue: Mutex::new(Queue {
                calls: BTreeMap::new(),
                next_seq: 0,
            }),
            caller,
        }
    }

    /// Create a scheduler sending through `bridge` and register its `schedule`
    /// handler under `<builtin namespace>.scheduler`.
    pub fn install(bridge: &Bridge) -> Result<Arc<FunctionScheduler>> {
        let scheduler = Arc::new(FunctionScheduler::new(bridge.caller().clone()));
        let path = format!("{}.scheduler.schedule", bridge.config().builtin_namespace);
        let handle = scheduler.clone();
        bridge.register_fn(&path, move |cx, args| handle.perform(cx, args))?;
        Ok(scheduler)
    }

    fn perform(&self, _cx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, HandlerError> {
        if args.len() != 2 {
            return Err(HandlerError::new("expected `after` and `then` arguments"));
        }
        let after: f64 = arg(&args, 0).map_err(|_| {
            HandlerError::new("first argument `after` must be delay in milliseconds (number)")
        })?;
        let then: String = arg(&args, 1).map_err(|_| {
            HandlerError::new("second argument `then` must be a function reference (string)")
        })?;
        self.schedule(after as i64, self.caller.callback_envelope(&then, vec![]))?;
        Ok(Value::Null)
    }

    /// Send `envelope` after `delay_millis`. Zero sends immediately.
    pub fn schedule(&self, delay_millis: i64, envelope: Envelope) -> Result<()> {
        if delay_millis < 0 {
            return Err(BridgeError::Schedule(
                "cannot schedule a function call in the past".to_string(),
            ));
        }
        if delay_millis == 0 {
            return self.caller.post(&envelope);
        }
        let due = Instant::now() + Duration::from_millis(delay_millis as u64);
        let mut queue = self.queue.lock();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        debug!(receiver = %envelope.receiver, selector = %envelope.selector, delay_millis, "scheduled");
        queue.calls.insert((due, seq), envelope);
        Ok(())
    }

    /// Send every call due strictly before `when`, earliest first.
    /// Returns how many were sent.
    pub fn perform_calls_before(&self, when: Instant) -> usize {
        let due = {
            let mut queue = self.queue.lock();
            let mut due = Vec::new();
            loop {
                let key = match queue.calls.keys().next() {
                    Some(key) if key.0 < when => *key,
                    _ => break,
                };
                if let Some(envelope) = queue.calls.remove(&key) {
                    due.push(envelope);
                }
            }
            due
        };

        let mut sent = 0;
        for envelope in due {
            match self.caller.post(&envelope) {
                Ok(()) => sent += 1,
                Err(e) => error!(receiver = %envelope.receiver, selector = %envelope.selector, err = %e, "scheduled call failed"),
            }
        }
        sent
    }

    /// Forget all pending calls.
    pub fn reset(&self) {
        self.queue.lock().calls.clear();
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.queue.lock().calls.keys().next().map(|key| key.0)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
