//! Built-in handlers installed into every bridge.
//!
//! This module contains the stored-callback invoker, the named-slot store,
//! `console` and the optional function scheduler.

pub mod callback;
pub mod console;
pub mod core;
pub mod scheduler;
pub mod slots;

pub use self::core::register_core_builtins;
pub use scheduler::FunctionScheduler;
