//! Run lifecycle control.
//!
//! Owns the end-to-end build sequence: precondition validation, engine
//! invocation with the event drain, failure policy, and post-build cleanup.
//! Presentation stays in the reporter; this module decides what happens.

mod controller;

pub use controller::run_build;
