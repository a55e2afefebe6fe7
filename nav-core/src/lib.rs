//! # hashnav-core
//!
//! Pure logic for hashnav (no I/O, instant tests).
//!
//! This crate holds the operating modes and the decisions made on every
//! native back/forward notification, the virtual stack with goback
//! planning, and sentinel classification. None of it touches native history.
//!
//! ## Design Philosophy
//!
//! Every function here takes what was observed and returns what to do:
//! - [`Mode::on_notification`] maps an observation to a list of [`Action`]s
//! - [`classify_sentinel`] maps the native payload and session marker to a [`SentinelStatus`]
//! - [`VirtualStack::plan_goback`] maps a goback target to a [`GobackPlan`]
//!
//! The `hashnav` crate performs the native calls these decisions describe.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod mode;
pub mod sentinel;
pub mod stack;

pub use clock::MonotonicClock;
pub use mode::{Action, Mode, NativeState, Observed};
pub use sentinel::{classify_sentinel, SentinelStatus};
pub use stack::{find_target, GobackPlan, GobackTarget, Predicate, VirtualStack};
