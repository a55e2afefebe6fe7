//! Lifecycle hooks.
//!
//! `on_before_change` runs before any mutation and may veto the navigation;
//! `on_change` runs after the virtual stack and native history were updated.
//! Both receive the same [`ChangeEvent`] for a given navigation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use hashnav_types::LocationSnapshot;
use serde::Serialize;

use crate::error::BoxError;
use crate::History;

/// What kind of navigation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The instance finished initializing.
    Init,
    /// A new entry was pushed.
    Push,
    /// The top entry was replaced.
    Replace,
    /// Entries were popped.
    Goback,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Push => "push",
            Self::Replace => "replace",
            Self::Goback => "goback",
        })
    }
}

/// A navigation as seen by the hooks.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    /// Kind of navigation.
    pub kind: ChangeKind,
    /// Top before the navigation; `None` for `Init`.
    pub old: Option<LocationSnapshot>,
    /// Top after the navigation.
    pub new: LocationSnapshot,
    /// Entries removed from the stack, most recent first.
    pub discarded: Vec<LocationSnapshot>,
    /// Entries added to the stack.
    pub inserted: Vec<LocationSnapshot>,
}

/// Follow-up run after a cancelled navigation.
pub type Continuation = Box<dyn FnOnce(History) -> BoxFuture<'static, ()> + Send>;

/// Verdict of an `on_before_change` hook.
pub enum BeforeChange {
    /// Let the navigation happen.
    Proceed,
    /// Veto it; the caller gets `HistoryError::Cancelled`.
    Cancel,
    /// Veto it with an error; the caller gets `HistoryError::Hook`.
    Fail(BoxError),
    /// Veto it, then run the continuation on a fresh task once the cancelled
    /// call has returned. Typically used to redirect.
    CancelThen(Continuation),
}

impl BeforeChange {
    /// Veto and run `f` afterwards.
    pub fn cancel_then<F, Fut>(f: F) -> Self
    where
        F: FnOnce(History) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::CancelThen(Box::new(move |history| f(history).boxed()))
    }

    /// Veto with `error`.
    pub fn fail(error: impl Into<BoxError>) -> Self {
        Self::Fail(error.into())
    }
}

impl fmt::Debug for BeforeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed => f.write_str("Proceed"),
            Self::Cancel => f.write_str("Cancel"),
            Self::Fail(err) => f.debug_tuple("Fail").field(err).finish(),
            Self::CancelThen(_) => f.write_str("CancelThen(..)"),
        }
    }
}

/// Installed `on_before_change` hook.
pub type BeforeChangeHook =
    Arc<dyn Fn(ChangeEvent) -> BoxFuture<'static, BeforeChange> + Send + Sync>;

/// Installed `on_change` hook.
pub type ChangeHook =
    Arc<dyn Fn(ChangeEvent) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

pub(crate) fn before_change_hook<F, Fut>(hook: F) -> BeforeChangeHook
where
    F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BeforeChange> + Send + 'static,
{
    Arc::new(move |event| hook(event).boxed())
}

pub(crate) fn change_hook<F, Fut>(hook: F) -> ChangeHook
where
    F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    Arc::new(move |event| hook(event).boxed())
}
