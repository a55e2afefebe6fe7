//! Operating modes of the navigation state machine.
//!
//! The active mode decides which public operations are legal and how a
//! native back/forward notification is interpreted. Interpreting a
//! notification is a pure function: it takes what was observed and returns
//! the actions to perform. The `hashnav` crate executes them against native
//! history, and those calls usually produce the next notification.

use std::fmt;

use hashnav_types::EntryKind;
use serde_json::Value;

/// Operating mode - exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Construction has not finished.
    #[default]
    Uninitialized,
    /// Ready for operations.
    Idle,
    /// Undoing a manual address edit: stepping back to the sentinel before
    /// pushing the typed address.
    Correcting {
        /// Address the user typed.
        target: String,
    },
    /// A goback is in flight.
    GoingBack,
    /// A push or replace is in flight.
    Navigating,
    /// `destroy()` is draining native history. Terminal.
    Destroying,
    /// The application asked to leave. Terminal.
    Exiting,
    /// An `on_change` hook is running.
    RunningHook {
        /// Mode restored once the hook settles.
        resume: Box<Mode>,
    },
}

impl Mode {
    /// Create the initial mode.
    pub fn new() -> Self {
        Self::Uninitialized
    }

    /// Whether a public operation must be rejected with `Busy`.
    ///
    /// `RunningHook` accepts a single parked call; once one is parked,
    /// further calls are busy.
    pub fn is_busy(&self, continuation_parked: bool) -> bool {
        match self {
            Self::Idle => false,
            Self::RunningHook { .. } => continuation_parked,
            _ => true,
        }
    }

    /// Whether this mode ends the instance's life.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Destroying | Self::Exiting)
    }

    /// Whether a push, replace or goback is in flight.
    pub fn is_transitional(&self) -> bool {
        matches!(self, Self::Navigating | Self::GoingBack)
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Idle => "idle",
            Self::Correcting { .. } => "correcting",
            Self::GoingBack => "going-back",
            Self::Navigating => "navigating",
            Self::Destroying => "destroying",
            Self::Exiting => "exiting",
            Self::RunningHook { .. } => "running-hook",
        }
    }

    /// Decide what to do about a native back/forward notification.
    pub fn on_notification(&self, observed: &Observed) -> Vec<Action> {
        match self {
            Self::Uninitialized => vec![],

            Self::Idle => match observed.state {
                // User pressed native back and landed on the sentinel
                NativeState::Goback => vec![Action::ReassertTop, Action::StartGoback],
                _ if observed.is_manual_edit() => vec![
                    Action::EnterCorrecting {
                        target: observed.new_address.clone(),
                    },
                    Action::Step(-2),
                ],
                _ => vec![Action::Reconcile, Action::Step(-1)],
            },

            Self::Correcting { target } => match observed.state {
                // Still on the typed entry or the old top; keep going back
                NativeState::Normal => vec![Action::Step(-1)],
                NativeState::Goback => vec![
                    Action::EnterIdle,
                    Action::ReassertTop,
                    Action::StartPush {
                        target: target.clone(),
                    },
                ],
                NativeState::Empty | NativeState::Foreign => {
                    vec![Action::Reconcile, Action::Step(-1)]
                }
            },

            Self::Navigating | Self::GoingBack => {
                if observed.is_manual_edit() {
                    vec![Action::Reconcile]
                } else {
                    vec![Action::ReassertTop]
                }
            }

            Self::RunningHook { .. } | Self::Destroying | Self::Exiting => vec![Action::Step(-1)],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of the native current state payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeState {
    /// No payload at all (a fresh entry from an address edit or link).
    Empty,
    /// A payload hashnav did not write.
    Foreign,
    /// A normal entry written by hashnav.
    Normal,
    /// The sentinel.
    Goback,
}

impl NativeState {
    /// Classify a native payload.
    pub fn of(payload: Option<&Value>) -> Self {
        match payload {
            None | Some(Value::Null) => Self::Empty,
            Some(value) => match EntryKind::of_payload(value) {
                Some(EntryKind::Normal) => Self::Normal,
                Some(EntryKind::Goback) => Self::Goback,
                None => Self::Foreign,
            },
        }
    }

    /// The entry kind, if hashnav wrote the payload.
    pub fn kind(self) -> Option<EntryKind> {
        match self {
            Self::Normal => Some(EntryKind::Normal),
            Self::Goback => Some(EntryKind::Goback),
            Self::Empty | Self::Foreign => None,
        }
    }
}

/// What was observed when a notification arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    /// Native current payload after the step.
    pub state: NativeState,
    /// Address before the step.
    pub old_address: String,
    /// Address after the step.
    pub new_address: String,
    /// Href of the virtual stack's top.
    pub top_href: String,
}

impl Observed {
    /// The user left the current top by editing the address (or following
    /// a link that bypassed the API).
    ///
    /// This is a best guess: the step could also have come from somewhere
    /// else that happens to share the top's address.
    pub fn is_manual_edit(&self) -> bool {
        self.state == NativeState::Empty && self.old_address == self.top_href
    }
}

/// Actions executed by the `hashnav` crate, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Push the virtual top natively again (unlabelled).
    ReassertTop,
    /// Run reconciliation: re-establish "sentinel, then current entry".
    Reconcile,
    /// Step native history by this delta.
    Step(i64),
    /// Switch to `Correcting` with the typed address.
    EnterCorrecting {
        /// Address to push once the sentinel is reached.
        target: String,
    },
    /// Switch to `Idle`.
    EnterIdle,
    /// Start `goback(1)` on a new task.
    StartGoback,
    /// Start `push(target)` on a new task.
    StartPush {
        /// Address to push.
        target: String,
    },
}
