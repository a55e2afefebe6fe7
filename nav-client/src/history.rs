//! The navigation state machine.
//!
//! [`History`] owns the virtual stack and keeps native history at exactly
//! two application entries: the sentinel and the current page. Public
//! operations rewrite the current native entry in place; native
//! back/forward notifications are interpreted by [`Mode::on_notification`]
//! and the resulting actions are executed here.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use hashnav_core::{
    classify_sentinel, find_target, Action, GobackTarget, Mode, MonotonicClock, NativeState,
    Observed, SentinelStatus, VirtualStack,
};
use hashnav_types::path::add_leading_slash;
use hashnav_types::{encode_data, Location, LocationSnapshot, NavigationEntry, PayloadError};
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::HistoryConfig;
use crate::error::{BoxError, HistoryError};
use crate::guard;
use crate::hooks::{
    before_change_hook, change_hook, BeforeChange, BeforeChangeHook, ChangeEvent, ChangeHook,
    ChangeKind,
};
use crate::native::{NativeHistory, Notification, SessionMarker};

/// Destroy polls without native movement before giving up.
const DESTROY_STALL_LIMIT: u32 = 3;

type Parked = oneshot::Sender<Result<(), HistoryError>>;

/// Closed when the operation holding it returns.
type Returned = Option<oneshot::Sender<()>>;

/// How an entry is written to native history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NativeWrite {
    /// Push after the current entry, titling the entry left behind with the
    /// back label.
    LabelledPush,
    /// Push after the current entry.
    Push,
    /// Overwrite the current entry.
    Replace,
}

impl NativeWrite {
    fn placing(status: SentinelStatus) -> Self {
        if status.requires_push() {
            Self::LabelledPush
        } else {
            Self::Replace
        }
    }
}

/// Where a push or replace puts its entry.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Push,
    Replace,
}

impl Placement {
    fn kind(self) -> ChangeKind {
        match self {
            Self::Push => ChangeKind::Push,
            Self::Replace => ChangeKind::Replace,
        }
    }
}

struct State {
    mode: Mode,
    stack: VirtualStack,
    sentinel: NavigationEntry,
    clock: MonotonicClock,
    pending: Option<Parked>,
    before_change: Option<BeforeChangeHook>,
    on_change: Option<ChangeHook>,
}

impl State {
    fn set_mode(&mut self, mode: Mode) {
        debug!(from = %self.mode, to = %mode, "mode transition");
        self.mode = mode;

        // Replay the parked call
        if self.mode == Mode::Idle {
            if let Some(parked) = self.pending.take() {
                let _ = parked.send(Ok(()));
            }
        }
    }

    fn park(&mut self) -> oneshot::Receiver<Result<(), HistoryError>> {
        let (tx, rx) = oneshot::channel();
        self.pending = Some(tx);
        rx
    }

    fn reject_parked(&mut self) {
        if let Some(parked) = self.pending.take() {
            let _ = parked.send(Err(HistoryError::Cancelled));
        }
    }

    fn tick(&mut self) -> i64 {
        self.clock.tick(now_ms())
    }
}

struct Shared {
    config: HistoryConfig,
    native: Arc<dyn NativeHistory>,
    session: Arc<dyn SessionMarker>,
    state: Mutex<State>,
    owns_default_context: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn write_entry(&self, entry: &NavigationEntry, how: NativeWrite) -> Result<(), PayloadError> {
        let payload = entry.to_payload()?;
        self.write_payload(entry.href(), payload, how);
        Ok(())
    }

    fn write_payload(&self, href: &str, payload: Value, how: NativeWrite) {
        debug!(?how, href, "native write");
        match how {
            NativeWrite::LabelledPush => {
                self.native
                    .push_entry(Some(payload), Some(&self.config.back_label), href)
            }
            NativeWrite::Push => self.native.push_entry(Some(payload), None, href),
            NativeWrite::Replace => self.native.replace_entry(Some(payload), None, href),
        }
    }

    /// Rebuild the sentinel for time basis `now` and make sure native
    /// history has one behind (or at) the current position.
    fn ensure_sentinel(&self, now: i64) -> Result<(NavigationEntry, SentinelStatus), PayloadError> {
        let sentinel = NavigationEntry::sentinel(now);
        let current = NativeState::of(self.native.current_payload().as_ref()).kind();
        let status = classify_sentinel(current, self.session.is_set());
        if status == SentinelStatus::Missing {
            self.session.set(true);
            self.write_entry(&sentinel, NativeWrite::Replace)?;
        }
        Ok((sentinel, status))
    }

    fn reconcile(&self, state: &mut State, observed: &Observed) {
        warn!(
            payload = ?self.native.current_payload(),
            old = %observed.old_address,
            new = %observed.new_address,
            top = %observed.top_href,
            "unexpected native history state, reconciling"
        );

        let basis = state.sentinel.timestamp;
        let result = self.ensure_sentinel(basis).and_then(|(sentinel, status)| {
            state.sentinel = sentinel;
            self.write_entry(state.stack.top(), NativeWrite::placing(status))
        });
        if let Err(err) = result {
            warn!(%err, "reconciliation failed");
        }
    }

    fn release_context(&self) {
        if self.owns_default_context.swap(false, Ordering::SeqCst) {
            guard::release();
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let listener = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(listener) = listener {
            listener.abort();
        }
        self.release_context();
    }
}

/// App-like navigation over native history.
///
/// Cheap to clone; clones drive the same instance. Must be created inside
/// a Tokio runtime.
///
/// # Example
///
/// ```ignore
/// let native = MemoryHistory::new("/");
/// let history = History::new(HistoryConfig::default(), native, MemorySession::new())?;
///
/// history.push("/inbox", None).await?;
/// history.push_data("/inbox/42", &Message { id: 42 }).await?;
/// history.goback(1).await?;
/// assert_eq!(history.location().href(), "/inbox");
/// ```
#[derive(Clone)]
pub struct History {
    shared: Arc<Shared>,
}

impl History {
    /// Create an instance over `native` with no hooks installed.
    pub fn new<N, S>(config: HistoryConfig, native: N, session: S) -> Result<Self, HistoryError>
    where
        N: NativeHistory + 'static,
        S: SessionMarker + 'static,
    {
        HistoryBuilder::new().config(config).build(native, session)
    }

    /// Start building an instance with hooks installed before `init` fires.
    pub fn builder() -> HistoryBuilder {
        HistoryBuilder::new()
    }

    fn start(
        builder: HistoryBuilder,
        native: Arc<dyn NativeHistory>,
        session: Arc<dyn SessionMarker>,
    ) -> Result<Self, HistoryError> {
        let HistoryBuilder {
            config,
            before_change,
            on_change,
        } = builder;

        // Capability checks
        let runtime = Handle::try_current().map_err(|_| {
            HistoryError::InitializationFailed("a Tokio runtime is required".into())
        })?;
        if !native.is_available() {
            return Err(HistoryError::InitializationFailed(
                "native history is unavailable".into(),
            ));
        }
        let owns_default_context = native.is_default_context();
        if owns_default_context && !guard::claim() {
            return Err(HistoryError::ContextInUse);
        }

        // Build the initial stack
        let mut clock = MonotonicClock::new();
        let timestamp = clock.tick(now_ms());
        let initial =
            NavigationEntry::normal(&add_leading_slash(&native.current_address()), None, timestamp);
        let mut stack = VirtualStack::new(initial.clone());
        if config.insert_root && initial.href() != Location::href_of(&config.root) {
            stack.insert_root(NavigationEntry::normal(&config.root, None, timestamp));
        }

        // Dropping `shared` from here on releases the guard
        let shared = Arc::new(Shared {
            config,
            native,
            session,
            state: Mutex::new(State {
                mode: Mode::new(),
                stack,
                sentinel: NavigationEntry::sentinel(timestamp),
                clock,
                pending: None,
                before_change,
                on_change,
            }),
            owns_default_context: AtomicBool::new(owns_default_context),
            listener: Mutex::new(None),
        });

        // Place the initial entry after the sentinel
        let (sentinel, status) = shared.ensure_sentinel(timestamp)?;
        shared.write_entry(&initial, NativeWrite::placing(status))?;

        let (tx, rx) = mpsc::unbounded_channel();
        shared.native.listen(tx);
        let listener = runtime.spawn(listen(Arc::downgrade(&shared), rx));
        *shared.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(listener);

        let history = Self { shared };
        let (init_hook, len) = {
            let mut state = history.lock();
            state.sentinel = sentinel;
            let hook = state.on_change.clone();
            state.set_mode(match hook {
                Some(_) => Mode::RunningHook {
                    resume: Box::new(Mode::Idle),
                },
                None => Mode::Idle,
            });
            (hook, state.stack.len())
        };
        info!(href = initial.href(), len, ?status, "history initialized");

        if let Some(hook) = init_hook {
            let snapshot = initial.snapshot();
            let event = ChangeEvent {
                kind: ChangeKind::Init,
                old: None,
                new: snapshot.clone(),
                discarded: Vec::new(),
                inserted: vec![snapshot],
            };
            let history = history.clone();
            runtime.spawn(async move {
                if let Err(err) = hook(event).await {
                    warn!(%err, "init change hook failed");
                }
                history.finish_hook();
            });
        }

        Ok(history)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a new entry for `path`.
    pub async fn push(
        &self,
        path: &str,
        data: Option<Value>,
    ) -> Result<LocationSnapshot, HistoryError> {
        self.navigate(Placement::Push, Some(path.to_string()), data)
            .await
    }

    /// Push a new entry for `path` carrying `data`.
    pub async fn push_data<T>(&self, path: &str, data: &T) -> Result<LocationSnapshot, HistoryError>
    where
        T: Serialize + ?Sized,
    {
        let data = encode_data(data)?;
        self.push(path, Some(data)).await
    }

    /// Replace the top entry with one for `path`.
    pub async fn replace(
        &self,
        path: &str,
        data: Option<Value>,
    ) -> Result<LocationSnapshot, HistoryError> {
        self.navigate(Placement::Replace, Some(path.to_string()), data)
            .await
    }

    /// Replace the top entry with one for `path` carrying `data`.
    pub async fn replace_data<T>(
        &self,
        path: &str,
        data: &T,
    ) -> Result<LocationSnapshot, HistoryError>
    where
        T: Serialize + ?Sized,
    {
        let data = encode_data(data)?;
        self.replace(path, Some(data)).await
    }

    /// Replace the top entry with a fresh one for the same address, dropping
    /// its data.
    pub async fn reload(&self) -> Result<LocationSnapshot, HistoryError> {
        self.navigate(Placement::Replace, None, None).await
    }

    async fn navigate(
        &self,
        placement: Placement,
        path: Option<String>,
        data: Option<Value>,
    ) -> Result<LocationSnapshot, HistoryError> {
        let mut returned: Returned = None;
        self.acquire(Mode::Navigating).await?;

        // Build the entry and its event
        let prepared = {
            let mut state = self.lock();
            let timestamp = state.tick();
            let old = state.stack.top();
            let path = path.unwrap_or_else(|| old.href().to_string());
            let entry = NavigationEntry::normal(&path, data, timestamp);
            let event = ChangeEvent {
                kind: placement.kind(),
                old: Some(old.snapshot()),
                new: entry.snapshot(),
                discarded: match placement {
                    Placement::Push => Vec::new(),
                    Placement::Replace => vec![old.snapshot()],
                },
                inserted: vec![entry.snapshot()],
            };
            entry.to_payload().map(|payload| (entry, payload, event))
        };
        let (entry, payload, event) = self.or_restore(prepared)?;

        self.ask_before_change(event.clone(), &mut returned).await?;

        // Apply
        {
            let mut state = self.lock();
            if !state.mode.is_transitional() {
                return Err(HistoryError::Destroyed);
            }
            self.shared
                .write_payload(entry.href(), payload, NativeWrite::Replace);
            match placement {
                Placement::Push => state.stack.push(entry),
                Placement::Replace => {
                    state.stack.replace_top(entry);
                }
            }
        }

        settle().await;
        self.complete(event.clone()).await?;
        Ok(event.new)
    }

    /// Go back to `target`: a step count, a path, or a predicate.
    ///
    /// Returns `Ok(None)` without doing anything for a step count of zero or
    /// less. When nothing matches, the whole stack is discarded and a
    /// single entry is inserted: the given path, or the configured root.
    pub async fn goback(
        &self,
        target: impl Into<GobackTarget>,
    ) -> Result<Option<LocationSnapshot>, HistoryError> {
        let target = target.into();
        if target.is_noop() {
            return Ok(None);
        }
        let mut returned: Returned = None;
        self.acquire(Mode::GoingBack).await?;

        // Predicates run unlocked so they may read the history
        let snapshots = self.lock().stack.snapshots();
        let found = find_target(&snapshots, &target);

        let prepared = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let fallback = match &target {
                GobackTarget::Path(path) => path.clone(),
                _ => self.shared.config.root.clone(),
            };
            let clock = &mut state.clock;
            let plan = state.stack.plan_goback(found, || {
                NavigationEntry::normal(&fallback, None, clock.tick(now_ms()))
            });
            let event = ChangeEvent {
                kind: ChangeKind::Goback,
                old: Some(state.stack.top().snapshot()),
                new: plan.target.snapshot(),
                discarded: plan.discarded.iter().map(NavigationEntry::snapshot).collect(),
                inserted: plan.inserted.iter().map(NavigationEntry::snapshot).collect(),
            };
            plan.target
                .to_payload()
                .map(|payload| (plan, payload, event))
        };
        let (plan, payload, event) = self.or_restore(prepared)?;

        self.ask_before_change(event.clone(), &mut returned).await?;

        // Apply
        {
            let mut state = self.lock();
            if !state.mode.is_transitional() {
                return Err(HistoryError::Destroyed);
            }
            if !plan.discarded.is_empty() {
                self.shared
                    .write_payload(plan.target.href(), payload, NativeWrite::Replace);
            }
            state.stack.apply_goback(plan);
        }

        settle().await;
        self.complete(event.clone()).await?;
        Ok(Some(event.new))
    }

    /// Go back to the oldest entry satisfying `predicate`.
    pub async fn goback_matching<F>(
        &self,
        predicate: F,
    ) -> Result<Option<LocationSnapshot>, HistoryError>
    where
        F: Fn(&LocationSnapshot) -> bool + Send + Sync + 'static,
    {
        self.goback(GobackTarget::matching(predicate)).await
    }

    /// Leave the application: step native history back past the sentinel.
    ///
    /// Terminal; later operations fail with [`HistoryError::Destroyed`].
    pub fn exit(&self) -> Result<(), HistoryError> {
        let mut state = self.lock();
        if state.mode.is_terminal() {
            return Err(HistoryError::Destroyed);
        }
        state.reject_parked();
        state.set_mode(Mode::Exiting);
        info!(href = state.stack.top().href(), "exiting");
        self.shared.native.go(-1);
        Ok(())
    }

    /// Detach from native history and leave it at the current address with
    /// no sentinel in front.
    pub async fn destroy(&self) -> Result<(), HistoryError> {
        let top = {
            let mut state = self.lock();
            if state.mode == Mode::Destroying {
                return Err(HistoryError::Destroyed);
            }
            self.shared.native.unlisten();
            state.before_change = None;
            state.on_change = None;
            state.reject_parked();
            state.set_mode(Mode::Destroying);
            state.stack.top().href().to_string()
        };

        let listener = self
            .shared
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(listener) = listener {
            listener.abort();
        }

        self.shared.session.set(false);
        self.drain_native(&top).await;
        self.shared.release_context();

        info!(href = %top, "history destroyed");
        Ok(())
    }

    /// Step back until the sentinel is reached, then overwrite it with a
    /// bare entry at `top`.
    async fn drain_native(&self, top: &str) {
        let native = &self.shared.native;
        let interval = self.shared.config.destroy_poll_interval();
        let mut last = None;
        let mut stalled = 0;

        loop {
            let payload = native.current_payload();
            let position = (native.current_address(), payload.clone());
            if last.as_ref() == Some(&position) {
                stalled += 1;
                if stalled >= DESTROY_STALL_LIMIT {
                    warn!(address = %position.0, "native history stopped moving during destroy");
                    break;
                }
            } else {
                stalled = 0;
            }

            match NativeState::of(payload.as_ref()) {
                NativeState::Normal => native.go(-1),
                NativeState::Empty => {
                    tokio::time::sleep(interval).await;
                    break;
                }
                NativeState::Goback | NativeState::Foreign => native.replace_entry(None, None, top),
            }
            last = Some(position);
            tokio::time::sleep(interval).await;
        }
    }

    /// Enter `next`, or park until the running change hook settles.
    async fn acquire(&self, next: Mode) -> Result<(), HistoryError> {
        loop {
            let parked = {
                let mut state = self.lock();
                if state.mode.is_terminal() {
                    return Err(HistoryError::Destroyed);
                }
                if state.mode == Mode::Idle {
                    state.set_mode(next);
                    return Ok(());
                }
                if !matches!(state.mode, Mode::RunningHook { .. }) || state.pending.is_some() {
                    return Err(HistoryError::Busy);
                }
                state.park()
            };

            debug!("navigation parked until the change hook settles");
            match parked.await {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => return Err(err),
                Err(_) => return Err(HistoryError::Cancelled),
            }
        }
    }

    fn restore_idle(&self) {
        let mut state = self.lock();
        if state.mode.is_transitional() {
            state.set_mode(Mode::Idle);
        }
    }

    fn or_restore<T, E>(&self, result: Result<T, E>) -> Result<T, HistoryError>
    where
        E: Into<HistoryError>,
    {
        result.map_err(|err| {
            self.restore_idle();
            err.into()
        })
    }

    /// Run `on_before_change`. On a veto, `Idle` is restored before this
    /// returns. A redirect waits for `returned` to close.
    async fn ask_before_change(
        &self,
        event: ChangeEvent,
        returned: &mut Returned,
    ) -> Result<(), HistoryError> {
        let hook = self.lock().before_change.clone();
        let Some(hook) = hook else {
            return Ok(());
        };

        let err = match hook(event).await {
            BeforeChange::Proceed => return Ok(()),
            BeforeChange::Cancel => HistoryError::Cancelled,
            BeforeChange::Fail(err) => HistoryError::Hook(err),
            BeforeChange::CancelThen(continuation) => {
                self.restore_idle();
                let (tx, rx) = oneshot::channel();
                *returned = Some(tx);
                let history = self.clone();
                tokio::spawn(async move {
                    // Resolves once the cancelled call has returned
                    let _ = rx.await;
                    tokio::task::yield_now().await;
                    continuation(history).await;
                });
                return Err(HistoryError::Cancelled);
            }
        };
        debug!(%err, "navigation vetoed");
        self.restore_idle();
        Err(err)
    }

    /// Finish a navigation: run `on_change` in `RunningHook`, then go idle.
    async fn complete(&self, event: ChangeEvent) -> Result<(), HistoryError> {
        let hook = {
            let mut state = self.lock();
            if !state.mode.is_transitional() {
                return Ok(());
            }
            match state.on_change.clone() {
                Some(hook) => {
                    state.set_mode(Mode::RunningHook {
                        resume: Box::new(Mode::Idle),
                    });
                    hook
                }
                None => {
                    state.set_mode(Mode::Idle);
                    return Ok(());
                }
            }
        };

        let result = hook(event).await;
        self.finish_hook();
        result.map_err(HistoryError::Hook)
    }

    fn finish_hook(&self) {
        let mut state = self.lock();
        let resume = match &state.mode {
            Mode::RunningHook { resume } => Some(resume.as_ref().clone()),
            _ => None,
        };
        if let Some(resume) = resume {
            state.set_mode(resume);
        }
    }

    fn on_notification(&self, notification: Notification) {
        let native = &self.shared.native;
        let mut state = self.lock();
        let observed = Observed {
            state: NativeState::of(native.current_payload().as_ref()),
            old_address: notification.old_address,
            new_address: notification.new_address,
            top_href: state.stack.top().href().to_string(),
        };
        let actions = state.mode.on_notification(&observed);
        debug!(
            mode = %state.mode,
            native = ?observed.state,
            new = %observed.new_address,
            ?actions,
            "native notification"
        );

        for action in actions {
            match action {
                Action::ReassertTop => {
                    if let Err(err) = self.shared.write_entry(state.stack.top(), NativeWrite::Push)
                    {
                        warn!(%err, "failed to re-assert the current entry");
                    }
                }
                Action::Reconcile => self.shared.reconcile(&mut state, &observed),
                Action::Step(delta) => native.go(delta),
                Action::EnterCorrecting { target } => state.set_mode(Mode::Correcting { target }),
                Action::EnterIdle => state.set_mode(Mode::Idle),
                Action::StartGoback => self.spawn_follow_up("goback", |history| async move {
                    history.goback(1).await.map(|_| ())
                }),
                Action::StartPush { target } => {
                    self.spawn_follow_up("push", |history| async move {
                        history.push(&target, None).await.map(|_| ())
                    })
                }
            }
        }
    }

    fn spawn_follow_up<F, Fut>(&self, operation: &'static str, f: F)
    where
        F: FnOnce(History) -> Fut,
        Fut: Future<Output = Result<(), HistoryError>> + Send + 'static,
    {
        let follow_up = f(self.clone());
        tokio::spawn(async move {
            if let Err(err) = follow_up.await {
                warn!(%err, operation, "follow-up navigation failed");
            }
        });
    }

    /// Snapshots of the virtual stack, oldest first.
    pub fn stack(&self) -> Vec<LocationSnapshot> {
        self.lock().stack.snapshots()
    }

    /// Number of entries in the virtual stack.
    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    /// Always `false`: the stack holds at least the current entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a public operation would be refused right now.
    pub fn is_busy(&self) -> bool {
        let state = self.lock();
        state.mode.is_busy(state.pending.is_some())
    }

    /// Snapshot of the current entry.
    pub fn location(&self) -> LocationSnapshot {
        self.lock().stack.top().snapshot()
    }

    /// The active operating mode.
    pub fn mode(&self) -> Mode {
        self.lock().mode.clone()
    }

    /// Effective configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.shared.config
    }

    /// Install the `on_before_change` hook, replacing any previous one.
    pub fn set_on_before_change<F, Fut>(&self, hook: F)
    where
        F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BeforeChange> + Send + 'static,
    {
        self.lock().before_change = Some(before_change_hook(hook));
    }

    /// Remove the `on_before_change` hook.
    pub fn clear_on_before_change(&self) {
        self.lock().before_change = None;
    }

    /// Install the `on_change` hook, replacing any previous one.
    ///
    /// The hook must not await a navigation it starts on this history;
    /// spawn it instead and it will run once the hook returns.
    pub fn set_on_change<F, Fut>(&self, hook: F)
    where
        F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.lock().on_change = Some(change_hook(hook));
    }

    /// Remove the `on_change` hook.
    pub fn clear_on_change(&self) {
        self.lock().on_change = None;
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("History")
            .field("mode", &state.mode)
            .field("len", &state.stack.len())
            .field("top", &state.stack.top().href())
            .finish()
    }
}

/// Builder for [`History`].
#[derive(Default)]
pub struct HistoryBuilder {
    config: HistoryConfig,
    before_change: Option<BeforeChangeHook>,
    on_change: Option<ChangeHook>,
}

impl HistoryBuilder {
    /// Start with the default configuration and no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config`.
    pub fn config(mut self, config: HistoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Install an `on_before_change` hook.
    pub fn on_before_change<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BeforeChange> + Send + 'static,
    {
        self.before_change = Some(before_change_hook(hook));
        self
    }

    /// Install an `on_change` hook; it also receives the `init` event.
    pub fn on_change<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.on_change = Some(change_hook(hook));
        self
    }

    /// Create the instance over `native`.
    pub fn build<N, S>(self, native: N, session: S) -> Result<History, HistoryError>
    where
        N: NativeHistory + 'static,
        S: SessionMarker + 'static,
    {
        History::start(self, Arc::new(native), Arc::new(session))
    }
}

impl fmt::Debug for HistoryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryBuilder")
            .field("config", &self.config)
            .field("on_before_change", &self.before_change.is_some())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

async fn listen(shared: Weak<Shared>, mut rx: mpsc::UnboundedReceiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        let Some(shared) = shared.upgrade() else {
            break;
        };
        History { shared }.on_notification(notification);
    }
}

/// Let queued notifications be observed before the change hook runs.
async fn settle() {
    tokio::task::yield_now().await;
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{MemoryHistory, MemorySession, NativeCall};
    use hashnav_types::EntryKind;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn test_config() -> HistoryConfig {
        HistoryConfig::default().with_destroy_poll_interval(Duration::from_millis(1))
    }

    fn start(initial: &str) -> (History, MemoryHistory, MemorySession) {
        let native = MemoryHistory::new(initial);
        let session = MemorySession::new();
        let history = History::new(test_config(), native.clone(), session.clone()).unwrap();
        (history, native, session)
    }

    async fn settle_all() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    fn hrefs(history: &History) -> Vec<String> {
        history.stack().iter().map(|s| s.href().to_string()).collect()
    }

    fn kind_of(payload: Option<&Value>) -> Option<EntryKind> {
        payload.and_then(EntryKind::of_payload)
    }

    fn record_changes(history: &History) -> Arc<Mutex<Vec<ChangeEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        history.set_on_change(move |event| {
            sink.lock().unwrap().push(event);
            async { Ok(()) }
        });
        events
    }

    fn assert_two_native_entries(native: &MemoryHistory, current: &str) {
        let entries = native.entries();
        assert_eq!(entries.len(), 2, "native entries: {entries:?}");
        assert_eq!(native.index(), 1);
        assert_eq!(kind_of(entries[0].payload.as_ref()), Some(EntryKind::Goback));
        assert_eq!(kind_of(entries[1].payload.as_ref()), Some(EntryKind::Normal));
        assert_eq!(entries[1].address, current);
    }

    #[tokio::test]
    async fn init_places_sentinel_behind_initial_entry() {
        let (history, native, session) = start("/");

        assert_two_native_entries(&native, "/");
        let entries = native.entries();
        assert_eq!(entries[0].address, "/goback");
        assert_eq!(entries[0].title.as_deref(), Some("go back"));
        assert!(session.is_set());

        assert_eq!(hrefs(&history), vec!["/"]);
        assert_eq!(history.mode(), Mode::Idle);
        assert!(!history.is_busy());
        assert!(!history.is_empty());
    }

    #[tokio::test]
    async fn init_inserts_root_below_deep_link() {
        let (history, _native, _session) = start("/deep?x=1");
        assert_eq!(hrefs(&history), vec!["/", "/deep?x=1"]);

        let native = MemoryHistory::new("/deep");
        let history = History::new(
            test_config().with_insert_root(false),
            native,
            MemorySession::new(),
        )
        .unwrap();
        assert_eq!(hrefs(&history), vec!["/deep"]);
    }

    #[tokio::test]
    async fn restart_reuses_established_sentinel() {
        let (history, native, session) = start("/");
        history.push("/a", None).await.unwrap();
        drop(history);
        native.clear_calls();

        let history = History::new(test_config(), native.clone(), session).unwrap();
        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert_two_native_entries(&native, "/a");
        assert_eq!(
            native.calls(),
            vec![NativeCall::Replace {
                address: "/a".into()
            }]
        );
    }

    #[tokio::test]
    async fn push_appends_and_rewrites_native_in_place() {
        let (history, native, _session) = start("/");

        let location = history.push("/a?q=1", Some(json!({"n": 1}))).await.unwrap();
        assert_eq!(location.pathname(), "/a");
        assert_eq!(location.search(), "?q=1");
        assert_eq!(location.state(), Some(&json!({"n": 1})));

        assert_eq!(hrefs(&history), vec!["/", "/a?q=1"]);
        assert_two_native_entries(&native, "/a?q=1");
        assert_eq!(history.location().href(), "/a?q=1");
    }

    #[tokio::test]
    async fn keys_increase_across_pushes() {
        let (history, _native, _session) = start("/");
        history.push("/a", None).await.unwrap();
        history.push("/b", None).await.unwrap();

        let keys: Vec<i64> = history
            .stack()
            .iter()
            .map(|s| s.key().parse().unwrap())
            .collect();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "{keys:?}");
    }

    #[tokio::test]
    async fn replace_overwrites_top() {
        let (history, native, _session) = start("/");
        history.push("/a", None).await.unwrap();
        let events = record_changes(&history);

        history.replace("/b", None).await.unwrap();
        assert_eq!(hrefs(&history), vec!["/", "/b"]);
        assert_two_native_entries(&native, "/b");

        let events = events.lock().unwrap();
        assert_eq!(events[0].kind, ChangeKind::Replace);
        assert_eq!(events[0].discarded[0].href(), "/a");
        assert_eq!(events[0].inserted[0].href(), "/b");
    }

    #[tokio::test]
    async fn typed_data_round_trips() {
        #[derive(Debug, PartialEq, Serialize, serde::Deserialize)]
        struct Draft {
            id: u32,
        }

        let (history, _native, _session) = start("/");
        let location = history.push_data("/draft", &Draft { id: 7 }).await.unwrap();
        assert_eq!(location.state_as::<Draft>().unwrap(), Some(Draft { id: 7 }));

        history.replace_data("/draft", &Draft { id: 8 }).await.unwrap();
        assert_eq!(
            history.location().state_as::<Draft>().unwrap(),
            Some(Draft { id: 8 })
        );
    }

    #[tokio::test]
    async fn unserializable_data_fails_before_mutation() {
        let (history, native, _session) = start("/");
        let mut data = HashMap::new();
        data.insert((1, 2), 3);

        let err = history.push_data("/a", &data).await.unwrap_err();
        assert!(matches!(err, HistoryError::Serialization(_)));
        assert_eq!(hrefs(&history), vec!["/"]);
        assert_eq!(native.current_address(), "/");
        assert_eq!(history.mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn goback_by_steps_path_and_predicate() {
        let (history, native, _session) = start("/");
        for path in ["/a", "/b", "/c"] {
            history.push(path, None).await.unwrap();
        }

        let landed = history.goback(2).await.unwrap().unwrap();
        assert_eq!(landed.href(), "/a");
        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert_two_native_entries(&native, "/a");

        history.push("/b", None).await.unwrap();
        history.goback("a").await.unwrap();
        assert_eq!(hrefs(&history), vec!["/", "/a"]);

        history.push("/b", None).await.unwrap();
        history
            .goback_matching(|s| s.pathname() == "/")
            .await
            .unwrap();
        assert_eq!(hrefs(&history), vec!["/"]);
    }

    #[tokio::test]
    async fn goback_without_match_inserts_a_fresh_entry() {
        let (history, native, _session) = start("/");
        history.push("/a", None).await.unwrap();
        let events = record_changes(&history);

        history.goback("/missing").await.unwrap();
        assert_eq!(hrefs(&history), vec!["/missing"]);
        assert_two_native_entries(&native, "/missing");

        history.push("/b", None).await.unwrap();
        history.goback(5).await.unwrap();
        assert_eq!(hrefs(&history), vec!["/"]);

        history.push("/c", None).await.unwrap();
        history.goback_matching(|_| false).await.unwrap();
        assert_eq!(hrefs(&history), vec!["/"]);

        let events = events.lock().unwrap();
        let first = &events[0];
        assert_eq!(first.kind, ChangeKind::Goback);
        let discarded: Vec<_> = first.discarded.iter().map(|s| s.href()).collect();
        assert_eq!(discarded, vec!["/a", "/"]);
        assert_eq!(first.inserted.len(), 1);
        assert_eq!(first.inserted[0].href(), "/missing");
    }

    #[tokio::test]
    async fn goback_discards_top_first() {
        let (history, _native, _session) = start("/");
        for path in ["/a", "/b", "/c"] {
            history.push(path, None).await.unwrap();
        }
        let events = record_changes(&history);

        history.goback(2).await.unwrap();
        let events = events.lock().unwrap();
        let discarded: Vec<_> = events[0].discarded.iter().map(|s| s.href()).collect();
        assert_eq!(discarded, vec!["/c", "/b"]);
        assert!(events[0].inserted.is_empty());
        assert_eq!(events[0].old.as_ref().unwrap().href(), "/c");
    }

    #[tokio::test]
    async fn non_positive_goback_is_a_noop() {
        let (history, native, _session) = start("/");
        history.push("/a", None).await.unwrap();
        native.clear_calls();

        assert!(history.goback(0).await.unwrap().is_none());
        assert!(history.goback(-3).await.unwrap().is_none());
        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert!(native.calls().is_empty());
    }

    #[tokio::test]
    async fn predicate_may_read_the_history() {
        let (history, _native, _session) = start("/");
        history.push("/a", None).await.unwrap();
        history.push("/b", None).await.unwrap();

        let reader = history.clone();
        history
            .goback_matching(move |s| reader.len() == 3 && s.href() == "/a")
            .await
            .unwrap();
        assert_eq!(hrefs(&history), vec!["/", "/a"]);
    }

    #[tokio::test]
    async fn reload_keeps_length_and_drops_data() {
        let (history, _native, _session) = start("/");
        history.push("/a", Some(json!(1))).await.unwrap();
        let before = history.location();
        let events = record_changes(&history);

        let reloaded = history.reload().await.unwrap();
        assert_eq!(reloaded.href(), "/a");
        assert!(reloaded.state().is_none());
        assert_ne!(reloaded.key(), before.key());
        assert_eq!(history.len(), 2);
        assert_eq!(events.lock().unwrap()[0].kind, ChangeKind::Replace);
    }

    #[tokio::test]
    async fn concurrent_navigation_is_busy() {
        let (history, _native, _session) = start("/");
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        history.set_on_before_change(move |_event| {
            let wait = wait.clone();
            async move {
                wait.notified().await;
                BeforeChange::Proceed
            }
        });

        let first = tokio::spawn({
            let history = history.clone();
            async move { history.push("/a", None).await }
        });
        settle_all().await;

        assert!(history.is_busy());
        assert!(history.push("/b", None).await.unwrap_err().is_busy());
        assert!(history.goback(1).await.unwrap_err().is_busy());

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert!(!history.is_busy());
    }

    #[tokio::test]
    async fn cancelled_navigation_changes_nothing() {
        let (history, native, _session) = start("/");
        history.set_on_before_change(|_event| async { BeforeChange::Cancel });
        native.clear_calls();

        let err = history.push("/a", None).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(hrefs(&history), vec!["/"]);
        assert!(native.calls().is_empty());
        assert_eq!(history.mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn push_events_insert_without_discarding() {
        let (history, _native, _session) = start("/");
        let asked = Arc::new(Mutex::new(Vec::new()));
        let sink = asked.clone();
        history.set_on_before_change(move |event| {
            sink.lock().unwrap().push(event);
            async { BeforeChange::Proceed }
        });
        let changes = record_changes(&history);

        history.push("/demo", None).await.unwrap();

        let asked = asked.lock().unwrap();
        let changes = changes.lock().unwrap();
        for event in [&asked[0], &changes[0]] {
            assert_eq!(event.kind, ChangeKind::Push);
            assert_eq!(event.old.as_ref().map(|s| s.href()), Some("/"));
            assert!(event.discarded.is_empty());
            let inserted: Vec<_> = event.inserted.iter().map(|s| s.href()).collect();
            assert_eq!(inserted, vec!["/demo"]);
        }
    }

    #[tokio::test]
    async fn vetoed_replace_goback_and_reload_change_nothing() {
        let (history, native, _session) = start("/");
        history.push("/a", None).await.unwrap();
        history.set_on_before_change(|_event| async { BeforeChange::Cancel });
        native.clear_calls();

        let err = history.replace("/b", None).await.unwrap_err();
        assert!(err.is_cancelled());
        let err = history.goback(1).await.unwrap_err();
        assert!(err.is_cancelled());
        let err = history.goback("/missing").await.unwrap_err();
        assert!(err.is_cancelled());
        let err = history.reload().await.unwrap_err();
        assert!(err.is_cancelled());

        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert!(native.calls().is_empty());
        assert_eq!(history.mode(), Mode::Idle);
        assert_two_native_entries(&native, "/a");
    }

    #[tokio::test]
    async fn failing_before_hook_surfaces_its_error() {
        let (history, _native, _session) = start("/");
        history.set_on_before_change(|_event| async { BeforeChange::fail("no access") });

        let err = history.push("/a", None).await.unwrap_err();
        assert!(matches!(err, HistoryError::Hook(_)));
        assert_eq!(err.to_string(), "navigation hook failed: no access");
        assert!(!history.is_busy());
    }

    #[tokio::test]
    async fn cancel_then_redirects() {
        let (history, _native, _session) = start("/");
        history.set_on_before_change(|event| async move {
            if event.new.pathname() == "/private" {
                BeforeChange::cancel_then(|history: History| async move {
                    let _ = history.push("/login", None).await;
                })
            } else {
                BeforeChange::Proceed
            }
        });

        let err = history.push("/private", None).await.unwrap_err();
        assert!(err.is_cancelled());
        settle_all().await;
        assert_eq!(hrefs(&history), vec!["/", "/login"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn redirect_starts_after_the_cancelled_call_returns() {
        for _ in 0..50 {
            let (history, _native, _session) = start("/");
            history.set_on_before_change(|event| async move {
                if event.new.pathname() == "/private" {
                    BeforeChange::cancel_then(|history: History| async move {
                        let _ = history.push("/login", None).await;
                    })
                } else {
                    BeforeChange::Proceed
                }
            });

            let err = history.push("/private", None).await.unwrap_err();
            assert!(err.is_cancelled());
            assert!(!history.is_busy());
            assert_eq!(hrefs(&history), vec!["/"]);

            settle_all().await;
            assert_eq!(hrefs(&history), vec!["/", "/login"]);
        }
    }

    #[tokio::test]
    async fn native_back_pops_one_entry() {
        let (history, native, _session) = start("/");
        history.push("/a", None).await.unwrap();
        history.push("/b", None).await.unwrap();

        native.user_back();
        settle_all().await;

        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert_two_native_entries(&native, "/a");
        assert!(!native.can_go_forward());
        assert_eq!(history.mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn manual_edit_is_pushed_and_forward_removed() {
        let (history, native, _session) = start("/");
        history.push("/a", None).await.unwrap();

        native.user_navigate("/typed");
        settle_all().await;

        assert_eq!(hrefs(&history), vec!["/", "/a", "/typed"]);
        assert_two_native_entries(&native, "/typed");
        assert!(!native.can_go_forward());
        assert_eq!(history.mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn stray_back_during_navigation_is_undone() {
        let (history, native, _session) = start("/");
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        history.set_on_before_change(move |_event| {
            let wait = wait.clone();
            async move {
                wait.notified().await;
                BeforeChange::Proceed
            }
        });

        let push = tokio::spawn({
            let history = history.clone();
            async move { history.push("/a", None).await }
        });
        settle_all().await;
        assert_eq!(history.mode(), Mode::Navigating);

        native.user_back();
        settle_all().await;
        assert_two_native_entries(&native, "/");

        gate.notify_one();
        push.await.unwrap().unwrap();
        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert_two_native_entries(&native, "/a");
    }

    #[tokio::test]
    async fn foreign_state_is_reconciled_without_errors() {
        let (history, native, _session) = start("/");
        history.push("/a", None).await.unwrap();

        // Another script pushed its own state, then the user went back
        native.push_entry(Some(json!({"foreign": true})), None, "/foreign");
        native.user_back();
        settle_all().await;

        assert_eq!(history.mode(), Mode::Idle);
        let current = native.current();
        assert_eq!(kind_of(current.payload.as_ref()), Some(EntryKind::Normal));
        assert_eq!(current.address, history.location().href());
        let behind = &native.entries()[native.index() - 1];
        assert_eq!(kind_of(behind.payload.as_ref()), Some(EntryKind::Goback));
    }

    #[tokio::test]
    async fn navigation_from_change_hook_is_parked_then_replayed() {
        let (history, _native, _session) = start("/");
        let observed = Arc::new(Mutex::new(Vec::new()));

        let handle = history.clone();
        let seen = observed.clone();
        history.set_on_change(move |event| {
            let history = handle.clone();
            let seen = seen.clone();
            async move {
                if event.new.pathname() == "/a" {
                    seen.lock().unwrap().push(history.is_busy());
                    tokio::spawn({
                        let history = history.clone();
                        async move { history.push("/b", None).await }
                    });
                    tokio::time::sleep(Duration::from_millis(5)).await;

                    // Only one call may be parked
                    seen.lock().unwrap().push(history.is_busy());
                    let second = history.push("/c", None).await;
                    seen.lock().unwrap().push(matches!(second, Err(HistoryError::Busy)));
                }
                Ok(())
            }
        });

        history.push("/a", None).await.unwrap();
        settle_all().await;

        assert_eq!(hrefs(&history), vec!["/", "/a", "/b"]);
        assert_eq!(*observed.lock().unwrap(), vec![false, true, true]);
    }

    #[tokio::test]
    async fn change_hook_error_is_surfaced_after_the_navigation() {
        let (history, _native, _session) = start("/");
        history.set_on_change(|_event| async { Err::<(), BoxError>("render failed".into()) });

        let err = history.push("/a", None).await.unwrap_err();
        assert!(matches!(err, HistoryError::Hook(_)));
        assert_eq!(hrefs(&history), vec!["/", "/a"]);
        assert_eq!(history.mode(), Mode::Idle);
    }

    #[tokio::test]
    async fn init_event_fires_and_early_calls_wait_for_it() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let history = History::builder()
            .config(test_config())
            .on_change(move |event: ChangeEvent| {
                sink.lock().unwrap().push(event);
                async { Ok(()) }
            })
            .build(MemoryHistory::new("/start"), MemorySession::new())
            .unwrap();

        history.push("/next", None).await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, ChangeKind::Init);
        assert!(events[0].old.is_none());
        assert_eq!(events[0].new.href(), "/start");
        assert_eq!(events[0].inserted[0].href(), "/start");
        assert_eq!(events[1].kind, ChangeKind::Push);
        assert_eq!(events[1].old.as_ref().unwrap().href(), "/start");
    }

    #[tokio::test]
    async fn destroy_restores_plain_native_history() {
        let (history, native, session) = start("/");
        history.push("/a", None).await.unwrap();

        history.destroy().await.unwrap();

        let current = native.current();
        assert_eq!(current.address, "/a");
        assert!(current.payload.is_none());
        assert!(!session.is_set());
        assert!(!native.is_listening());
        assert_eq!(history.mode(), Mode::Destroying);

        assert!(matches!(
            history.push("/b", None).await,
            Err(HistoryError::Destroyed)
        ));
        assert!(matches!(history.destroy().await, Err(HistoryError::Destroyed)));
    }

    #[tokio::test]
    async fn destroy_rejects_parked_navigation() {
        let (history, _native, _session) = start("/");
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        history.set_on_change(move |_event| {
            let wait = wait.clone();
            async move {
                wait.notified().await;
                Ok(())
            }
        });

        let first = tokio::spawn({
            let history = history.clone();
            async move { history.push("/a", None).await }
        });
        settle_all().await;
        let parked = tokio::spawn({
            let history = history.clone();
            async move { history.push("/b", None).await }
        });
        settle_all().await;
        assert!(history.is_busy());

        history.destroy().await.unwrap();
        assert!(parked.await.unwrap().unwrap_err().is_cancelled());

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(history.mode(), Mode::Destroying);
    }

    #[tokio::test]
    async fn exit_steps_back_past_the_sentinel() {
        let (history, native, _session) = start("/");
        native.clear_calls();

        history.exit().unwrap();
        settle_all().await;

        assert_eq!(history.mode(), Mode::Exiting);
        assert_eq!(native.calls(), vec![NativeCall::Go(-1), NativeCall::Go(-1)]);
        assert!(matches!(
            history.push("/a", None).await,
            Err(HistoryError::Destroyed)
        ));
        assert!(matches!(history.exit(), Err(HistoryError::Destroyed)));
    }

    #[tokio::test]
    async fn default_context_allows_one_instance() {
        let first = History::new(
            test_config(),
            MemoryHistory::default_context("/"),
            MemorySession::new(),
        )
        .unwrap();
        assert!(guard::default_context_claimed());

        let second = History::new(
            test_config(),
            MemoryHistory::default_context("/"),
            MemorySession::new(),
        );
        assert!(matches!(second, Err(HistoryError::ContextInUse)));

        // Other contexts are unaffected
        History::new(test_config(), MemoryHistory::new("/"), MemorySession::new()).unwrap();

        first.destroy().await.unwrap();
        assert!(!guard::default_context_claimed());

        let third = History::new(
            test_config(),
            MemoryHistory::default_context("/"),
            MemorySession::new(),
        )
        .unwrap();
        third.destroy().await.unwrap();
    }

    #[tokio::test]
    async fn unavailable_native_history_fails() {
        let result = History::new(
            test_config(),
            MemoryHistory::unavailable(),
            MemorySession::new(),
        );
        assert!(matches!(result, Err(HistoryError::InitializationFailed(_))));
    }

    #[test]
    fn requires_a_runtime() {
        let result = History::new(test_config(), MemoryHistory::new("/"), MemorySession::new());
        assert!(matches!(result, Err(HistoryError::InitializationFailed(_))));
    }
}
