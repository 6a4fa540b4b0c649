//! Session Registry
//!
//! Single source of truth for "who is listening" on both sides of the bridge.
//!
//! ```text
//!  native drop-in ──SessionCallbacks──▶ SessionRegistry ──EventSink──▶ host module
//!  host module ─────handle / hide─────▶ SessionRegistry ──SessionHandle──▶ native drop-in
//! ```
//!
//! Host modules can be torn down and recreated while a native flow keeps
//! running, so nothing here is keyed on module identity. The registry keeps a
//! weak reference to whichever module registered last and a strong reference
//! to the live native session. Either may be unset between sessions.
//!
//! The registry is an ordinary object shared through `Arc`; construct one per
//! process and hand it to every module and every [`SessionCallbacks`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::NativeError;
use crate::native::SessionHandle;

/// Unique identifier of one native checkout flow
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The native session currently accepting commands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub started_at: DateTime<Utc>,
}

/// Outcome reported by the native drop-in
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    /// Shopper submitted payment data
    Submitted(Value),
    /// Additional details after an action (redirect, 3DS2, ...)
    ActionRequired(Value),
    /// The flow failed or was cancelled
    Failed(NativeError),
}

impl LifecycleEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Submitted(_) => "submitted",
            Self::ActionRequired(_) => "action_required",
            Self::Failed(_) => "failed",
        }
    }
}

/// Receiver of native lifecycle events, implemented by host modules
pub trait EventSink: Send + Sync {
    fn on_lifecycle_event(&self, event: LifecycleEvent);
}

/// What happens to a lifecycle event that arrives while no module is registered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum DeliveryPolicy {
    /// Discard it
    #[default]
    Drop,
    /// Keep the newest `capacity` events and hand them to the next module
    /// that registers
    Replay { capacity: usize },
}

#[derive(Default)]
struct RegistryState {
    event_sink: Option<Weak<dyn EventSink>>,
    action_sink: Option<Arc<dyn SessionHandle>>,
    session: Option<SessionInfo>,
    pending: VecDeque<LifecycleEvent>,

    /// Set while buffered events are being handed to a new sink; new events
    /// queue behind them
    replaying: bool,
}

impl RegistryState {
    fn is_current(&self, session_id: &SessionId) -> bool {
        self.session.as_ref().is_some_and(|s| &s.id == session_id)
    }
}

/// Process-wide mediator between native callbacks and host modules
///
/// A session starts when [`SessionCallbacks`] are created for a launch and
/// ends on `hide`, on a native failure, or when the next launch begins.
/// Callbacks of a session that is no longer current are ignored.
#[derive(Default)]
pub struct SessionRegistry {
    state: Mutex<RegistryState>,
    policy: DeliveryPolicy,
}

impl SessionRegistry {
    pub fn new(policy: DeliveryPolicy) -> Self {
        Self {
            state: Mutex::default(),
            policy,
        }
    }

    pub const fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Make `sink` the event receiver, replacing any previous one.
    ///
    /// Under [`DeliveryPolicy::Replay`] buffered events are delivered to the
    /// new sink, oldest first, before any event dispatched after this call.
    pub fn register_event_sink<S: EventSink + 'static>(&self, sink: &Arc<S>) {
        let weak = Arc::downgrade(sink);
        let weak: Weak<dyn EventSink> = weak;
        let replay = {
            let mut state = self.lock();
            state.event_sink = Some(weak);
            let replay = !state.replaying && !state.pending.is_empty();
            state.replaying |= replay;
            replay
        };
        tracing::debug!(replay, "Registered event sink");

        if replay {
            self.replay_pending();
        }
    }

    /// Whether a live module is registered
    pub fn has_event_sink(&self) -> bool {
        self.lock()
            .event_sink
            .as_ref()
            .is_some_and(|sink| sink.strong_count() > 0)
    }

    /// Start a new session, ending the previous one
    pub fn begin_session(&self) -> SessionId {
        let info = SessionInfo {
            id: SessionId::new(),
            started_at: Utc::now(),
        };
        let id = info.id.clone();
        let previous = {
            let mut state = self.lock();
            state.action_sink = None;
            state.session.replace(info)
        };
        if let Some(previous) = previous {
            tracing::warn!(previous = %previous.id, "Replacing a session that never finished");
        }
        tracing::info!(session_id = %id, "Native session started");
        id
    }

    /// Make `handle` the target of host commands for `session_id`.
    ///
    /// Returns `false`, leaving no action sink, when that session already
    /// ended, e.g. the flow failed before `launch` returned.
    pub fn register_action_sink(
        &self,
        session_id: &SessionId,
        handle: Arc<dyn SessionHandle>,
    ) -> bool {
        let mut state = self.lock();
        if !state.is_current(session_id) {
            tracing::debug!(%session_id, "Session ended before its handle was registered");
            return false;
        }
        state.action_sink = Some(handle);
        true
    }

    /// End `session_id` if it is still the current session
    pub fn end_session(&self, session_id: &SessionId) -> Option<SessionInfo> {
        let ended = {
            let mut state = self.lock();
            if state.is_current(session_id) {
                state.action_sink = None;
                state.session.take()
            } else {
                None
            }
        };
        if let Some(info) = &ended {
            tracing::info!(session_id = %info.id, "Native session ended");
        }
        ended
    }

    /// The current session together with its registered handle
    pub fn current_session(&self) -> Option<(SessionId, Arc<dyn SessionHandle>)> {
        let state = self.lock();
        let id = state.session.as_ref()?.id.clone();
        state.action_sink.clone().map(|handle| (id, handle))
    }

    pub fn current_action_sink(&self) -> Option<Arc<dyn SessionHandle>> {
        self.lock().action_sink.clone()
    }

    pub fn active_session(&self) -> Option<SessionInfo> {
        self.lock().session.clone()
    }

    /// Number of events waiting for a module
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn dispatch_submitted(&self, session_id: &SessionId, payload: Value) {
        self.dispatch_current(session_id, LifecycleEvent::Submitted(payload));
    }

    pub fn dispatch_action_required(&self, session_id: &SessionId, payload: Value) {
        self.dispatch_current(session_id, LifecycleEvent::ActionRequired(payload));
    }

    /// A native failure also ends the session
    pub fn dispatch_failed(&self, session_id: &SessionId, error: NativeError) {
        if self.end_session(session_id).is_some() {
            self.dispatch(LifecycleEvent::Failed(error));
        } else {
            tracing::debug!(%session_id, %error, "Ignoring failure of a finished session");
        }
    }

    fn dispatch_current(&self, session_id: &SessionId, event: LifecycleEvent) {
        if self.lock().is_current(session_id) {
            self.dispatch(event);
        } else {
            tracing::debug!(
                %session_id,
                event = event.name(),
                "Ignoring event of a finished session"
            );
        }
    }

    fn dispatch(&self, event: LifecycleEvent) {
        let sink = {
            let mut state = self.lock();
            if state.replaying {
                state.pending.push_back(event);
                return;
            }
            match state.event_sink.as_ref().and_then(Weak::upgrade) {
                Some(sink) => sink,
                None => {
                    self.retain_undelivered(&mut state, event);
                    return;
                }
            }
        };
        // Delivered without the lock so sinks may call back into the registry
        sink.on_lifecycle_event(event);
    }

    /// Hand buffered events to the registered sink one at a time, including
    /// any queued while replaying
    fn replay_pending(&self) {
        let mut replayed = 0_usize;
        loop {
            let (sink, event) = {
                let mut state = self.lock();
                let sink = state.event_sink.as_ref().and_then(Weak::upgrade);
                let event = if sink.is_some() {
                    state.pending.pop_front()
                } else {
                    None
                };
                match (sink, event) {
                    (Some(sink), Some(event)) => (sink, event),
                    _ => {
                        state.replaying = false;
                        // Sink went away mid-replay; the rest follows the policy again
                        let undelivered: Vec<LifecycleEvent> = state.pending.drain(..).collect();
                        for event in undelivered {
                            self.retain_undelivered(&mut state, event);
                        }
                        break;
                    }
                }
            };
            sink.on_lifecycle_event(event);
            replayed += 1;
        }
        tracing::debug!(replayed, "Replayed buffered events");
    }

    fn retain_undelivered(&self, state: &mut RegistryState, event: LifecycleEvent) {
        match self.policy {
            DeliveryPolicy::Drop => {
                tracing::warn!(event = event.name(), "No event sink registered, dropping event");
            }
            DeliveryPolicy::Replay { capacity } => {
                if capacity == 0 {
                    tracing::warn!(event = event.name(), "Replay buffer disabled, dropping event");
                    return;
                }
                while state.pending.len() >= capacity {
                    if let Some(evicted) = state.pending.pop_front() {
                        tracing::warn!(event = evicted.name(), "Replay buffer full, evicting oldest");
                    }
                }
                tracing::debug!(event = event.name(), "No event sink registered, buffering event");
                state.pending.push_back(event);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // Every critical section is a plain swap, so a poisoned guard still
        // holds consistent state
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The callbacks the native drop-in invokes for one session; forwards into
/// the registry
#[derive(Clone)]
pub struct SessionCallbacks {
    registry: Arc<SessionRegistry>,
    session_id: SessionId,
}

impl SessionCallbacks {
    /// Begin a new session on `registry`
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        let session_id = registry.begin_session();
        Self {
            registry,
            session_id,
        }
    }

    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn on_submit(&self, payload: Value) {
        self.registry.dispatch_submitted(&self.session_id, payload);
    }

    pub fn on_provide(&self, payload: Value) {
        self.registry.dispatch_action_required(&self.session_id, payload);
    }

    pub fn on_fail(&self, error: NativeError) {
        self.registry.dispatch_failed(&self.session_id, error);
    }
}
