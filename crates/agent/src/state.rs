//! Shared session state and the single-request gate

use std::sync::atomic::{AtomicBool, Ordering};

use concierge_core::{AvailabilityEntry, AvailabilitySet, Language, Message};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::broadcast;

/// Request lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    AwaitingResponse,
}

/// Session events for front-ends
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A message was appended to the log
    MessageAppended(Message),
    /// Phase changed
    PhaseChanged {
        old: SessionPhase,
        new: SessionPhase,
    },
    /// Backend degraded flag flipped
    DegradedChanged(bool),
    /// Log restored to the welcome message
    Reset,
}

/// State shared by the conversation session, the voice pipeline and the
/// background monitor
///
/// Only flags and the availability set live here; the message log belongs
/// to the session alone.
pub struct SessionState {
    input: Mutex<String>,
    language: RwLock<Language>,
    muted: AtomicBool,
    degraded: AtomicBool,
    availability: RwLock<AvailabilitySet>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionState {
    pub fn new(language: Language, muted: bool) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            input: Mutex::new(String::new()),
            language: RwLock::new(language),
            muted: AtomicBool::new(muted),
            degraded: AtomicBool::new(false),
            availability: RwLock::new(AvailabilitySet::new()),
            event_tx,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.event_tx.send(event);
    }

    pub(crate) fn events(&self) -> broadcast::Sender<SessionEvent> {
        self.event_tx.clone()
    }

    /// Current input buffer
    pub fn input(&self) -> String {
        self.input.lock().clone()
    }

    /// Replace the input buffer
    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.lock() = text.into();
    }

    pub fn clear_input(&self) {
        self.input.lock().clear();
    }

    pub fn language(&self) -> Language {
        *self.language.read()
    }

    pub fn set_language(&self, language: Language) {
        *self.language.write() = language;
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Last write wins; emits only on an actual flip
    pub fn set_degraded(&self, degraded: bool) {
        let old = self.degraded.swap(degraded, Ordering::SeqCst);
        if old != degraded {
            tracing::info!(degraded, "Backend degraded flag changed");
            self.emit(SessionEvent::DegradedChanged(degraded));
        }
    }

    pub fn replace_availability(&self, entries: impl IntoIterator<Item = AvailabilityEntry>) {
        self.availability.write().replace(entries);
    }

    /// Fail-open availability join by item name
    pub fn is_item_available(&self, name: &str) -> bool {
        self.availability.read().is_item_available(name)
    }

    pub fn availability_len(&self) -> usize {
        self.availability.read().len()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Language::default(), false)
    }
}

/// Admits at most one outstanding request
pub struct RequestGate {
    busy: AtomicBool,
    event_tx: Option<broadcast::Sender<SessionEvent>>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            event_tx: None,
        }
    }

    /// Gate that reports phase changes on a session event channel
    pub fn with_events(event_tx: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            busy: AtomicBool::new(false),
            event_tx: Some(event_tx),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.busy.load(Ordering::SeqCst) {
            SessionPhase::AwaitingResponse
        } else {
            SessionPhase::Idle
        }
    }

    /// Move to `AwaitingResponse`, or `None` if a request is already outstanding
    ///
    /// The phase returns to `Idle` when the guard drops.
    pub fn try_begin(&self) -> Option<RequestGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.notify(SessionPhase::Idle, SessionPhase::AwaitingResponse);
        Some(RequestGuard { gate: self })
    }

    fn notify(&self, old: SessionPhase, new: SessionPhase) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(SessionEvent::PhaseChanged { old, new });
        }
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RequestGuard<'a> {
    gate: &'a RequestGate,
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::SeqCst);
        self.gate
            .notify(SessionPhase::AwaitingResponse, SessionPhase::Idle);
    }
}
