//! Visibility delivery endpoint.

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use log::trace;

/// Callback invoked when the sentinel becomes visible.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Shared slot holding the current callback.
pub(crate) type CallbackCell = Arc<RwLock<Option<Callback>>>;

/// One observation of a target, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    /// Whether the target overlaps the (margin-expanded) viewport.
    pub is_intersecting: bool,
    /// Visible fraction of the target, `0.0..=1.0`.
    pub intersection_ratio: f32,
}

impl VisibilityEntry {
    /// A fully visible entry.
    pub fn visible() -> Self {
        Self {
            is_intersecting: true,
            intersection_ratio: 1.0,
        }
    }

    /// A fully hidden entry.
    pub fn hidden() -> Self {
        Self {
            is_intersecting: false,
            intersection_ratio: 0.0,
        }
    }
}

/// Per-attach edge detection state.
#[derive(Debug)]
pub(crate) struct Session {
    active: AtomicBool,
    visible: AtomicBool,
    threshold: f32,
}

impl Session {
    pub(crate) fn new(threshold: f32) -> Self {
        Self {
            active: AtomicBool::new(true),
            visible: AtomicBool::new(false),
            threshold,
        }
    }

    pub(crate) fn close(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Endpoint an observer pushes visibility entries into.
///
/// Fires the current callback once per hidden-to-visible transition, where
/// visible means intersecting at or above the threshold. Entries delivered
/// after the trigger detached are ignored.
#[derive(Clone)]
pub struct VisibilityHandle {
    callback: CallbackCell,
    session: Arc<Session>,
}

impl VisibilityHandle {
    pub(crate) fn new(callback: CallbackCell, session: Arc<Session>) -> Self {
        Self { callback, session }
    }

    /// Delivers a batch of entries in order.
    ///
    /// Returns how many times the callback fired.
    pub fn deliver(&self, entries: &[VisibilityEntry]) -> usize {
        let mut fired = 0;
        for entry in entries {
            if !self.is_active() {
                break;
            }
            let now_visible =
                entry.is_intersecting && entry.intersection_ratio >= self.session.threshold;
            let was_visible = self.session.visible.swap(now_visible, Ordering::SeqCst);
            if now_visible && !was_visible && self.fire() {
                fired += 1;
            }
        }
        fired
    }

    /// Returns `false` once the owning trigger detached.
    pub fn is_active(&self) -> bool {
        self.session.active.load(Ordering::SeqCst)
    }

    fn fire(&self) -> bool {
        // Cloned out so the callback may replace itself.
        let callback = self
            .callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match callback {
            Some(callback) => {
                trace!("sentinel became visible");
                callback();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for VisibilityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityHandle")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
