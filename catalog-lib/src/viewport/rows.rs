//! Observers for hosts that render rows.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::error::ObserverError;

use super::handle::VisibilityEntry;
use super::handle::VisibilityHandle;
use super::trigger::TriggerOptions;
use super::trigger::ViewportObserver;

/// Token for a [`RowViewport`] observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowSubscription(u64);

struct Observed {
    target: String,
    margin: usize,
    handle: VisibilityHandle,
}

#[derive(Default)]
struct RowViewportInner {
    next_id: u64,
    observed: HashMap<RowSubscription, Observed>,
}

/// Polling observer over a vertically scrolled list of rows.
///
/// Targets are named rows. The host calls [`update`](Self::update) after
/// each layout with the scroll offset, the viewport height and a way to
/// locate targets; a target is visible when its row falls inside the
/// viewport grown by the root margin on both edges. Rows are atomic, so the
/// ratio is either 0 or 1.
///
/// Clones share the same observations, so the host keeps one clone to
/// drive while a [`ViewportTrigger`](super::ViewportTrigger) owns another.
#[derive(Clone, Default)]
pub struct RowViewport {
    inner: Arc<Mutex<RowViewportInner>>,
}

impl RowViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports the current layout and delivers entries to every observer.
    ///
    /// `locate` maps a target name to its row, or `None` if it is not
    /// mounted. Returns how many callbacks fired.
    pub fn update(
        &self,
        scroll_offset: usize,
        height: usize,
        locate: impl Fn(&str) -> Option<usize>,
    ) -> usize {
        // Collected first so callbacks run without the lock held.
        let deliveries: Vec<(VisibilityHandle, VisibilityEntry)> = self
            .lock()
            .observed
            .values()
            .map(|observed| {
                let visible = locate(&observed.target).is_some_and(|row| {
                    row_in_view(row, scroll_offset, height, observed.margin)
                });
                let entry = if visible {
                    VisibilityEntry::visible()
                } else {
                    VisibilityEntry::hidden()
                };
                (observed.handle.clone(), entry)
            })
            .collect();

        deliveries
            .into_iter()
            .map(|(handle, entry)| handle.deliver(&[entry]))
            .sum()
    }

    /// Returns the number of live observations.
    pub fn observed_count(&self) -> usize {
        self.lock().observed.len()
    }

    fn lock(&self) -> MutexGuard<'_, RowViewportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ViewportObserver for RowViewport {
    type Target = String;
    type Subscription = RowSubscription;

    fn observe(
        &self,
        target: &String,
        options: &TriggerOptions,
        handle: VisibilityHandle,
    ) -> Result<RowSubscription, ObserverError> {
        let mut inner = self.lock();
        let subscription = RowSubscription(inner.next_id);
        inner.next_id += 1;
        inner.observed.insert(
            subscription,
            Observed {
                target: target.clone(),
                margin: options.root_margin as usize,
                handle,
            },
        );
        Ok(subscription)
    }

    fn disconnect(&self, subscription: RowSubscription) {
        self.lock().observed.remove(&subscription);
    }
}

fn row_in_view(row: usize, scroll_offset: usize, height: usize, margin: usize) -> bool {
    let top = scroll_offset.saturating_sub(margin);
    let bottom = scroll_offset.saturating_add(height).saturating_add(margin);
    height > 0 && row >= top && row < bottom
}

/// Observer for hosts with no way to observe the viewport.
///
/// Every `observe` fails with [`ObserverError::Unavailable`], so callers
/// fall back to loading more on request.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedViewport;

impl ViewportObserver for UnsupportedViewport {
    type Target = String;
    type Subscription = ();

    fn observe(
        &self,
        _target: &String,
        _options: &TriggerOptions,
        _handle: VisibilityHandle,
    ) -> Result<(), ObserverError> {
        Err(ObserverError::Unavailable)
    }

    fn disconnect(&self, _subscription: ()) {}
}
