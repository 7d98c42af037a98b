//! Viewport trigger behavior.

mod common;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use catalog_lib::PaginationController;
use catalog_lib::error::ObserverError;
use catalog_lib::view::StatusView;
use catalog_lib::viewport::RowViewport;
use catalog_lib::viewport::TriggerOptions;
use catalog_lib::viewport::UnsupportedViewport;
use catalog_lib::viewport::ViewportObserver;
use catalog_lib::viewport::ViewportTrigger;
use catalog_lib::viewport::VisibilityEntry;
use catalog_lib::viewport::VisibilityHandle;

use common::FakeCatalog;
use common::size;

const SENTINEL: &str = "sentinel";

/// Observer that hands its handles to the test.
#[derive(Default)]
struct RecordingObserver {
    handles: Mutex<Vec<VisibilityHandle>>,
    observed: AtomicUsize,
    disconnected: AtomicUsize,
}

impl RecordingObserver {
    fn last_handle(&self) -> VisibilityHandle {
        self.handles.lock().unwrap().last().cloned().unwrap()
    }
}

impl ViewportObserver for RecordingObserver {
    type Target = String;
    type Subscription = ();

    fn observe(
        &self,
        _target: &String,
        _options: &TriggerOptions,
        handle: VisibilityHandle,
    ) -> Result<(), ObserverError> {
        self.observed.fetch_add(1, Ordering::SeqCst);
        self.handles.lock().unwrap().push(handle);
        Ok(())
    }

    fn disconnect(&self, _subscription: ()) {
        self.disconnected.fetch_add(1, Ordering::SeqCst);
    }
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = count.clone();
    (count, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_fires_once_per_transition() {
    let viewport = RowViewport::new();
    let mut trigger = ViewportTrigger::new(viewport.clone());
    let (count, callback) = counter();
    trigger
        .attach(&SENTINEL.to_string(), callback, TriggerOptions::default().with_root_margin(0))
        .unwrap();

    // sentinel at row 30, viewport of 10 rows
    viewport.update(0, 10, |_| Some(30));
    assert_eq!(count.load(Ordering::SeqCst), 0);

    viewport.update(21, 10, |_| Some(30));
    viewport.update(22, 10, |_| Some(30));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    viewport.update(0, 10, |_| Some(30));
    viewport.update(25, 10, |_| Some(30));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_root_margin_prefetches() {
    let viewport = RowViewport::new();
    let mut trigger = ViewportTrigger::new(viewport.clone());
    let (count, callback) = counter();
    trigger
        .attach(&SENTINEL.to_string(), callback, TriggerOptions::default().with_root_margin(3))
        .unwrap();

    // rows 0..10 visible, sentinel at 12 is within the 3-row margin
    assert_eq!(viewport.update(0, 10, |_| Some(12)), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unmounted_sentinel_is_hidden() {
    let viewport = RowViewport::new();
    let mut trigger = ViewportTrigger::new(viewport.clone());
    let (count, callback) = counter();
    trigger
        .attach(&SENTINEL.to_string(), callback, TriggerOptions::default())
        .unwrap();

    viewport.update(0, 10, |_| None);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_latest_callback_without_resubscribe() {
    let mut trigger = ViewportTrigger::new(RecordingObserver::default());
    let (old_count, old_callback) = counter();
    let (new_count, new_callback) = counter();

    trigger
        .attach(&SENTINEL.to_string(), old_callback, TriggerOptions::default())
        .unwrap();
    trigger.set_callback(new_callback);

    trigger.observer().last_handle().deliver(&[VisibilityEntry::visible()]);

    assert_eq!(old_count.load(Ordering::SeqCst), 0);
    assert_eq!(new_count.load(Ordering::SeqCst), 1);
    assert_eq!(trigger.observer().observed.load(Ordering::SeqCst), 1);
    assert_eq!(trigger.observer().disconnected.load(Ordering::SeqCst), 0);
}

#[test]
fn test_no_callback_after_detach() {
    let mut trigger = ViewportTrigger::new(RecordingObserver::default());
    let (count, callback) = counter();
    trigger
        .attach(&SENTINEL.to_string(), callback, TriggerOptions::default())
        .unwrap();
    let handle = trigger.observer().last_handle();

    trigger.detach();
    trigger.detach();

    assert!(!trigger.is_attached());
    assert!(!handle.is_active());
    assert_eq!(handle.deliver(&[VisibilityEntry::visible()]), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(trigger.observer().disconnected.load(Ordering::SeqCst), 1);
}

#[test]
fn test_detach_releases_row_subscription() {
    let viewport = RowViewport::new();
    let mut trigger = ViewportTrigger::new(viewport.clone());
    let (count, callback) = counter();
    trigger
        .attach(&SENTINEL.to_string(), callback, TriggerOptions::default())
        .unwrap();
    assert_eq!(viewport.observed_count(), 1);

    trigger.detach();
    assert_eq!(viewport.observed_count(), 0);
    assert_eq!(viewport.update(0, 10, |_| Some(0)), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_drop_detaches() {
    let viewport = RowViewport::new();
    {
        let mut trigger = ViewportTrigger::new(viewport.clone());
        trigger
            .attach(&SENTINEL.to_string(), || {}, TriggerOptions::default())
            .unwrap();
        assert_eq!(viewport.observed_count(), 1);
    }
    assert_eq!(viewport.observed_count(), 0);
}

#[test]
fn test_reattach_starts_hidden() {
    let viewport = RowViewport::new();
    let mut trigger = ViewportTrigger::new(viewport.clone());
    let (count, callback) = counter();
    trigger
        .attach(&SENTINEL.to_string(), callback, TriggerOptions::default())
        .unwrap();
    viewport.update(0, 10, |_| Some(5));
    trigger.detach();

    let (count2, callback2) = counter();
    trigger
        .attach(&SENTINEL.to_string(), callback2, TriggerOptions::default())
        .unwrap();
    viewport.update(0, 10, |_| Some(5));

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(count2.load(Ordering::SeqCst), 1);
}

#[test]
fn test_already_attached() {
    let viewport = RowViewport::new();
    let mut trigger = ViewportTrigger::new(viewport.clone());
    trigger
        .attach(&SENTINEL.to_string(), || {}, TriggerOptions::default())
        .unwrap();
    let err = trigger
        .attach(&SENTINEL.to_string(), || {}, TriggerOptions::default())
        .unwrap_err();
    assert_eq!(err, ObserverError::AlreadyAttached);
    assert_eq!(viewport.observed_count(), 1);
}

#[test]
fn test_unsupported_host_fails_fast() {
    let mut trigger = ViewportTrigger::new(UnsupportedViewport);
    let err = trigger
        .attach(&SENTINEL.to_string(), || {}, TriggerOptions::default())
        .unwrap_err();
    assert_eq!(err, ObserverError::Unavailable);
    assert!(!trigger.is_attached());
}

/// Scrolls a table to the bottom repeatedly, mounting the sentinel only
/// while more data is available, until the catalog is exhausted.
#[tokio::test]
async fn test_scrolling_loads_whole_catalog() {
    let catalog = Arc::new(FakeCatalog::with_count(25));
    let controller = PaginationController::mount(catalog.clone(), size(10)).await;
    let viewport = RowViewport::new();
    let mut trigger = ViewportTrigger::new(viewport.clone());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    loop {
        let status = controller.with_state(StatusView::from_state);
        if status.show_sentinel && !trigger.is_attached() {
            let tx = tx.clone();
            trigger
                .attach(&SENTINEL.to_string(), move || { let _ = tx.send(()); }, TriggerOptions::default())
                .unwrap();
        } else if !status.show_sentinel {
            trigger.detach();
            break;
        }

        // sentinel sits right after the last loaded row; scroll to the bottom
        let rows = status.loaded;
        viewport.update(rows.saturating_sub(8), 8, |_| Some(rows));
        if rx.try_recv().is_ok() {
            controller.load_more().await;
        }
        // scroll back up so the next frame is a fresh transition
        viewport.update(0, 8, |_| Some(rows));
    }

    let state = controller.snapshot();
    assert_eq!(state.len(), 25);
    assert!(!state.has_more());
    assert_eq!(catalog.call_count(), 3);
    assert_eq!(viewport.observed_count(), 0);
}
