//! Viewport trigger and the observer capability it runs on.

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use log::debug;
use log::warn;

use crate::error::ObserverError;

use super::handle::Callback;
use super::handle::CallbackCell;
use super::handle::Session;
use super::handle::VisibilityHandle;

/// Options for observing a sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerOptions {
    /// Distance, in host units, by which the viewport is grown before
    /// testing intersection. Lets the next page load before the sentinel
    /// is actually on screen.
    ///
    /// Default: 2
    pub root_margin: u32,

    /// Minimum visible fraction of the sentinel that counts as visible.
    ///
    /// Default: 0.0 (any overlap)
    pub threshold: f32,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            root_margin: 2,
            threshold: 0.0,
        }
    }
}

impl TriggerOptions {
    /// Sets the root margin.
    pub fn with_root_margin(mut self, margin: u32) -> Self {
        self.root_margin = margin;
        self
    }

    /// Sets the visibility threshold, clamped to `0.0..=1.0`.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// Host capability for observing whether a target is in the viewport.
///
/// Implementations push [`VisibilityEntry`](super::VisibilityEntry) batches
/// into the handle they were given whenever the target's visibility may
/// have changed. A host without such a primitive fails `observe` with
/// [`ObserverError::Unavailable`].
pub trait ViewportObserver {
    /// What gets observed.
    type Target;
    /// Token returned by `observe` and given back to `disconnect`.
    type Subscription;

    /// Starts observing `target`.
    fn observe(
        &self,
        target: &Self::Target,
        options: &TriggerOptions,
        handle: VisibilityHandle,
    ) -> Result<Self::Subscription, ObserverError>;

    /// Stops delivering entries for the subscription.
    fn disconnect(&self, subscription: Self::Subscription);
}

struct Attachment<Sub> {
    subscription: Sub,
    session: Arc<Session>,
}

/// Invokes a callback whenever an observed sentinel scrolls into view.
///
/// Holds at most one subscription. The callback lives in a shared cell, so
/// [`set_callback`](Self::set_callback) swaps it without re-subscribing.
///
/// # Example
///
/// ```ignore
/// let viewport = RowViewport::new();
/// let mut trigger = ViewportTrigger::new(viewport.clone());
///
/// let controller = controller.clone();
/// trigger.attach(&"sentinel".into(), move || { spawn_load_more(&controller) }, TriggerOptions::default())?;
///
/// // each frame
/// viewport.update(scroll, height, |_| Some(sentinel_row));
///
/// // sentinel unmounted
/// trigger.detach();
/// ```
pub struct ViewportTrigger<O: ViewportObserver> {
    observer: O,
    callback: CallbackCell,
    attachment: Option<Attachment<O::Subscription>>,
}

impl<O: ViewportObserver> ViewportTrigger<O> {
    /// Creates a detached trigger over `observer`.
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            callback: Arc::new(RwLock::new(None)),
            attachment: None,
        }
    }

    /// Starts observing `sentinel`, invoking `on_visible` on each
    /// hidden-to-visible transition.
    ///
    /// Fails with [`ObserverError::AlreadyAttached`] if a sentinel is
    /// already observed, or with whatever the observer reports.
    pub fn attach(
        &mut self,
        sentinel: &O::Target,
        on_visible: impl Fn() + Send + Sync + 'static,
        options: TriggerOptions,
    ) -> Result<(), ObserverError> {
        if self.attachment.is_some() {
            return Err(ObserverError::AlreadyAttached);
        }

        self.set_callback(on_visible);
        let session = Arc::new(Session::new(options.threshold));
        let handle = VisibilityHandle::new(Arc::clone(&self.callback), Arc::clone(&session));

        match self.observer.observe(sentinel, &options, handle) {
            Ok(subscription) => {
                debug!("trigger attached (margin={}, threshold={})", options.root_margin, options.threshold);
                self.attachment = Some(Attachment {
                    subscription,
                    session,
                });
                Ok(())
            }
            Err(err) => {
                warn!("trigger attach failed: {}", err);
                session.close();
                Err(err)
            }
        }
    }

    /// Replaces the callback without touching the observation.
    pub fn set_callback(&self, on_visible: impl Fn() + Send + Sync + 'static) {
        let callback: Callback = Arc::new(on_visible);
        *self.callback.write().unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    /// Stops observing. Safe to call any number of times.
    pub fn detach(&mut self) {
        if let Some(attachment) = self.attachment.take() {
            attachment.session.close();
            self.observer.disconnect(attachment.subscription);
            debug!("trigger detached");
        }
    }

    /// Returns `true` while a sentinel is observed.
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Returns the underlying observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<O: ViewportObserver> Drop for ViewportTrigger<O> {
    fn drop(&mut self) {
        self.detach();
    }
}
