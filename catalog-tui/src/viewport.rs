//! Terminal viewport observer.

use catalog_lib::error::ObserverError;
use catalog_lib::viewport::RowSubscription;
use catalog_lib::viewport::RowViewport;
use catalog_lib::viewport::TriggerOptions;
use catalog_lib::viewport::UnsupportedViewport;
use catalog_lib::viewport::ViewportObserver;
use catalog_lib::viewport::VisibilityHandle;

/// Observer backing the table's load sentinel.
///
/// `Rows` polls the table's scroll position each frame. `Unsupported`
/// stands in when scroll-triggered loading is disabled, which makes the
/// trigger fail to attach and the app fall back to manual loading.
pub enum HostViewport {
    Rows(RowViewport),
    Unsupported,
}

impl HostViewport {
    /// Reports the table layout; returns how many callbacks fired.
    pub fn update(&self, scroll: usize, height: usize, locate: impl Fn(&str) -> Option<usize>) -> usize {
        match self {
            HostViewport::Rows(rows) => rows.update(scroll, height, locate),
            HostViewport::Unsupported => 0,
        }
    }
}

impl ViewportObserver for HostViewport {
    type Target = String;
    type Subscription = Option<RowSubscription>;

    fn observe(
        &self,
        target: &String,
        options: &TriggerOptions,
        handle: VisibilityHandle,
    ) -> Result<Self::Subscription, ObserverError> {
        match self {
            HostViewport::Rows(rows) => rows.observe(target, options, handle).map(Some),
            HostViewport::Unsupported => UnsupportedViewport
                .observe(target, options, handle)
                .map(|()| None),
        }
    }

    fn disconnect(&self, subscription: Self::Subscription) {
        if let (HostViewport::Rows(rows), Some(subscription)) = (self, subscription) {
            rows.disconnect(subscription);
        }
    }
}
