//! Mount lifetime of a view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag telling in-flight work whether its view is still mounted.
///
/// Clone it out of the view before navigating away; once [`unmount`] is
/// called, results that arrive later are dropped instead of applied.
///
/// [`unmount`]: MountHandle::unmount
#[derive(Debug, Clone)]
pub struct MountHandle {
    live: Arc<AtomicBool>,
}

impl MountHandle {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unmount(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

impl Default for MountHandle {
    fn default() -> Self {
        Self::new()
    }
}
