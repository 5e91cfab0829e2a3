//! Page scroll lock shared between a page and its overlays.
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

/// Counted lock on page scrolling.
///
/// The page owns one and checks [`ScrollLock::is_locked`] before scrolling. Overlays hold a
/// [`ScrollLockGuard`] for as long as they are open; the page scrolls again once every guard is
/// gone.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicU32>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        let prev = self.holders.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(holders = prev + 1, "page scroll locked");
        ScrollLockGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    pub fn holders(&self) -> u32 {
        self.holders.load(Ordering::Acquire)
    }
}

/// Releases its hold on the [`ScrollLock`] when dropped.
#[derive(Debug)]
#[must_use = "the page unlocks as soon as the guard is dropped"]
pub struct ScrollLockGuard {
    holders: Arc<AtomicU32>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        let prev = self.holders.fetch_sub(1, Ordering::AcqRel);
        tracing::trace!(holders = prev.saturating_sub(1), "page scroll lock released");
    }
}
