//! Shared application state, handed to every handler.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Platform;
use crate::store::Store;

/// Everything a handler might need, built once in `main` and shared behind
/// an `Arc`.
pub struct AppState {
    pub db: Store,
    pub metrics: HitCounter,
    pub platform: Platform,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(db: Store, platform: Platform, static_dir: PathBuf) -> Self {
        Self {
            db,
            metrics: HitCounter::default(),
            platform,
            static_dir,
        }
    }
}

/// Counts requests to the static file site.
///
/// A plain atomic — every `/app` hit is one `fetch_add`, and the counter
/// survives only as long as the process. `Relaxed` is enough: nothing
/// synchronises *through* the counter, we only ever read its value.
#[derive(Default)]
pub struct HitCounter(AtomicU64);

impl HitCounter {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}
