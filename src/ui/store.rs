//! Write access to shared UI state, so timed effects can run against a
//! `Signal` in the app and a plain mutex in tests.

use dioxus::prelude::*;

pub trait SharedState<T> {
    fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T: 'static> SharedState<T> for Signal<T> {
    fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        self.with_mut(f)
    }
}

#[cfg(test)]
impl<T> SharedState<T> for std::sync::Arc<std::sync::Mutex<T>> {
    fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}
