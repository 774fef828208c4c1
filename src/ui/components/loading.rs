use std::time::Duration;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;

use crate::ui::{store::SharedState, theme};

/// The overlay never stays up longer than this.
pub const OVERLAY_CEILING: Duration = Duration::from_secs(3);
/// Delay between a screen finishing its load and the overlay going away.
pub const OVERLAY_SETTLE: Duration = Duration::from_millis(500);

/// Full-screen spinner state. Every `show` issues a new ticket so a stale
/// timer cannot hide an overlay that was raised again later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayState {
    ticket: u64,
    visible: bool,
}

impl OverlayState {
    pub fn show(&mut self) -> u64 {
        self.ticket += 1;
        self.visible = true;
        self.ticket
    }

    pub fn hide(&mut self, ticket: u64) -> bool {
        if self.visible && self.ticket == ticket {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

/// Raises the overlay and arms its hard ceiling.
pub fn show_page_loading(mut overlay: Signal<OverlayState>) {
    let ticket = overlay.with_mut(|state| state.show());
    // Outlives the screen that raised it.
    spawn_forever(hide_overlay_after(overlay, ticket, OVERLAY_CEILING));
}

/// Called by a screen once its initial load is done.
pub fn page_loaded(overlay: Signal<OverlayState>) {
    let current = *overlay.peek();
    if !current.is_visible() {
        return;
    }
    spawn_forever(hide_overlay_after(overlay, current.ticket(), OVERLAY_SETTLE));
}

/// Hides the overlay after `delay` unless it was raised again meanwhile.
pub async fn hide_overlay_after(
    mut overlay: impl SharedState<OverlayState>,
    ticket: u64,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;
    overlay.update(|state| state.hide(ticket));
}

#[component]
pub fn LoadingOverlay() -> Element {
    let overlay = use_context::<Signal<OverlayState>>();
    if !overlay().is_visible() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div { id: "page-loading",
            div { class: "spinner spinner-lg", role: "status" }
        }
    }
}

/// Submit button that swaps to a spinner and "Processing..." while busy.
#[component]
pub fn SubmitButton(label: String, loading: bool) -> Element {
    rsx! {
        button {
            r#type: "submit",
            class: "{theme::btn_primary()}",
            disabled: loading,
            if loading {
                span { class: "spinner", role: "status" }
                "Processing..."
            } else {
                "{label}"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn stale_ticket_cannot_hide_a_newer_overlay() {
        let mut overlay = OverlayState::default();
        let first = overlay.show();
        let second = overlay.show();

        assert!(!overlay.hide(first));
        assert!(overlay.is_visible());
        assert!(overlay.hide(second));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn hiding_twice_is_harmless() {
        let mut overlay = OverlayState::default();
        let ticket = overlay.show();
        assert!(overlay.hide(ticket));
        assert!(!overlay.hide(ticket));
    }

    async fn run_pending() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn overlay_comes_down_at_the_ceiling() {
        let overlay = Arc::new(Mutex::new(OverlayState::default()));
        let ticket = overlay.lock().unwrap().show();
        let timer = tokio::spawn(hide_overlay_after(overlay.clone(), ticket, OVERLAY_CEILING));
        run_pending().await;

        tokio::time::advance(Duration::from_millis(2_999)).await;
        run_pending().await;
        assert!(overlay.lock().unwrap().is_visible());

        tokio::time::advance(Duration::from_millis(1)).await;
        run_pending().await;
        assert!(!overlay.lock().unwrap().is_visible());
        timer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn settle_hides_before_the_ceiling_and_stale_timers_do_nothing() {
        let overlay = Arc::new(Mutex::new(OverlayState::default()));
        let first = overlay.lock().unwrap().show();
        let ceiling = tokio::spawn(hide_overlay_after(overlay.clone(), first, OVERLAY_CEILING));
        let settle_timer = tokio::spawn(hide_overlay_after(overlay.clone(), first, OVERLAY_SETTLE));
        run_pending().await;

        tokio::time::advance(OVERLAY_SETTLE).await;
        run_pending().await;
        assert!(!overlay.lock().unwrap().is_visible());
        settle_timer.await.unwrap();

        // Raised again by the next screen; the first ceiling must not hide it.
        overlay.lock().unwrap().show();
        ceiling.await.unwrap();
        assert!(overlay.lock().unwrap().is_visible());
    }
}
