use std::time::Duration;

use dioxus::prelude::*;

use crate::domain::{AppState, FlashMessage};
use crate::ui::theme;

pub const ALERT_AUTO_CLOSE: Duration = Duration::from_secs(5);

pub fn push_alerts(mut state: Signal<AppState>, alerts: Vec<FlashMessage>) {
    if alerts.is_empty() {
        return;
    }
    state.with_mut(|st| st.alerts.extend(alerts));
}

fn close_alert(mut state: Signal<AppState>, id: &str) {
    state.with_mut(|st| st.alerts.retain(|alert| alert.id != id));
}

/// Server messages from the last form response.
#[component]
pub fn AlertStack() -> Element {
    let state = use_context::<Signal<AppState>>();
    let alerts = state.with(|st| st.alerts.clone());
    if alerts.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div { class: "mb-6 space-y-2",
            for alert in alerts {
                AlertBanner { key: "{alert.id}", alert, state }
            }
        }
    }
}

#[component]
fn AlertBanner(alert: FlashMessage, state: Signal<AppState>) -> Element {
    let alert_id = alert.id.clone();
    let _auto_close = use_future(move || {
        let id = alert_id.clone();
        async move {
            tokio::time::sleep(ALERT_AUTO_CLOSE).await;
            close_alert(state, &id);
        }
    });

    let close_id = alert.id.clone();
    rsx! {
        div {
            class: "flex items-start justify-between rounded-lg border px-4 py-3 text-sm {theme::alert(alert.kind)}",
            role: "alert",
            span { "{alert.text}" }
            button {
                class: "ml-4 text-xs opacity-70 hover:opacity-100",
                onclick: move |_| close_alert(state, &close_id),
                "✕"
            }
        }
    }
}
