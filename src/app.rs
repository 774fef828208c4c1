use dioxus::{prelude::*, signals::Signal};
use tracing::{debug, info, warn};

use crate::{
    domain::AppState,
    infra::{
        kawadi::KawadiClient,
        refresher::{DashboardRefresher, RefreshGate, TickOutcome},
    },
    ui::{
        components::{
            loading::OverlayState,
            toast::{Toast, ToastMessage},
        },
        pages::{DashboardPage, PickupPage, SettingsPage},
        shell::Shell,
        visibility::DocumentVisibility,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/request-pickup")]
    RequestPickup {},
    #[route("/settings")]
    Settings {},
}

/// Server path mirrored by the screen on display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurrentLocation(pub String);

#[component]
pub fn App() -> Element {
    let mut state = use_signal(AppState::default);
    let client = use_signal(|| None::<KawadiClient>);
    use_hook(move || {
        let saved = load_persisted_state();
        info!(event = "app.settings_loaded", base_url = %saved.settings.base_url);
        state.with_mut(|st| st.apply_persisted(saved));
        rebuild_client(state, client);
    });
    use_context_provider(|| state);
    use_context_provider(|| client);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let overlay = use_signal(OverlayState::default);
    use_context_provider(|| overlay);

    let location = use_signal(CurrentLocation::default);
    use_context_provider(|| location);

    let gate = use_hook(RefreshGate::default);
    let _auto_refresh = use_future(move || {
        let gate = gate.clone();
        async move {
            loop {
                let interval = state.peek().settings.refresh_interval();
                tokio::time::sleep(interval).await;
                refresh_tick(state, client, location, gate.clone());
            }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        document::Style { "{assets::tailwind_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// Starts one background refresh without holding up the timer.
fn refresh_tick(
    mut state: Signal<AppState>,
    client: Signal<Option<KawadiClient>>,
    location: Signal<CurrentLocation>,
    gate: RefreshGate,
) {
    if !state.peek().settings.auto_refresh {
        return;
    }
    if gate.is_busy() {
        debug!(event = "refresh.tick_skipped", reason = "in_flight");
        return;
    }
    let Some(client) = client.peek().clone() else {
        debug!(event = "refresh.tick_skipped", reason = "no_client");
        return;
    };
    let path = location.peek().0.clone();

    spawn(async move {
        let refresher = DashboardRefresher::new(client, DocumentVisibility, gate);
        if let TickOutcome::Refreshed(snapshot) = refresher.tick(&path).await {
            state.with_mut(|st| {
                st.dashboard
                    .patch(snapshot.cards, snapshot.charts, snapshot.fetched_at)
            });
        }
    });
}

/// Replaces the shared HTTP client after the server settings changed.
/// Returns false when no client could be built for the configured address.
pub fn rebuild_client(state: Signal<AppState>, mut client: Signal<Option<KawadiClient>>) -> bool {
    let settings = state.peek().settings.clone();
    match KawadiClient::from_settings(&settings) {
        Ok(built) => {
            client.set(Some(built));
            true
        }
        Err(err) => {
            warn!(event = "app.client_build_failed", base_url = %settings.base_url, error = %err);
            client.set(None);
            false
        }
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!(event = "app.persist_failed", error = %err);
    }
}

#[component]
pub fn Dashboard() -> Element {
    rsx! { Shell { DashboardPage {} } }
}

#[component]
pub fn RequestPickup() -> Element {
    rsx! { Shell { PickupPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
