use std::time::SystemTime;

use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    domain::AppState,
    infra::{
        kawadi::{ClientError, FetchMode, KawadiClient},
        refresher::parse_snapshot,
    },
    ui::{
        components::{
            charts::{ImpactChart, TrendChart},
            loading::{page_loaded, OverlayState},
            stat_card::StatCardView,
            tooltip::Tooltip,
        },
        theme,
    },
    util::format::clock_label,
};

#[component]
pub fn DashboardPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let client = use_context::<Signal<Option<KawadiClient>>>();
    let overlay = use_context::<Signal<OverlayState>>();
    let loading = use_signal(|| false);

    let _initial = use_future(move || async move {
        load_dashboard(state, client, loading).await;
        page_loaded(overlay);
    });

    let (cards, charts, last_refreshed, loaded, auto_refresh, interval) = state.with(|st| {
        (
            st.dashboard.board.iter().cloned().collect::<Vec<_>>(),
            st.dashboard.charts.clone(),
            st.dashboard.last_refreshed.map(clock_label),
            st.dashboard.loaded,
            st.settings.auto_refresh,
            st.settings.refresh_interval_secs,
        )
    });

    let on_refresh = move |_| {
        if *loading.peek() {
            return;
        }
        spawn(async move {
            load_dashboard(state, client, loading).await;
        });
    };

    rsx! {
        div { class: "space-y-8",
            section { class: "flex flex-wrap items-center justify-between gap-4",
                div {
                    h2 { class: "text-2xl font-semibold tracking-tight", "Dashboard" }
                    p { class: "text-xs text-slate-500",
                        if let Some(at) = last_refreshed {
                            "Last refreshed {at}"
                        } else {
                            "Not loaded yet"
                        }
                        if auto_refresh {
                            " · auto-refresh every {interval}s"
                        }
                    }
                }
                Tooltip { text: "Fetch the latest figures from the server now.".to_string(),
                    button {
                        class: "{theme::btn_secondary()}",
                        disabled: loading(),
                        onclick: on_refresh,
                        if loading() { "Refreshing..." } else { "Refresh now" }
                    }
                }
            }

            if cards.is_empty() {
                section { class: "{theme::panel()}",
                    p { class: "text-sm text-slate-400",
                        if loaded {
                            "The server page has no statistics to show. Are you signed in?"
                        } else {
                            "Loading statistics..."
                        }
                    }
                }
            } else {
                section { class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-4",
                    for card in cards {
                        StatCardView { key: "{card.key.css_class()}", card }
                    }
                }
            }

            if charts.impact.is_some() || charts.trend.is_some() {
                section { class: "grid gap-6 lg:grid-cols-2",
                    if let Some(summary) = charts.impact {
                        ImpactChart { summary }
                    }
                    if let Some(points) = charts.trend {
                        TrendChart { points }
                    }
                }
            }
        }
    }
}

/// Loads the dashboard as a regular navigation. Failures keep whatever is
/// already on screen.
async fn load_dashboard(
    mut state: Signal<AppState>,
    client: Signal<Option<KawadiClient>>,
    mut loading: Signal<bool>,
) {
    let Some(client) = client.peek().clone() else {
        warn!(event = "dashboard.load_skipped", reason = "no_client");
        return;
    };
    let path = state.peek().settings.dashboard_path.clone();

    loading.set(true);
    let result = match client.fetch_page(&path, FetchMode::Navigation).await {
        Ok(page) => parse_snapshot(&page.html, SystemTime::now()).map_err(ClientError::from),
        Err(err) => Err(err),
    };
    loading.set(false);

    match result {
        Ok(snapshot) => {
            info!(
                event = "dashboard.loaded",
                path = %path,
                cards = snapshot.cards.len()
            );
            state.with_mut(|st| {
                st.dashboard
                    .load(snapshot.cards, snapshot.charts, snapshot.fetched_at)
            });
        }
        Err(err) => {
            warn!(event = "dashboard.load_failed", path = %path, error = %err);
            state.with_mut(|st| st.dashboard.loaded = true);
        }
    }
}
