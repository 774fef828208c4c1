use dioxus::prelude::*;

use crate::app::{CurrentLocation, Route};
use crate::domain::AppState;
use crate::ui::components::{
    alert::AlertStack,
    loading::{show_page_loading, LoadingOverlay, OverlayState},
    tooltip::Tooltip,
};
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let mut location = use_context::<Signal<CurrentLocation>>();
    let overlay = use_context::<Signal<OverlayState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    // Server path this screen mirrors; the refresher only acts on dashboards.
    let server_path = state.with(|st| match current_route {
        Route::Dashboard {} => st.settings.dashboard_path.clone(),
        Route::RequestPickup {} => st.settings.pickup_path.clone(),
        Route::Settings {} => String::new(),
    });
    use_effect(move || location.set(CurrentLocation(server_path.clone())));

    let go = move |route: Route| {
        show_page_loading(overlay);
        nav.push(route);
    };

    let base_url = state.with(|st| st.settings.base_url.clone());

    rsx! {
        div { class: "min-h-screen bg-slate-950 text-slate-100 font-sans",
            LoadingOverlay {}
            header {
                class: "border-b border-slate-900/60 bg-slate-950/80 backdrop-blur px-6 py-4",
                div { class: "mx-auto flex max-w-6xl items-center justify-between gap-4",
                    div { class: "flex items-center gap-3",
                        span { class: "text-2xl", "♻️" }
                        div {
                            h1 { class: "text-xl font-semibold tracking-tight text-emerald-200", "{APP_NAME}" }
                            p { class: "text-xs text-slate-500", "{base_url} · {version_label()}" }
                        }
                    }
                    nav { class: "flex gap-2 text-sm",
                        Tooltip { text: "Your statistics and impact".to_string(),
                            NavButton {
                                active: matches!(current_route, Route::Dashboard {}),
                                onclick: move |_| go(Route::Dashboard {}),
                                label: "📊 Dashboard",
                            }
                        }
                        Tooltip { text: "Schedule a new waste pickup".to_string(),
                            NavButton {
                                active: matches!(current_route, Route::RequestPickup {}),
                                onclick: move |_| go(Route::RequestPickup {}),
                                label: "🚚 Request Pickup",
                            }
                        }
                        NavButton {
                            active: matches!(current_route, Route::Settings {}),
                            onclick: move |_| go(Route::Settings {}),
                            label: "⚙️",
                        }
                    }
                }
            }
            main { class: "mx-auto max-w-6xl px-6 py-10",
                AlertStack {}
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "{theme::nav_button(active)}",
            onclick: move |_| {
                if !active {
                    onclick.call(());
                }
            },
            "{label}"
        }
    }
}
