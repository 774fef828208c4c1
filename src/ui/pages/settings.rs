use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    app::{persist_user_state, rebuild_client},
    domain::{AppState, ClientSettings, FieldMark},
    infra::kawadi::KawadiClient,
    ui::{
        components::{
            confirm::ConfirmDialog,
            loading::{page_loaded, OverlayState},
            toast::{notify, ToastKind, ToastMessage},
        },
        theme,
    },
    util::{assets, persistence::BASE_URL_ENV, version::version_label},
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<Signal<Option<KawadiClient>>>();
    let overlay = use_context::<Signal<OverlayState>>();

    let initial = state.with(|st| st.settings.clone());

    let mut base_url_input = use_signal(|| initial.base_url.clone());
    let mut dashboard_input = use_signal(|| initial.dashboard_path.clone());
    let mut pickup_input = use_signal(|| initial.pickup_path.clone());
    let mut categories_input = use_signal(|| initial.categories_path.clone());
    let mut refresh_input = use_signal(|| initial.refresh_interval_secs.to_string());
    let mut auto_refresh_input = use_signal(|| initial.auto_refresh);
    let mut confirm_reset = use_signal(|| false);

    // Nothing to fetch here.
    use_hook(move || page_loaded(overlay));

    let on_apply = move |_| {
        let parsed = ClientSettings::parse(
            &base_url_input(),
            &dashboard_input(),
            &pickup_input(),
            &categories_input(),
            &refresh_input(),
            auto_refresh_input(),
        );

        match parsed {
            Ok(settings) => {
                info!(event = "settings.applied", base_url = %settings.base_url);
                base_url_input.set(settings.base_url.clone());
                dashboard_input.set(settings.dashboard_path.clone());
                pickup_input.set(settings.pickup_path.clone());
                categories_input.set(settings.categories_path.clone());
                apply_settings(state, client, toasts, settings);
                notify(toasts, ToastKind::Success, "Settings saved.");
            }
            Err(err) => {
                warn!(event = "settings.rejected", error = %err);
                notify(toasts, ToastKind::Error, err.to_string());
            }
        }
    };

    let on_reset = move |_| {
        let defaults = ClientSettings::default();
        base_url_input.set(defaults.base_url.clone());
        dashboard_input.set(defaults.dashboard_path.clone());
        pickup_input.set(defaults.pickup_path.clone());
        categories_input.set(defaults.categories_path.clone());
        refresh_input.set(defaults.refresh_interval_secs.to_string());
        auto_refresh_input.set(defaults.auto_refresh);
        apply_settings(state, client, toasts, defaults);
        confirm_reset.set(false);
        notify(toasts, ToastKind::Info, "Restored default settings.");
    };

    let input_class = theme::input_class(FieldMark::Untouched);
    let has_tailwind = !assets::tailwind_css().is_empty();

    rsx! {
        div { class: "space-y-8",
            section {
                class: "{theme::panel()}",
                h2 { class: "{theme::section_title()}", "Server" }
                p { class: "mt-2 text-xs text-slate-500",
                    "Set {BASE_URL_ENV} to override the server address at startup."
                }
                div { class: "mt-4 grid gap-4 sm:grid-cols-2",
                    div { class: "sm:col-span-2",
                        label { class: "{theme::label_class()}", "Base URL" }
                        input {
                            class: "{input_class}",
                            value: base_url_input(),
                            oninput: move |evt| base_url_input.set(evt.value()),
                        }
                    }
                    div {
                        label { class: "{theme::label_class()}", "Dashboard path" }
                        input {
                            class: "{input_class}",
                            value: dashboard_input(),
                            oninput: move |evt| dashboard_input.set(evt.value()),
                        }
                    }
                    div {
                        label { class: "{theme::label_class()}", "Pickup request path" }
                        input {
                            class: "{input_class}",
                            value: pickup_input(),
                            oninput: move |evt| pickup_input.set(evt.value()),
                        }
                    }
                    div {
                        label { class: "{theme::label_class()}", "Category API path" }
                        input {
                            class: "{input_class}",
                            value: categories_input(),
                            oninput: move |evt| categories_input.set(evt.value()),
                        }
                    }
                }
            }

            section {
                class: "{theme::panel()}",
                h2 { class: "{theme::section_title()}", "Dashboard refresh" }
                div { class: "mt-4 grid gap-4 sm:grid-cols-2",
                    div {
                        label { class: "{theme::label_class()}", "Interval (seconds, min 5)" }
                        input {
                            class: "{input_class}",
                            r#type: "number",
                            min: "5",
                            value: refresh_input(),
                            oninput: move |evt| refresh_input.set(evt.value()),
                        }
                    }
                    label { class: "flex items-center gap-3 text-sm text-slate-300",
                        input {
                            r#type: "checkbox",
                            checked: auto_refresh_input(),
                            onchange: move |evt| auto_refresh_input.set(evt.checked()),
                        }
                        "Refresh the dashboard in the background"
                    }
                }
            }

            div { class: "flex gap-3",
                button { class: "{theme::btn_primary()}", onclick: on_apply, "Apply" }
                button {
                    class: "{theme::btn_danger()}",
                    onclick: move |_| confirm_reset.set(true),
                    "Reset Defaults"
                }
            }

            section {
                class: "flex flex-col items-center gap-1 {theme::panel()} text-center text-xs text-slate-500",
                p { "Version {version_label()}" }
                if !has_tailwind {
                    p { class: "text-amber-300", "Tailwind stylesheet missing; run the Tailwind build." }
                }
            }

            if confirm_reset() {
                ConfirmDialog {
                    on_confirm: on_reset,
                    on_cancel: move |_| confirm_reset.set(false),
                }
            }
        }
    }
}

fn apply_settings(
    mut state: Signal<AppState>,
    client: Signal<Option<KawadiClient>>,
    toasts: Signal<Vec<ToastMessage>>,
    settings: ClientSettings,
) {
    state.with_mut(|st| {
        st.settings = settings;
        // Options and cards belong to the previous server.
        st.pickup = Default::default();
        st.dashboard = Default::default();
    });
    if !rebuild_client(state, client) {
        notify(toasts, ToastKind::Error, "Could not create an HTTP client for that address.");
    }
    persist_user_state(&state);
}
