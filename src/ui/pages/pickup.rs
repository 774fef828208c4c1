use dioxus::prelude::*;
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        apply_category_rates, estimate_for_selection, pickup_form::INVALID_FORM_MESSAGE,
        AppState, EstimateOutcome, FieldMark, FieldMarks, PickupField, PickupForm,
    },
    infra::{
        kawadi::{ClientError, FetchMode, KawadiClient},
        markup::{extract_alerts, parse_pickup_page},
    },
    ui::{
        components::{
            alert::push_alerts,
            confirm::ConfirmDialog,
            estimate_display::EstimateDisplay,
            loading::{page_loaded, OverlayState, SubmitButton},
            toast::{notify, ToastKind, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn PickupPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<Signal<Option<KawadiClient>>>();
    let overlay = use_context::<Signal<OverlayState>>();

    let mut form = use_signal(PickupForm::default);
    let mut marks = use_signal(FieldMarks::default);
    let mut submitting = use_signal(|| false);
    let mut confirm_clear = use_signal(|| false);

    let _initial = use_future(move || async move {
        load_pickup_page(state, client, toasts).await;
        page_loaded(overlay);
    });

    let (options, loaded) = state.with(|st| (st.pickup.options.clone(), st.pickup.loaded));
    let current = form();
    let outcome = estimate_for_selection(&options, &current.category_id, &current.weight);
    if let EstimateOutcome::Suppressed(reason) = outcome {
        debug!(event = "estimate.suppressed", ?reason);
    }
    let field_marks = marks();
    let mark = |field: PickupField| field_marks.mark(&current, field);
    let error = |field: PickupField| match mark(field) {
        FieldMark::Invalid => current.field_error(field),
        _ => None,
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if *submitting.peek() {
            return;
        }
        marks.with_mut(|m| m.touch_all());
        let snapshot = form.peek().clone();
        if !snapshot.is_valid() {
            debug!(event = "pickup.submit_blocked", invalid = ?snapshot.invalid_fields());
            notify(toasts, ToastKind::Error, INVALID_FORM_MESSAGE);
            return;
        }
        submitting.set(true);
        spawn(async move {
            submit_pickup(state, client, toasts, form, marks, snapshot).await;
            submitting.set(false);
        });
    };

    rsx! {
        div { class: "space-y-6",
            h2 { class: "text-2xl font-semibold tracking-tight", "Request Pickup" }

            form {
                class: "{theme::panel()} space-y-5",
                novalidate: true,
                onsubmit: on_submit,

                div {
                    label { class: "{theme::label_class()}", r#for: "id_waste_category", "Waste category" }
                    select {
                        id: "id_waste_category",
                        class: "{theme::input_class(mark(PickupField::Category))}",
                        disabled: !loaded,
                        value: "{current.category_id}",
                        onchange: move |evt| form.with_mut(|f| f.set(PickupField::Category, evt.value())),
                        onblur: move |_| marks.with_mut(|m| m.touch(PickupField::Category)),
                        if options.is_empty() {
                            option { value: "", if loaded { "No categories available" } else { "Loading..." } }
                        }
                        for opt in options.iter() {
                            option {
                                key: "{opt.id}",
                                value: "{opt.id}",
                                selected: opt.id == current.category_id,
                                "{opt.label}"
                            }
                        }
                    }
                    if let Some(message) = error(PickupField::Category) {
                        p { class: "mt-1 text-xs text-rose-300", "{message}" }
                    }
                }

                div {
                    label { class: "{theme::label_class()}", r#for: "id_estimated_weight_kg", "Estimated weight (kg)" }
                    input {
                        id: "id_estimated_weight_kg",
                        r#type: "number",
                        step: "0.1",
                        min: "0",
                        class: "{theme::input_class(mark(PickupField::Weight))}",
                        value: "{current.weight}",
                        oninput: move |evt| form.with_mut(|f| f.set(PickupField::Weight, evt.value())),
                        onblur: move |_| marks.with_mut(|m| m.touch(PickupField::Weight)),
                    }
                    if let Some(message) = error(PickupField::Weight) {
                        p { class: "mt-1 text-xs text-rose-300", "{message}" }
                    }
                    EstimateDisplay { outcome }
                }

                div { class: "grid gap-4 sm:grid-cols-2",
                    div {
                        label { class: "{theme::label_class()}", r#for: "id_pickup_date", "Pickup date" }
                        input {
                            id: "id_pickup_date",
                            r#type: "date",
                            class: "{theme::input_class(mark(PickupField::PickupDate))}",
                            value: "{current.pickup_date}",
                            oninput: move |evt| form.with_mut(|f| f.set(PickupField::PickupDate, evt.value())),
                            onblur: move |_| marks.with_mut(|m| m.touch(PickupField::PickupDate)),
                        }
                        if let Some(message) = error(PickupField::PickupDate) {
                            p { class: "mt-1 text-xs text-rose-300", "{message}" }
                        }
                    }
                    div {
                        label { class: "{theme::label_class()}", r#for: "id_pickup_time", "Pickup time" }
                        input {
                            id: "id_pickup_time",
                            r#type: "time",
                            class: "{theme::input_class(mark(PickupField::PickupTime))}",
                            value: "{current.pickup_time}",
                            oninput: move |evt| form.with_mut(|f| f.set(PickupField::PickupTime, evt.value())),
                            onblur: move |_| marks.with_mut(|m| m.touch(PickupField::PickupTime)),
                        }
                        if let Some(message) = error(PickupField::PickupTime) {
                            p { class: "mt-1 text-xs text-rose-300", "{message}" }
                        }
                    }
                }

                div {
                    label { class: "{theme::label_class()}", r#for: "id_address", "Pickup address" }
                    textarea {
                        id: "id_address",
                        rows: "3",
                        class: "{theme::input_class(mark(PickupField::Address))}",
                        value: "{current.address}",
                        oninput: move |evt| form.with_mut(|f| f.set(PickupField::Address, evt.value())),
                        onblur: move |_| marks.with_mut(|m| m.touch(PickupField::Address)),
                    }
                    if let Some(message) = error(PickupField::Address) {
                        p { class: "mt-1 text-xs text-rose-300", "{message}" }
                    }
                }

                div {
                    label { class: "{theme::label_class()}", r#for: "id_special_instructions", "Special instructions (optional)" }
                    textarea {
                        id: "id_special_instructions",
                        rows: "2",
                        class: "{theme::input_class(mark(PickupField::SpecialInstructions))}",
                        value: "{current.special_instructions}",
                        oninput: move |evt| form.with_mut(|f| f.set(PickupField::SpecialInstructions, evt.value())),
                        onblur: move |_| marks.with_mut(|m| m.touch(PickupField::SpecialInstructions)),
                    }
                }

                div { class: "flex items-center gap-3",
                    SubmitButton { label: "Request Pickup".to_string(), loading: submitting() }
                    button {
                        r#type: "button",
                        class: "{theme::btn_secondary()}",
                        onclick: move |_| confirm_clear.set(true),
                        "Clear form"
                    }
                }
            }

            if confirm_clear() {
                ConfirmDialog {
                    message: Some("Clear everything you have entered?".to_string()),
                    on_confirm: move |_| {
                        form.set(PickupForm::default());
                        marks.with_mut(|m| m.clear());
                        confirm_clear.set(false);
                    },
                    on_cancel: move |_| confirm_clear.set(false),
                }
            }
        }
    }
}

/// Reads the server's pickup page for its options and CSRF token, then
/// overlays rates from the category API.
async fn load_pickup_page(
    mut state: Signal<AppState>,
    client: Signal<Option<KawadiClient>>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    let Some(client) = client.peek().clone() else {
        notify(toasts, ToastKind::Error, "Server address is not configured.");
        return;
    };
    let path = state.peek().settings.pickup_path.clone();

    let page = match client.fetch_page(&path, FetchMode::Navigation).await {
        Ok(response) => parse_pickup_page(&response.html).map_err(ClientError::from),
        Err(err) => Err(err),
    };
    let mut page = match page {
        Ok(page) => page,
        Err(err) => {
            warn!(event = "pickup.page_load_failed", path = %path, error = %err);
            state.with_mut(|st| st.pickup.loaded = true);
            notify(
                toasts,
                ToastKind::Error,
                format!("Could not load the pickup form: {err}"),
            );
            return;
        }
    };

    // Failing here is fine: the labels still carry a readable rate.
    match client.get_waste_categories().await {
        Ok(categories) => {
            let updated = apply_category_rates(&mut page.options, &categories);
            debug!(event = "pickup.rates_applied", updated);
        }
        Err(err) => {
            warn!(event = "pickup.categories_failed", error = %err);
        }
    }

    info!(event = "pickup.page_loaded", options = page.options.len());
    state.with_mut(|st| {
        st.pickup.options = page.options;
        st.pickup.csrf_token = page.csrf_token;
        st.pickup.loaded = true;
    });
}

async fn submit_pickup(
    mut state: Signal<AppState>,
    client: Signal<Option<KawadiClient>>,
    toasts: Signal<Vec<ToastMessage>>,
    mut form: Signal<PickupForm>,
    mut marks: Signal<FieldMarks>,
    snapshot: PickupForm,
) {
    let Some(client) = client.peek().clone() else {
        notify(toasts, ToastKind::Error, "Server address is not configured.");
        return;
    };
    let (path, token) = state.with(|st| {
        (
            st.settings.pickup_path.clone(),
            st.pickup.csrf_token.clone(),
        )
    });
    let pairs = snapshot.to_form_pairs(token.as_deref());

    let response = match client.submit_form(&path, &pairs).await {
        Ok(response) => response,
        Err(err) => {
            warn!(event = "pickup.submit_failed", error = %err);
            notify(
                toasts,
                ToastKind::Error,
                format!("Could not submit the request: {err}"),
            );
            return;
        }
    };

    match extract_alerts(&response.html) {
        Ok(alerts) => push_alerts(state, alerts),
        Err(err) => warn!(event = "pickup.alerts_unreadable", error = %err),
    }

    let accepted = client
        .url(&path)
        .map(|pickup_url| redirected_away(&response.final_url, &pickup_url))
        .unwrap_or(false);

    if accepted {
        info!(event = "pickup.submitted", final_url = %response.final_url);
        form.set(PickupForm::default());
        marks.with_mut(|m| m.clear());
        notify(toasts, ToastKind::Success, "Pickup request submitted.");
    } else {
        // The re-rendered form carries a fresh token.
        if let Ok(page) = parse_pickup_page(&response.html) {
            if page.csrf_token.is_some() {
                state.with_mut(|st| st.pickup.csrf_token = page.csrf_token);
            }
        }
        info!(event = "pickup.rejected");
        notify(
            toasts,
            ToastKind::Warning,
            "The server did not accept the request. Check the messages above.",
        );
    }
}

/// Django redirects after a successful POST; a rejected form is re-rendered
/// at the same address.
fn redirected_away(final_url: &Url, pickup_url: &Url) -> bool {
    final_url.path().trim_end_matches('/') != pickup_url.path().trim_end_matches('/')
}
