use dioxus::prelude::*;

use crate::ui::theme;

pub const DEFAULT_CONFIRM_MESSAGE: &str = "Are you sure?";

/// Modal guard in front of a destructive action.
#[component]
pub fn ConfirmDialog(
    message: Option<String>,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let message = message
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIRM_MESSAGE.to_string());

    rsx! {
        div {
            class: "fixed inset-0 z-40 flex items-center justify-center bg-slate-950/70",
            role: "dialog",
            div { class: "w-full max-w-sm {theme::panel()} bg-slate-900 shadow-xl",
                p { class: "text-sm text-slate-200", "{message}" }
                div { class: "mt-6 flex justify-end gap-3",
                    button {
                        class: "{theme::btn_secondary()}",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "{theme::btn_danger()}",
                        onclick: move |_| on_confirm.call(()),
                        "Confirm"
                    }
                }
            }
        }
    }
}
