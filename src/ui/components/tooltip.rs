use dioxus::prelude::*;

/// Hover hint; the bubble is shown by CSS on `.tooltip-host:hover`.
#[component]
pub fn Tooltip(text: String, children: Element) -> Element {
    rsx! {
        span { class: "tooltip-host",
            {children}
            span { class: "tooltip-bubble", role: "tooltip", "{text}" }
        }
    }
}
