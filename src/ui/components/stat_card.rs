use dioxus::prelude::*;

use crate::domain::StatCard;

/// One dashboard metric. The body is the server's own card markup so a
/// refresh can swap it wholesale.
#[component]
pub fn StatCardView(card: StatCard) -> Element {
    rsx! {
        div {
            class: "stat-card {card.key.css_class()} rounded-xl p-4 shadow-sm",
            "data-stat": "{card.key.css_class()}",
            dangerous_inner_html: "{card.inner_html}",
        }
    }
}
