use dioxus::prelude::*;

use crate::domain::{EstimateOutcome, ESTIMATE_HEADING};
use crate::ui::components::tooltip::Tooltip;

/// Live price estimate under the weight field. Renders nothing while the
/// estimate is suppressed.
#[component]
pub fn EstimateDisplay(outcome: EstimateOutcome) -> Element {
    let Some(result) = outcome.result().copied() else {
        return rsx! { Fragment {} };
    };

    rsx! {
        div {
            id: "price-estimate",
            class: "mt-3 rounded-lg border border-emerald-500/40 bg-emerald-500/10 px-4 py-3",
            Tooltip { text: "Final amount is set when the waste is weighed at pickup.".to_string(),
                strong { class: "text-emerald-200", "{ESTIMATE_HEADING}" }
                span { class: "text-lg font-semibold text-emerald-100", "{result.total_display()}" }
            }
            br {}
            small { class: "text-xs text-slate-400", "{result.rate_line()}" }
        }
    }
}
