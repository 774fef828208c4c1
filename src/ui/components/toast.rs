use std::time::Duration;

use dioxus::prelude::*;
use tracing::debug;

use crate::ui::{store::SharedState, theme};
use crate::util::generate_id;

pub const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(5);
pub const TOAST_FADE: Duration = Duration::from_millis(300);
const MAX_TOASTS: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
    /// Set once the fade-out has started.
    pub leaving: bool,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
            leaving: false,
        }
    }
}

/// Appends a toast, evicting the oldest once the stack is full.
pub fn enqueue(entries: &mut Vec<ToastMessage>, message: ToastMessage) {
    if entries.len() >= MAX_TOASTS {
        entries.remove(0);
    }
    entries.push(message);
}

pub fn begin_fade(entries: &mut [ToastMessage], id: &str) {
    if let Some(toast) = entries.iter_mut().find(|toast| toast.id == id) {
        toast.leaving = true;
    }
}

pub fn dismiss(entries: &mut Vec<ToastMessage>, id: &str) {
    entries.retain(|toast| toast.id != id);
}

/// Shows a toast. This is the one entry point pages use for notifications.
pub fn notify(mut toasts: Signal<Vec<ToastMessage>>, kind: ToastKind, message: impl Into<String>) {
    let message = ToastMessage::new(kind, message);
    debug!(event = "toast.shown", kind = ?message.kind, text = %message.text);
    toasts.with_mut(|entries| enqueue(entries, message));
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let views = toasts()
        .into_iter()
        .map(ToastView::from)
        .collect::<Vec<_>>();

    // The container only exists while there is something to show.
    if views.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            id: "toast-container",
            ul {
                class: "space-y-3",
                for view in views {
                    ToastCard { key: "{view.id}", view, toasts }
                }
            }
        }
    }
}

#[component]
fn ToastCard(view: ToastView, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let toast_id = view.id.clone();
    let _auto_dismiss = use_future(move || expire_toast(toasts, toast_id.clone()));

    let leaving = if view.leaving { "leaving" } else { "" };
    let dismiss_id = view.id.clone();
    rsx! {
        li {
            class: "toast {leaving} flex items-start gap-3 rounded-xl border px-4 py-3 shadow-lg {view.theme}",
            role: "alert",
            span { class: "text-lg", "{view.icon}" }
            p { class: "text-sm font-medium", "{view.text}" }
            button {
                class: "ml-3 text-xs uppercase tracking-wide opacity-70 hover:opacity-100",
                onclick: move |_| close_toast(toasts, &dismiss_id),
                "✕"
            }
        }
    }
}

/// Fades a toast out after its display time, then removes it.
pub async fn expire_toast(mut toasts: impl SharedState<Vec<ToastMessage>>, id: String) {
    tokio::time::sleep(TOAST_AUTO_DISMISS).await;
    toasts.update(|items| begin_fade(items, &id));
    tokio::time::sleep(TOAST_FADE).await;
    toasts.update(|items| dismiss(items, &id));
}

fn close_toast(mut toasts: Signal<Vec<ToastMessage>>, id: &str) {
    toasts.with_mut(|items| dismiss(items, id));
}

#[derive(Clone, PartialEq)]
struct ToastView {
    id: String,
    text: String,
    leaving: bool,
    theme: &'static str,
    icon: &'static str,
}

impl From<ToastMessage> for ToastView {
    fn from(message: ToastMessage) -> Self {
        let (theme, icon) = theme::toast(message.kind);
        ToastView {
            id: message.id,
            text: message.text,
            leaving: message.leaving,
            theme,
            icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    async fn run_pending() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn stack_keeps_the_newest_five() {
        let mut entries = Vec::new();
        for n in 0..7 {
            enqueue(&mut entries, ToastMessage::new(ToastKind::Info, format!("#{n}")));
        }
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].text, "#2");
        assert_eq!(entries[4].text, "#6");
    }

    #[test]
    fn fade_then_dismiss() {
        let mut entries = Vec::new();
        let toast = ToastMessage::new(ToastKind::Error, "boom");
        let id = toast.id.clone();
        enqueue(&mut entries, toast);
        enqueue(&mut entries, ToastMessage::new(ToastKind::Success, "ok"));

        begin_fade(&mut entries, &id);
        assert!(entries[0].leaving);
        assert!(!entries[1].leaving);

        dismiss(&mut entries, &id);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "ok");
    }

    #[test]
    fn default_kind_is_success() {
        assert_eq!(ToastKind::default(), ToastKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn toast_fades_at_five_seconds_and_is_gone_after_the_fade() {
        let toasts = Arc::new(Mutex::new(Vec::new()));
        let toast = ToastMessage::new(ToastKind::Info, "Saved");
        let id = toast.id.clone();
        enqueue(&mut toasts.lock().unwrap(), toast);
        let timer = tokio::spawn(expire_toast(toasts.clone(), id));
        run_pending().await;

        tokio::time::advance(Duration::from_millis(4_999)).await;
        run_pending().await;
        assert!(!toasts.lock().unwrap()[0].leaving);

        tokio::time::advance(Duration::from_millis(1)).await;
        run_pending().await;
        assert!(toasts.lock().unwrap()[0].leaving);

        tokio::time::advance(TOAST_FADE).await;
        run_pending().await;
        assert!(toasts.lock().unwrap().is_empty());
        timer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_leaves_other_toasts_alone() {
        let toasts = Arc::new(Mutex::new(Vec::new()));
        let first = ToastMessage::new(ToastKind::Error, "Failed");
        let id = first.id.clone();
        enqueue(&mut toasts.lock().unwrap(), first);
        enqueue(
            &mut toasts.lock().unwrap(),
            ToastMessage::new(ToastKind::Success, "Saved"),
        );

        expire_toast(toasts.clone(), id).await;

        let remaining = toasts.lock().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "Saved");
        assert!(!remaining[0].leaving);
    }
}
