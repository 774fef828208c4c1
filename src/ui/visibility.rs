use dioxus::document;
use tracing::debug;

use crate::infra::refresher::VisibilityProbe;

/// Asks the webview whether the document is currently visible.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentVisibility;

impl VisibilityProbe for DocumentVisibility {
    async fn is_visible(&self) -> bool {
        match document::eval("return document.visibilityState !== 'hidden';")
            .join::<bool>()
            .await
        {
            Ok(visible) => visible,
            Err(err) => {
                // Without an answer, assume the user is looking.
                debug!(event = "visibility.probe_failed", error = %err);
                true
            }
        }
    }
}
