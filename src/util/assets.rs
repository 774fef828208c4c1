use std::{borrow::Cow, sync::OnceLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_embed::RustEmbed;
use tracing::warn;

/// Everything under `assets/` ships inside the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static TAILWIND_CSS: OnceLock<String> = OnceLock::new();
static FAVICON_DATA_URI: OnceLock<String> = OnceLock::new();

/// Hand-written rules for the overlay, toasts and stat cards.
pub fn main_css() -> &'static str {
    MAIN_CSS.get_or_init(|| load_text("main.css")).as_str()
}

/// Compiled utility classes. Empty until `assets/tailwind.css` has been
/// generated (see `tailwind.input.css`).
pub fn tailwind_css() -> &'static str {
    TAILWIND_CSS.get_or_init(|| load_text("tailwind.css")).as_str()
}

pub fn favicon_data_uri() -> &'static str {
    FAVICON_DATA_URI
        .get_or_init(|| load_data_uri("favicon.svg"))
        .as_str()
}

fn load_text(path: &str) -> String {
    match load_asset(path) {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => {
            warn!(event = "assets.missing", path);
            String::new()
        }
    }
}

fn load_data_uri(path: &str) -> String {
    let encoded = load_asset(path)
        .map(|bytes| STANDARD.encode(bytes.as_ref()))
        .unwrap_or_default();
    format!("data:{};base64,{encoded}", guess_mime(path))
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    EmbeddedAssets::get(path.trim_start_matches('/')).map(|file| file.data)
}

fn guess_mime(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favicon_is_an_svg_data_uri() {
        assert!(favicon_data_uri().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn main_css_is_embedded() {
        assert!(main_css().contains("#page-loading"));
    }
}
