pub const APP_NAME: &str = "Kawadi Client";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("KAWADI_GIT_TAG");

/// Release tag when built from a tagged checkout, crate version otherwise.
pub fn version_label() -> String {
    match GIT_TAG {
        Some(tag) => tag.to_string(),
        None => format!("v{APP_VERSION}"),
    }
}

pub fn user_agent() -> String {
    format!("kawadi-client/{}", version_label().trim_start_matches('v'))
}
