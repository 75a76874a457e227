//! Page-provided client configuration.
//!
//! The hosting page may embed
//! `<script id="gatecount-config" type="application/json">{..}</script>`
//! to point the client at a service or change timing and styling.
//! Missing or unreadable configuration falls back to the defaults.

use gatecount_core::ClientConfig;

/// DOM id of the embedded configuration block.
pub const CONFIG_ELEMENT_ID: &str = "gatecount-config";

/// Read the configuration embedded in the page.
#[must_use]
pub fn load_page_config() -> ClientConfig {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    config_from_script(text.as_deref())
}

/// Parse the contents of the configuration block.
#[must_use]
pub fn config_from_script(text: Option<&str>) -> ClientConfig {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return ClientConfig::default();
    };
    match ClientConfig::from_json(text) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable page configuration");
            ClientConfig::default()
        }
    }
}
